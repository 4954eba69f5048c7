//! Tally arithmetic shared by the views and the schema backfill.
//!
//! Pure `no_std` code: no storage access, so it is testable off-chain.

/// Split returned when a match has no signals yet.
pub const EMPTY_SPLIT: (u64, u64) = (50, 50);

/// Percentage split between the two sides, rounded half-up on side A.
///
/// Side B always takes the remainder, so the pair sums to 100.
pub fn signal_percentages(signals_a: u64, signals_b: u64) -> (u64, u64) {
    let total = signals_a as u128 + signals_b as u128;
    if total == 0 {
        return EMPTY_SPLIT;
    }

    // round(a * 100 / total) == floor((a * 200 + total) / (2 * total))
    let pct_a = ((signals_a as u128 * 200 + total) / (total * 2)) as u64;
    (pct_a, 100 - pct_a)
}

/// Running totals over a set of match records.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct StatsAccumulator {
    pub total_matches: u64,
    pub active_matches: u64,
    pub total_signals: u64,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, is_active: bool, signals_a: u64, signals_b: u64) {
        self.total_matches += 1;
        if is_active {
            self.active_matches += 1;
        }
        self.total_signals += signals_a + signals_b;
    }
}
