#![no_std]

multiversx_sc::imports!();
multiversx_sc::derive_imports!();

pub mod schema;
pub mod subject;
pub mod tally;
pub mod types;

use schema::{MigrationStep, SchemaError, CURRENT_SCHEMA_VERSION};
use tally::StatsAccumulator;
use types::{
    LedgerConfig, LedgerStats, Match, MatchesAddedData, SchemaMigratedData, Side, SignalAddedData,
    SignalRecord, SignalTarget, UserSignal,
};

pub const MAX_BATCH_SIZE: usize = 100;
pub const MAX_LATEST_MATCHES: u64 = 50;

// Validation
const ERR_LENGTH_MISMATCH: &str = "ERR_LENGTH_MISMATCH";
const ERR_INVALID_SIDE: &str = "ERR_INVALID_SIDE";
const ERR_INVALID_ARG: &str = "ERR_INVALID_ARG";
const ERR_BATCH_TOO_LARGE: &str = "ERR_BATCH_TOO_LARGE";
// Conflict
const ERR_MATCH_EXISTS: &str = "ERR_MATCH_EXISTS";
const ERR_ALREADY_SIGNALED: &str = "ERR_ALREADY_SIGNALED";
// Not found
const ERR_MATCH_NOT_FOUND: &str = "ERR_MATCH_NOT_FOUND";
// State
const ERR_PAUSED: &str = "ERR_PAUSED";
const ERR_NOT_PAUSED: &str = "ERR_NOT_PAUSED";
const ERR_MATCH_INACTIVE: &str = "ERR_MATCH_INACTIVE";
const ERR_SCHEMA_DOWNGRADE: &str = "ERR_SCHEMA_DOWNGRADE";
const ERR_UNKNOWN_SCHEMA: &str = "ERR_UNKNOWN_SCHEMA";
// Authorization
const ERR_UNAUTHORIZED: &str = "ERR_UNAUTHORIZED";

#[multiversx_sc::contract]
pub trait MatchSignalLedger {
    #[init]
    fn init(&self, initial_owner: ManagedAddress) {
        require!(!initial_owner.is_zero(), ERR_INVALID_ARG);

        self.owner().set(&initial_owner);
        self.paused().set(false);
        self.active_match_count().set(0u64);
        self.total_signals().set(0u64);
        self.schema_version().set(CURRENT_SCHEMA_VERSION);
    }

    #[upgrade]
    fn upgrade(&self) {
        self.migrate_schema();
    }

    // ============================================================
    // Owner controls
    // ============================================================

    #[endpoint(transferOwnership)]
    fn transfer_ownership(&self, new_owner: ManagedAddress) {
        self.require_owner();
        require!(!new_owner.is_zero(), ERR_INVALID_ARG);

        let previous = self.owner().get();
        self.owner().set(&new_owner);
        self.ownership_transferred_event(&previous, &new_owner);
    }

    #[endpoint(pause)]
    fn pause(&self) {
        self.require_owner();
        self.require_not_paused();
        self.paused().set(true);
        self.paused_event(self.blockchain().get_block_timestamp());
    }

    #[endpoint(unpause)]
    fn unpause(&self) {
        self.require_owner();
        require!(self.paused().get(), ERR_NOT_PAUSED);
        self.paused().set(false);
        self.unpaused_event(self.blockchain().get_block_timestamp());
    }

    // ============================================================
    // Match registry
    // ============================================================

    #[endpoint(registerBatch)]
    fn register_batch(
        &self,
        match_ids: ManagedVec<u64>,
        team_as: ManagedVec<ManagedBuffer>,
        team_bs: ManagedVec<ManagedBuffer>,
        leagues: ManagedVec<ManagedBuffer>,
        logo_as: ManagedVec<ManagedBuffer>,
        logo_bs: ManagedVec<ManagedBuffer>,
        start_times: ManagedVec<u64>,
    ) {
        self.require_owner();
        self.require_not_paused();

        let count = match_ids.len();
        require!(
            team_as.len() == count
                && team_bs.len() == count
                && leagues.len() == count
                && logo_as.len() == count
                && logo_bs.len() == count
                && start_times.len() == count,
            ERR_LENGTH_MISMATCH
        );
        require!(count <= MAX_BATCH_SIZE, ERR_BATCH_TOO_LARGE);

        // Every id is checked before the first write: one conflict anywhere
        // rejects the whole batch.
        for i in 0..count {
            let match_id = match_ids.get(i);
            require!(self.matches(match_id).is_empty(), ERR_MATCH_EXISTS);
            for j in (i + 1)..count {
                require!(match_ids.get(j) != match_id, ERR_MATCH_EXISTS);
            }
        }

        for i in 0..count {
            let match_id = match_ids.get(i);
            let m = Match {
                match_id,
                team_a: (*team_as.get(i)).clone(),
                team_b: (*team_bs.get(i)).clone(),
                league: (*leagues.get(i)).clone(),
                logo_a: (*logo_as.get(i)).clone(),
                logo_b: (*logo_bs.get(i)).clone(),
                start_time: start_times.get(i),
                signals_team_a: 0,
                signals_team_b: 0,
                is_active: true,
            };
            self.matches(match_id).set(&m);
            self.match_ids().push(&match_id);
        }
        self.active_match_count().update(|n| *n += count as u64);

        let now = self.blockchain().get_block_timestamp();
        self.matches_added_event(now, MatchesAddedData { match_ids });
    }

    #[endpoint(deactivateMatch)]
    fn deactivate_match(&self, match_id: u64) {
        // Allowed even when paused.
        self.require_owner();

        let mut m = self.require_match(match_id);
        require!(m.is_active, ERR_MATCH_INACTIVE);

        m.is_active = false;
        self.matches(match_id).set(&m);
        self.active_match_count().update(|n| *n -= 1);

        self.match_deactivated_event(match_id);
    }

    // ============================================================
    // Signal ledger
    // ============================================================

    #[endpoint(signal)]
    fn signal(&self, match_id: u64, team_id: u8) {
        self.require_not_paused();

        let mut m = self.require_match(match_id);
        require!(m.is_active, ERR_MATCH_INACTIVE);

        let side = match Side::from_team_id(team_id) {
            Some(side) => side,
            None => sc_panic!(ERR_INVALID_SIDE),
        };

        let caller = self.blockchain().get_caller();
        let record_mapper = self.signals(match_id, &caller);
        require!(record_mapper.is_empty(), ERR_ALREADY_SIGNALED);

        let now = self.blockchain().get_block_timestamp();
        match side {
            Side::TeamA => m.signals_team_a += 1,
            Side::TeamB => m.signals_team_b += 1,
        }

        record_mapper.set(SignalRecord {
            side,
            signaled_at: now,
        });
        self.matches(match_id).set(&m);
        self.voter_history(&caller).push(&match_id);
        self.total_signals().update(|n| *n += 1);

        self.signal_added_event(
            match_id,
            &caller,
            SignalAddedData {
                team_id,
                timestamp: now,
            },
        );
    }

    // ============================================================
    // Views
    // ============================================================

    #[view(getMatch)]
    fn get_match(&self, match_id: u64) -> Match<Self::Api> {
        self.require_match(match_id)
    }

    #[view(getMatches)]
    fn get_matches(
        &self,
        match_ids: ManagedVec<u64>,
    ) -> MultiValueEncoded<Match<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        for match_id in match_ids.iter() {
            result.push(self.require_match(match_id));
        }
        result
    }

    #[view(getAllMatchIds)]
    fn get_all_match_ids(&self) -> MultiValueEncoded<u64> {
        let mut result = MultiValueEncoded::new();
        for match_id in self.match_ids().iter() {
            result.push(match_id);
        }
        result
    }

    #[view(getLatestMatches)]
    fn get_latest_matches(&self, count: u64) -> MultiValueEncoded<Match<Self::Api>> {
        let capped = core::cmp::min(count, MAX_LATEST_MATCHES) as usize;
        let ids = self.match_ids();
        let mut result = MultiValueEncoded::new();

        // VecMapper is 1-indexed.
        let mut index = ids.len();
        let mut pushed = 0usize;
        while index > 0 && pushed < capped {
            result.push(self.matches(ids.get(index)).get());
            pushed += 1;
            index -= 1;
        }

        result
    }

    #[view(hasUserSignaled)]
    fn has_user_signaled(&self, match_id: u64, user: ManagedAddress) -> bool {
        !self.signals(match_id, &user).is_empty()
    }

    /// 1 or 2 for a recorded signal, 0 when the user has not signaled.
    #[view(getUserTeamChoice)]
    fn get_user_team_choice(&self, match_id: u64, user: ManagedAddress) -> u8 {
        let record = self.signals(match_id, &user);
        if record.is_empty() {
            return 0;
        }
        record.get().side.team_id()
    }

    #[view(getUserSignals)]
    fn get_user_signals(&self, user: ManagedAddress) -> MultiValueEncoded<UserSignal> {
        let mut result = MultiValueEncoded::new();
        for match_id in self.voter_history(&user).iter() {
            let record = self.signals(match_id, &user).get();
            result.push(UserSignal {
                match_id,
                team_id: record.side.team_id(),
                signaled_at: record.signaled_at,
            });
        }
        result
    }

    #[view(getSignalPercentages)]
    fn get_signal_percentages(&self, match_id: u64) -> MultiValue2<u64, u64> {
        let m = self.require_match(match_id);
        tally::signal_percentages(m.signals_team_a, m.signals_team_b).into()
    }

    #[view(getStats)]
    fn get_stats(&self) -> LedgerStats {
        LedgerStats {
            total_matches: self.match_ids().len() as u64,
            active_matches: self.active_match_count().get(),
            total_signals: self.total_signals().get(),
        }
    }

    #[view(getSignalTarget)]
    fn get_signal_target(&self, match_id: u64) -> SignalTarget {
        SignalTarget::from_ledger_id(match_id)
    }

    #[view(getLedgerConfig)]
    fn get_ledger_config(&self) -> LedgerConfig<Self::Api> {
        LedgerConfig {
            owner: self.owner().get(),
            paused: self.paused().get(),
            schema_version: self.schema_version().get(),
            max_batch_size: MAX_BATCH_SIZE as u64,
        }
    }

    #[view(getOwner)]
    fn get_owner(&self) -> ManagedAddress {
        self.owner().get()
    }

    #[view(isPaused)]
    fn is_paused(&self) -> bool {
        self.paused().get()
    }

    #[view(getSchemaVersion)]
    fn get_schema_version(&self) -> u32 {
        self.schema_version().get()
    }

    // ============================================================
    // Internal helpers
    // ============================================================

    fn require_not_paused(&self) {
        require!(!self.paused().get(), ERR_PAUSED);
    }

    fn require_owner(&self) {
        let caller = self.blockchain().get_caller();
        require!(caller == self.owner().get(), ERR_UNAUTHORIZED);
    }

    fn require_match(&self, match_id: u64) -> Match<Self::Api> {
        require!(!self.matches(match_id).is_empty(), ERR_MATCH_NOT_FOUND);
        self.matches(match_id).get()
    }

    fn migrate_schema(&self) {
        let stored = self.schema_version().get();
        let steps = match schema::migration_steps(stored, CURRENT_SCHEMA_VERSION) {
            Ok(steps) => steps,
            Err(SchemaError::Downgrade { .. }) => sc_panic!(ERR_SCHEMA_DOWNGRADE),
            Err(SchemaError::UnknownVersion(_)) => sc_panic!(ERR_UNKNOWN_SCHEMA),
        };

        let mut applied = 0u32;
        for step in steps {
            match step {
                MigrationStep::BackfillStatsCounters => self.backfill_stats_counters(),
            }
            applied += 1;
        }

        // A same-version upgrade writes nothing.
        if applied == 0 {
            return;
        }

        self.schema_version().set(CURRENT_SCHEMA_VERSION);
        self.schema_migrated_event(
            stored,
            CURRENT_SCHEMA_VERSION,
            SchemaMigratedData {
                steps_applied: applied,
                timestamp: self.blockchain().get_block_timestamp(),
            },
        );
    }

    fn backfill_stats_counters(&self) {
        let mut acc = StatsAccumulator::new();
        for match_id in self.match_ids().iter() {
            let m = self.matches(match_id).get();
            acc.add(m.is_active, m.signals_team_a, m.signals_team_b);
        }
        self.active_match_count().set(acc.active_matches);
        self.total_signals().set(acc.total_signals);
    }

    // ============================================================
    // Events
    // ============================================================

    #[event("matchesAdded")]
    fn matches_added_event(&self, #[indexed] timestamp: u64, data: MatchesAddedData<Self::Api>);

    #[event("signalAdded")]
    fn signal_added_event(
        &self,
        #[indexed] match_id: u64,
        #[indexed] voter: &ManagedAddress,
        data: SignalAddedData,
    );

    #[event("matchDeactivated")]
    fn match_deactivated_event(&self, #[indexed] match_id: u64);

    #[event("paused")]
    fn paused_event(&self, #[indexed] timestamp: u64);

    #[event("unpaused")]
    fn unpaused_event(&self, #[indexed] timestamp: u64);

    #[event("ownershipTransferred")]
    fn ownership_transferred_event(
        &self,
        #[indexed] previous_owner: &ManagedAddress,
        #[indexed] new_owner: &ManagedAddress,
    );

    #[event("schemaMigrated")]
    fn schema_migrated_event(
        &self,
        #[indexed] from_version: u32,
        #[indexed] to_version: u32,
        data: SchemaMigratedData,
    );

    // ============================================================
    // Storage
    // ============================================================

    #[storage_mapper("owner")]
    fn owner(&self) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("paused")]
    fn paused(&self) -> SingleValueMapper<bool>;

    #[storage_mapper("schemaVersion")]
    fn schema_version(&self) -> SingleValueMapper<u32>;

    #[storage_mapper("matches")]
    fn matches(&self, match_id: u64) -> SingleValueMapper<Match<Self::Api>>;

    #[storage_mapper("matchIds")]
    fn match_ids(&self) -> VecMapper<u64>;

    #[storage_mapper("signals")]
    fn signals(&self, match_id: u64, voter: &ManagedAddress) -> SingleValueMapper<SignalRecord>;

    #[storage_mapper("voterHistory")]
    fn voter_history(&self, voter: &ManagedAddress) -> VecMapper<u64>;

    #[storage_mapper("activeMatchCount")]
    fn active_match_count(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("totalSignals")]
    fn total_signals(&self) -> SingleValueMapper<u64>;
}
