use match_signal_ledger::{
    schema::{self, MigrationStep, SchemaError, CURRENT_SCHEMA_VERSION, LEGACY_SCHEMA_VERSION},
    subject::{self, SUBJECT_ID_BASE, SUBJECT_ID_SPAN},
    tally::{self, StatsAccumulator},
    types::{Side, SignalTarget},
};

#[test]
fn empty_match_splits_evenly() {
    assert_eq!(tally::signal_percentages(0, 0), (50, 50));
}

#[test]
fn percentages_round_half_up_and_sum_to_100() {
    let cases = [
        ((1, 0), (100, 0)),
        ((0, 1), (0, 100)),
        ((1, 1), (50, 50)),
        ((1, 2), (33, 67)),
        ((2, 1), (67, 33)),
        ((1, 7), (13, 87)), // 12.5 rounds up
        ((7, 1), (88, 12)), // 87.5 rounds up
        ((1, 199), (1, 99)), // 0.5 rounds up
        ((1, 200), (0, 100)),
    ];
    for ((a, b), expected) in cases {
        assert_eq!(tally::signal_percentages(a, b), expected, "a={a} b={b}");
    }

    for a in 0..40u64 {
        for b in 0..40u64 {
            let (pa, pb) = tally::signal_percentages(a, b);
            assert_eq!(pa + pb, 100);
        }
    }
}

#[test]
fn percentages_do_not_overflow_on_huge_tallies() {
    assert_eq!(tally::signal_percentages(u64::MAX, u64::MAX), (50, 50));
    assert_eq!(tally::signal_percentages(u64::MAX, 0), (100, 0));
}

#[test]
fn accumulator_counts_active_and_signals() {
    let mut acc = StatsAccumulator::new();
    acc.add(true, 3, 1);
    acc.add(false, 2, 2);
    acc.add(true, 0, 0);

    assert_eq!(
        acc,
        StatsAccumulator {
            total_matches: 3,
            active_matches: 2,
            total_signals: 8,
        }
    );
}

#[test]
fn same_version_migration_has_no_steps() {
    let steps: Vec<_> = schema::migration_steps(CURRENT_SCHEMA_VERSION, CURRENT_SCHEMA_VERSION)
        .unwrap()
        .collect();
    assert!(steps.is_empty());
}

#[test]
fn legacy_migration_backfills_counters() {
    let steps: Vec<_> = schema::migration_steps(LEGACY_SCHEMA_VERSION, CURRENT_SCHEMA_VERSION)
        .unwrap()
        .collect();
    assert_eq!(steps, vec![MigrationStep::BackfillStatsCounters]);
}

#[test]
fn downgrade_and_unknown_versions_are_rejected() {
    assert_eq!(
        schema::migration_steps(CURRENT_SCHEMA_VERSION + 1, CURRENT_SCHEMA_VERSION).err(),
        Some(SchemaError::Downgrade {
            stored: CURRENT_SCHEMA_VERSION + 1,
            target: CURRENT_SCHEMA_VERSION,
        })
    );
    assert_eq!(
        schema::migration_steps(CURRENT_SCHEMA_VERSION, CURRENT_SCHEMA_VERSION + 1).err(),
        Some(SchemaError::UnknownVersion(CURRENT_SCHEMA_VERSION))
    );
}

#[test]
fn subject_ids_match_the_external_derivation() {
    assert_eq!(subject::subject_id("arda-guler"), 9_000_406_836);
    assert_eq!(subject::subject_id("kylian-mbappe"), 9_000_717_326);
    assert_eq!(subject::subject_id("lamine-yamal"), 9_000_338_443);
    assert_eq!(subject::subject_id("kenan-yildiz"), 9_000_569_531);
    assert_eq!(subject::subject_id(""), SUBJECT_ID_BASE);
}

#[test]
fn signal_target_round_trips_ledger_ids() {
    let subject_id = subject::subject_id("kenan-yildiz");
    assert_eq!(
        SignalTarget::from_ledger_id(subject_id),
        SignalTarget::Subject(569_531)
    );
    assert_eq!(SignalTarget::Subject(569_531).ledger_id(), Some(subject_id));

    assert_eq!(SignalTarget::from_ledger_id(1001), SignalTarget::Match(1001));
    assert_eq!(
        SignalTarget::from_ledger_id(SUBJECT_ID_BASE - 1),
        SignalTarget::Match(SUBJECT_ID_BASE - 1)
    );
    assert_eq!(
        SignalTarget::from_ledger_id(SUBJECT_ID_BASE + SUBJECT_ID_SPAN),
        SignalTarget::Match(SUBJECT_ID_BASE + SUBJECT_ID_SPAN)
    );
    assert_eq!(SignalTarget::Subject(SUBJECT_ID_SPAN).ledger_id(), None);
}

#[test]
fn side_maps_only_team_ids_one_and_two() {
    assert_eq!(Side::from_team_id(1), Some(Side::TeamA));
    assert_eq!(Side::from_team_id(2), Some(Side::TeamB));
    assert_eq!(Side::from_team_id(0), None);
    assert_eq!(Side::from_team_id(3), None);
    assert_eq!(Side::TeamB.team_id(), 2);
}
