//! Storage schema versions and the migration plan run on upgrade.
//!
//! Version 0 is the layout that predates versioning: match records, signal
//! records and the id index exist, but the incremental counters
//! (`activeMatchCount`, `totalSignals`) were never written. Version 1 adds
//! the counters.

pub const LEGACY_SCHEMA_VERSION: u32 = 0;
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MigrationStep {
    /// 0 -> 1: rebuild the stats counters from the match table.
    BackfillStatsCounters,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SchemaError {
    Downgrade { stored: u32, target: u32 },
    UnknownVersion(u32),
}

/// The step that moves storage from `version` to `version + 1`.
pub fn step_from(version: u32) -> Option<MigrationStep> {
    match version {
        LEGACY_SCHEMA_VERSION => Some(MigrationStep::BackfillStatsCounters),
        _ => None,
    }
}

/// Steps needed to bring storage at `stored` up to `target`, oldest first.
///
/// `stored == target` yields no steps.
pub fn migration_steps(
    stored: u32,
    target: u32,
) -> Result<impl Iterator<Item = MigrationStep>, SchemaError> {
    if stored > target {
        return Err(SchemaError::Downgrade { stored, target });
    }
    if let Some(missing) = (stored..target).find(|v| step_from(*v).is_none()) {
        return Err(SchemaError::UnknownVersion(missing));
    }
    Ok((stored..target).filter_map(step_from))
}
