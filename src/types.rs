multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use crate::subject::{is_subject_id, SUBJECT_ID_BASE, SUBJECT_ID_SPAN};

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    TeamA,
    TeamB,
}

impl Side {
    /// Maps the external team id (1 or 2) to a side.
    pub fn from_team_id(team_id: u8) -> Option<Self> {
        match team_id {
            1 => Some(Side::TeamA),
            2 => Some(Side::TeamB),
            _ => None,
        }
    }

    pub fn team_id(self) -> u8 {
        match self {
            Side::TeamA => 1,
            Side::TeamB => 2,
        }
    }
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct Match<M: ManagedTypeApi> {
    pub match_id: u64,

    // Immutable after registration.
    pub team_a: ManagedBuffer<M>,
    pub team_b: ManagedBuffer<M>,
    pub league: ManagedBuffer<M>,
    pub logo_a: ManagedBuffer<M>,
    pub logo_b: ManagedBuffer<M>,
    pub start_time: u64,

    pub signals_team_a: u64,
    pub signals_team_b: u64,
    pub is_active: bool,
}

/// Membership record for one (match, voter) pair. Always encodes to a
/// non-empty value, so an empty mapper means "has not signaled".
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub struct SignalRecord {
    pub side: Side,
    pub signaled_at: u64,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub struct UserSignal {
    pub match_id: u64,
    pub team_id: u8,
    pub signaled_at: u64,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub struct LedgerStats {
    pub total_matches: u64,
    pub active_matches: u64,
    pub total_signals: u64,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct LedgerConfig<M: ManagedTypeApi> {
    pub owner: ManagedAddress<M>,
    pub paused: bool,
    pub schema_version: u32,
    pub max_batch_size: u64,
}

/// What a ledger id addresses. Subjects share the id space with matches:
/// `Subject(offset)` is stored under `SUBJECT_ID_BASE + offset`.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub enum SignalTarget {
    Match(u64),
    Subject(u64),
}

impl SignalTarget {
    pub fn from_ledger_id(id: u64) -> Self {
        if is_subject_id(id) {
            SignalTarget::Subject(id - SUBJECT_ID_BASE)
        } else {
            SignalTarget::Match(id)
        }
    }

    /// Returns `None` for a subject offset outside the reserved span.
    pub fn ledger_id(self) -> Option<u64> {
        match self {
            SignalTarget::Match(id) => Some(id),
            SignalTarget::Subject(offset) if offset < SUBJECT_ID_SPAN => {
                Some(SUBJECT_ID_BASE + offset)
            }
            SignalTarget::Subject(_) => None,
        }
    }
}

// ============================================================
// Event payloads (MultiversX events allow only one non-indexed arg)
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct MatchesAddedData<M: ManagedTypeApi> {
    pub match_ids: ManagedVec<M, u64>,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy)]
pub struct SignalAddedData {
    pub team_id: u8,
    pub timestamp: u64,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy)]
pub struct SchemaMigratedData {
    pub steps_applied: u32,
    pub timestamp: u64,
}
