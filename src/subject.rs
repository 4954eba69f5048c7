//! Reserved id range for non-match subjects (e.g. individual players).
//!
//! Subjects reuse the match signaling flow under ids in
//! `[SUBJECT_ID_BASE, SUBJECT_ID_BASE + SUBJECT_ID_SPAN)`. The ledger stores
//! them like any other match; only the boundary types know about the range.

pub const SUBJECT_ID_BASE: u64 = 9_000_000_000;
pub const SUBJECT_ID_SPAN: u64 = 1_000_000;

/// 32-bit rolling string hash (`h = h * 31 + unit`) over UTF-16 code units,
/// wrapping like a signed 32-bit integer.
pub fn key_hash(key: &str) -> i32 {
    key.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(unit as i32)
    })
}

/// Offset of `key` inside the subject range.
pub fn subject_offset(key: &str) -> u64 {
    (key_hash(key) as i64).unsigned_abs() % SUBJECT_ID_SPAN
}

/// Ledger id under which the subject named `key` is registered.
pub fn subject_id(key: &str) -> u64 {
    SUBJECT_ID_BASE + subject_offset(key)
}

pub fn is_subject_id(id: u64) -> bool {
    (SUBJECT_ID_BASE..SUBJECT_ID_BASE + SUBJECT_ID_SPAN).contains(&id)
}
