//! Reward engine.
//!
//! Yield for a position over `elapsed` blocks is
//!
//! ```text
//! floor(stake * base_rate_bps * multiplier * elapsed / NORMALIZATION)
//! ```
//!
//! where `multiplier` is the combined tier and lock multiplier at scale 100
//! (a tier-3 stake locked for `LOCK_2` yields 200 * 150 / 100 = 300, i.e. 3.00x).

pub const NORMALIZATION: i128 = 14_400_000;

pub const LOCK_NONE: u32 = 0;
pub const LOCK_1: u32 = 4320;
pub const LOCK_2: u32 = 8640;

pub const LOCK_1_MULTIPLIER: u32 = 125;
pub const LOCK_2_MULTIPLIER: u32 = 150;
pub const NO_LOCK_MULTIPLIER: u32 = 100;

/// Only these lock periods may be passed to `stake`.
pub fn is_valid_lock_period(period: u32) -> bool {
    matches!(period, LOCK_NONE | LOCK_1 | LOCK_2)
}

/// Lock multiplier at scale 100. Total over every `u32`.
pub fn lock_multiplier(period: u32) -> u32 {
    if period >= LOCK_2 {
        LOCK_2_MULTIPLIER
    } else if period >= LOCK_1 {
        LOCK_1_MULTIPLIER
    } else {
        NO_LOCK_MULTIPLIER
    }
}

/// Fold a tier multiplier and a lock multiplier (both scale 100) into one
/// scale-100 multiplier.
pub fn combined_multiplier(tier_multiplier: u32, lock_multiplier: u32) -> u32 {
    let product = u64::from(tier_multiplier) * u64::from(lock_multiplier) / 100;
    u32::try_from(product).unwrap_or(u32::MAX)
}

/// Accrued yield. Returns 0 for any non-positive input.
///
/// `stake` is split as `q * NORMALIZATION + r` so the result is computed as
/// `q * k + (r * k) / NORMALIZATION` with `k = rate * multiplier * elapsed`.
/// Both terms fit in `i128` for any stake up to `i64::MAX` and any `u32`
/// window; larger stakes saturate instead of wrapping.
pub fn rewards(stake: i128, base_rate_bps: u32, multiplier: u32, elapsed_blocks: u32) -> i128 {
    if stake <= 0 || base_rate_bps == 0 || multiplier == 0 || elapsed_blocks == 0 {
        return 0;
    }

    let k = i128::from(base_rate_bps) * i128::from(multiplier) * i128::from(elapsed_blocks);
    let q = stake / NORMALIZATION;
    let r = stake % NORMALIZATION;

    q.saturating_mul(k).saturating_add(r * k / NORMALIZATION)
}
