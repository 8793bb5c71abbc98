//! Experience points and leveling
//!
//! Levels use threshold subtraction: every full `XP_PER_LEVEL` points are
//! converted into one level, and the stored xp is what remains toward the
//! next level. The rule is applied on every write, including the first award
//! that creates an account, so awarding `a` then `b` always ends at the same
//! level and remainder as awarding `a + b` at once.

/// Points needed to gain one level
pub const XP_PER_LEVEL: i64 = 100;

/// Points awarded for writing a reflection
pub const REFLECTION_XP: i64 = 15;

/// Level of a freshly created account
pub const STARTING_LEVEL: i64 = 1;

/// Apply level-ups to a running total.
///
/// Returns `(xp, level)` with `xp` in `[0, XP_PER_LEVEL)`. Negative totals are
/// clamped to zero; the level never goes down.
pub fn apply_level_ups(xp: i64, level: i64) -> (i64, i64) {
    let xp = xp.max(0);
    let level = level.max(STARTING_LEVEL);
    (xp % XP_PER_LEVEL, level.saturating_add(xp / XP_PER_LEVEL))
}

/// Add `amount` to an account currently at `(xp, level)`
pub fn accumulate(xp: i64, level: i64, amount: i64) -> (i64, i64) {
    apply_level_ups(xp.saturating_add(amount), level)
}
