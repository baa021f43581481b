//! Level and XP arithmetic
//!
//! Levels are 100 XP wide: `level = xp / 100 + 1`.

use serde::{Deserialize, Serialize};

use super::achievement::Achievement;

/// XP every profile starts with before any delta is applied
pub const BASE_XP: u64 = 50;

/// XP width of one level
pub const XP_PER_LEVEL: u64 = 100;

/// Level tier derived from accumulated XP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: u64,
    pub xp: u64,
    pub next_level_xp: u64,
}

impl LevelInfo {
    /// Compute the tier for a total XP value
    #[must_use]
    pub fn from_xp(xp: u64) -> Self {
        let level = xp / XP_PER_LEVEL + 1;
        Self {
            level,
            xp,
            next_level_xp: level.saturating_mul(XP_PER_LEVEL),
        }
    }

    /// Tier of a fresh profile
    #[must_use]
    pub fn initial() -> Self {
        Self::from_xp(BASE_XP)
    }
}

/// Apply an XP delta to the base and compute the resulting tier
///
/// Returns `None` when the delta would take the total below zero.
#[must_use]
pub fn compute_level(delta: i64) -> Option<LevelInfo> {
    BASE_XP.checked_add_signed(delta).map(LevelInfo::from_xp)
}

/// Badges earned for a level
///
/// Every call at a level above 1 yields the level badge again; callers that
/// persist must dedup by id (see [`super::achievement::dedup_achievements`]).
#[must_use]
pub fn level_achievements(level: u64) -> Vec<Achievement> {
    if level > 1 {
        vec![Achievement::level_reached(level)]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_delta_stays_at_level_one() {
        let info = compute_level(30).unwrap();
        assert_eq!(info, LevelInfo { level: 1, xp: 80, next_level_xp: 100 });
        assert!(level_achievements(info.level).is_empty());
    }

    #[test]
    fn crossing_threshold_reaches_level_two() {
        let info = compute_level(60).unwrap();
        assert_eq!(info, LevelInfo { level: 2, xp: 110, next_level_xp: 200 });

        let badges = level_achievements(info.level);
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].id, "level_2");
    }

    #[test]
    fn exact_boundary_starts_next_level() {
        assert_eq!(compute_level(50).unwrap().level, 2);
        assert_eq!(compute_level(49).unwrap().level, 1);
    }

    #[test]
    fn invariants_hold_across_range() {
        for xp in (0..2_000).step_by(7) {
            let info = LevelInfo::from_xp(xp);
            assert!(info.level >= 1);
            assert_eq!(info.level, xp / 100 + 1);
            assert_eq!(info.next_level_xp, info.level * 100);
            assert!(info.next_level_xp > info.xp);
        }
    }

    #[test]
    fn negative_delta_within_base() {
        assert_eq!(compute_level(-50).unwrap(), LevelInfo::from_xp(0));
        assert!(compute_level(-51).is_none());
    }

    #[test]
    fn repeated_computation_is_identical_but_badges_repeat() {
        let first = compute_level(160).unwrap();
        let second = compute_level(160).unwrap();
        assert_eq!(first, second);

        // No memory between calls: the same badge is emitted twice
        let mut all = level_achievements(first.level);
        all.extend(level_achievements(second.level));
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], all[1]);
        assert_eq!(super::super::achievement::dedup_achievements(all).len(), 1);
    }

    #[test]
    fn huge_delta_keeps_level_formula() {
        let info = compute_level(500_000_000_000).unwrap();
        assert_eq!(info.xp, 500_000_000_050);
        assert_eq!(info.level, 5_000_000_001);
        assert_eq!(info.next_level_xp, 500_000_000_100);

        let badges = level_achievements(info.level);
        assert_eq!(badges[0].id, "level_5000000001");
    }

    #[test]
    fn max_delta_does_not_overflow() {
        let info = compute_level(i64::MAX).unwrap();
        assert_eq!(info.level, info.xp / 100 + 1);
        assert_eq!(info.next_level_xp, info.level * 100);
    }

    #[test]
    fn initial_tier() {
        assert_eq!(LevelInfo::initial(), LevelInfo { level: 1, xp: 50, next_level_xp: 100 });
    }
}
