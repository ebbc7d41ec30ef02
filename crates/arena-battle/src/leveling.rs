use thiserror::Error;

/// Experience needed to advance one level.
pub const XP_PER_LEVEL: i64 = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelingError {
    #[error("experience delta must be non-negative, got {0}")]
    NegativeExperience(i64),
    #[error("experience total overflows")]
    Overflow,
}

/// A user's experience total and the level derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub total_xp: i64,
    pub level: i64,
}

impl Progress {
    pub fn from_xp(total_xp: i64) -> Self {
        Self { total_xp, level: level_for_xp(total_xp) }
    }
}

/// Level 1 at zero experience, one more for every full [`XP_PER_LEVEL`].
pub fn level_for_xp(total_xp: i64) -> i64 {
    total_xp.div_euclid(XP_PER_LEVEL) + 1
}

/// Add `delta` experience to `total_xp` and recompute the level.
///
/// The database applies the same rule in a single `UPDATE`; this is the
/// reference version that the SQL is tested against.
pub fn apply_experience(total_xp: i64, delta: i64) -> Result<Progress, LevelingError> {
    if delta < 0 {
        return Err(LevelingError::NegativeExperience(delta));
    }
    let total_xp = total_xp.checked_add(delta).ok_or(LevelingError::Overflow)?;
    Ok(Progress::from_xp(total_xp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(999), 1);
        assert_eq!(level_for_xp(1000), 2);
        assert_eq!(level_for_xp(2500), 3);
    }

    #[test]
    fn test_crossing_a_level() {
        let progress = apply_experience(950, 100).unwrap();
        assert_eq!(progress, Progress { total_xp: 1050, level: 2 });
    }

    #[test]
    fn test_zero_delta_keeps_progress() {
        assert_eq!(apply_experience(1234, 0).unwrap(), Progress::from_xp(1234));
    }

    #[test]
    fn test_negative_delta_rejected() {
        assert_eq!(
            apply_experience(10, -1),
            Err(LevelingError::NegativeExperience(-1))
        );
    }

    #[test]
    fn test_overflowing_total_rejected() {
        assert_eq!(apply_experience(i64::MAX, 1), Err(LevelingError::Overflow));
        assert_eq!(apply_experience(i64::MAX - 5, 5).unwrap().total_xp, i64::MAX);
    }

    proptest! {
        #[test]
        fn level_tracks_total_xp(xp in 0i64..10_000_000, delta in 0i64..1_000_000) {
            let progress = apply_experience(xp, delta).unwrap();
            prop_assert_eq!(progress.total_xp, xp + delta);
            prop_assert_eq!(progress.level, (xp + delta) / 1000 + 1);
        }

        #[test]
        fn level_never_decreases(xp in 0i64..10_000_000, delta in 0i64..1_000_000) {
            let before = level_for_xp(xp);
            let after = apply_experience(xp, delta).unwrap().level;
            prop_assert!(after >= before);
        }
    }
}
