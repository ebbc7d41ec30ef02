//! Game rules shared by the server and clients: how experience turns into
//! levels, and how a manual-attack battle plays out.
//!
//! Nothing here touches I/O. Randomness is always injected as an [`rand::Rng`]
//! so callers (and tests) control the seed.

pub mod battle;
pub mod leveling;

pub use battle::{Battle, BattleError, BattleSummary, DamageRange, Side, Strike, player_max_hp};
pub use leveling::{LevelingError, Progress, XP_PER_LEVEL, apply_experience, level_for_xp};
