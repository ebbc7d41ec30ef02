use std::time::Duration;

use arena_types::api::{BattleResultRequest, CreateBattleLogRequest};
use arena_types::models::{BattleOutcome, ReplayEvent};
use rand::Rng;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Delay between the player's strike and the enemy's answer.
pub const TURN_INTERVAL: Duration = Duration::from_millis(800);

/// Player hit points at the start of a battle.
pub fn player_max_hp(level: i64) -> i64 {
    100 + level * 10
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BattleError {
    #[error("battle is already over")]
    Finished,
    #[error("battle is still in progress")]
    InProgress,
}

/// Inclusive damage range an attacker rolls from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRange {
    pub min: i64,
    pub max: i64,
}

impl DamageRange {
    pub const PLAYER_MANUAL: Self = Self { min: 10, max: 29 };
    pub const ENEMY_MANUAL: Self = Self { min: 5, max: 19 };

    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        rng.random_range(self.min..=self.max)
    }

    pub fn contains(&self, damage: i64) -> bool {
        (self.min..=self.max).contains(&damage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Combatant {
    hp: i64,
    max_hp: i64,
    damage: DamageRange,
}

impl Combatant {
    fn new(max_hp: i64, damage: DamageRange) -> Self {
        let max_hp = max_hp.max(1);
        Self { hp: max_hp, max_hp, damage }
    }

    fn take_damage(&mut self, damage: i64) {
        self.hp = (self.hp - damage).max(0);
    }
}

/// Result of a single attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    pub attacker: Side,
    pub damage: i64,
    pub defender_hp: i64,
    /// The defender dropped to zero and the attacker won.
    pub finished: bool,
}

/// What gets reported to the backend once the battle is over.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleSummary {
    pub total_damage: i64,
    pub duration_secs: i64,
    pub outcome: BattleOutcome,
    pub replay: Vec<ReplayEvent>,
}

impl BattleSummary {
    pub fn into_result_request(self, user_id: Uuid, enemy_id: &str) -> BattleResultRequest {
        BattleResultRequest {
            user_id,
            enemy_id: enemy_id.to_string(),
            total_damage: self.total_damage,
            result: self.outcome,
        }
    }

    pub fn into_log_request(self, user_id: Uuid, enemy_id: &str) -> CreateBattleLogRequest {
        CreateBattleLogRequest {
            user_id,
            enemy_id: enemy_id.to_string(),
            damage_dealt: self.total_damage,
            duration: self.duration_secs,
            replay_data: self.replay,
        }
    }
}

/// Client-side battle between the player and one enemy.
///
/// Each attack rolls from the attacker's [`DamageRange`] and lowers the
/// defender's hit points, never below zero. The first side to bring the other
/// to zero wins and every further attack is rejected.
#[derive(Debug, Clone)]
pub struct Battle {
    player: Combatant,
    enemy: Combatant,
    winner: Option<Side>,
    replay: Vec<ReplayEvent>,
}

impl Battle {
    /// Manual-attack battle. Max hit points below 1 are raised to 1.
    pub fn new(player_max_hp: i64, enemy_max_hp: i64) -> Self {
        Self::with_ranges(
            player_max_hp,
            enemy_max_hp,
            DamageRange::PLAYER_MANUAL,
            DamageRange::ENEMY_MANUAL,
        )
    }

    pub fn with_ranges(
        player_max_hp: i64,
        enemy_max_hp: i64,
        player_damage: DamageRange,
        enemy_damage: DamageRange,
    ) -> Self {
        Self {
            player: Combatant::new(player_max_hp, player_damage),
            enemy: Combatant::new(enemy_max_hp, enemy_damage),
            winner: None,
            replay: Vec::new(),
        }
    }

    pub fn player_hp(&self) -> i64 {
        self.player.hp
    }

    pub fn player_max_hp(&self) -> i64 {
        self.player.max_hp
    }

    pub fn enemy_hp(&self) -> i64 {
        self.enemy.hp
    }

    pub fn enemy_max_hp(&self) -> i64 {
        self.enemy.max_hp
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// Damage the player has dealt so far.
    pub fn damage_dealt(&self) -> i64 {
        self.enemy.max_hp - self.enemy.hp
    }

    pub fn replay(&self) -> &[ReplayEvent] {
        &self.replay
    }

    /// Player strikes the enemy. `elapsed` is the time since the battle
    /// started and is recorded in the replay.
    pub fn player_attack<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        elapsed: Duration,
    ) -> Result<Strike, BattleError> {
        let strike = self.attack(Side::Player, rng)?;
        self.replay.push(ReplayEvent {
            offset_secs: elapsed.as_secs_f64(),
            damage: strike.damage,
            critical: false,
        });
        Ok(strike)
    }

    /// Enemy strikes the player.
    pub fn enemy_attack<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Strike, BattleError> {
        self.attack(Side::Enemy, rng)
    }

    fn attack<R: Rng + ?Sized>(&mut self, attacker: Side, rng: &mut R) -> Result<Strike, BattleError> {
        if self.is_finished() {
            return Err(BattleError::Finished);
        }

        let (offense, defense) = match attacker {
            Side::Player => (&self.player, &mut self.enemy),
            Side::Enemy => (&self.enemy, &mut self.player),
        };
        let damage = offense.damage.roll(rng);
        defense.take_damage(damage);
        let defender_hp = defense.hp;

        let finished = defender_hp == 0;
        if finished {
            self.winner = Some(attacker);
        }

        Ok(Strike { attacker, damage, defender_hp, finished })
    }

    /// Play the battle to the end: player strikes, enemy answers one
    /// [`TURN_INTERVAL`] later, repeat. Returns the winner.
    pub fn simulate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Side {
        let mut clock = Duration::ZERO;
        while self.winner.is_none() {
            if self.player_attack(rng, clock).is_err() {
                break;
            }
            clock += TURN_INTERVAL;
            if self.winner.is_none() && self.enemy_attack(rng).is_err() {
                break;
            }
        }

        let winner = self.winner.unwrap_or(Side::Enemy);
        debug!(
            ?winner,
            player_hp = self.player.hp,
            enemy_hp = self.enemy.hp,
            strikes = self.replay.len(),
            "Simulated battle finished"
        );
        winner
    }

    /// Summary for submission. Only available once someone has won.
    pub fn summary(&self, duration: Duration) -> Result<BattleSummary, BattleError> {
        let outcome = match self.winner {
            Some(Side::Player) => BattleOutcome::Win,
            Some(Side::Enemy) => BattleOutcome::Lose,
            None => return Err(BattleError::InProgress),
        };
        Ok(BattleSummary {
            total_damage: self.damage_dealt(),
            duration_secs: duration.as_secs() as i64,
            outcome,
            replay: self.replay.clone(),
        })
    }
}
