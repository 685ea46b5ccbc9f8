use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Numeric progression and unlock policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Single awards at or above this amount extend the streak.
    #[serde(default = "default_streak_threshold")]
    pub streak_threshold: u32,
    #[serde(default = "default_workout_history_limit")]
    pub workout_history_limit: usize,
    /// Minimum mini-game score that grants temporary premium.
    #[serde(default = "default_game_unlock_score")]
    pub game_unlock_score: u32,
    #[serde(default = "default_game_unlock_hours")]
    pub game_unlock_hours: u32,
    /// Workouts this long or longer earn the bonus.
    #[serde(default = "default_long_workout_minutes")]
    pub long_workout_minutes: u32,
    #[serde(default = "default_long_workout_bonus_pct")]
    pub long_workout_bonus_pct: u32,
}

fn default_streak_threshold() -> u32 {
    30
}
fn default_workout_history_limit() -> usize {
    20
}
fn default_game_unlock_score() -> u32 {
    200
}
fn default_game_unlock_hours() -> u32 {
    24
}
fn default_long_workout_minutes() -> u32 {
    45
}
fn default_long_workout_bonus_pct() -> u32 {
    50
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            streak_threshold: default_streak_threshold(),
            workout_history_limit: default_workout_history_limit(),
            game_unlock_score: default_game_unlock_score(),
            game_unlock_hours: default_game_unlock_hours(),
            long_workout_minutes: default_long_workout_minutes(),
            long_workout_bonus_pct: default_long_workout_bonus_pct(),
        }
    }
}

impl Rules {
    /// Reject values the store cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("rules.workout_history_limit", self.workout_history_limit as u64),
            ("rules.game_unlock_hours", u64::from(self.game_unlock_hours)),
        ];
        match positive.iter().find(|(_, value)| *value == 0) {
            Some((key, _)) => Err(ConfigError::InvalidValue {
                key: (*key).to_string(),
                message: "must be greater than zero".into(),
            }),
            None => Ok(()),
        }
    }
}
