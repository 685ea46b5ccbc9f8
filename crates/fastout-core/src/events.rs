use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entitlement::PremiumStatus;
use crate::model::{FastingSession, SubscriptionTier, Workout};

/// Every state change in the store produces an Event.
/// Callers render them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    PointsAwarded {
        amount: u32,
        total: u64,
        streak: u32,
        streak_extended: bool,
        at: DateTime<Utc>,
    },
    WorkoutLogged {
        workout: Workout,
        history_len: usize,
        at: DateTime<Utc>,
    },
    FastStarted {
        session: FastingSession,
        at: DateTime<Utc>,
    },
    /// Fast cancelled, or cleared by the caller after completion.
    FastCleared {
        session: Option<FastingSession>,
        at: DateTime<Utc>,
    },
    FastCompleted {
        session: FastingSession,
        points_awarded: u32,
        total: u64,
        streak: u32,
        at: DateTime<Utc>,
    },
    SubscriptionActivated {
        tier: SubscriptionTier,
        expires_at: DateTime<Utc>,
        /// A live temporary grant was dropped in favour of the subscription.
        superseded_temporary: bool,
        at: DateTime<Utc>,
    },
    TemporaryPremiumActivated {
        expires_at: DateTime<Utc>,
        premium_unlocks: u32,
        at: DateTime<Utc>,
    },
    GameRecorded {
        score: u32,
        high_score: u32,
        games_played: u32,
        new_high_score: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        name: String,
        points: u64,
        current_streak: u32,
        premium: PremiumStatus,
        active_fast: Option<String>,
        workouts_logged: usize,
        at: DateTime<Utc>,
    },
}
