//! User-state data model.
//!
//! Everything the store owns lives in [`UserState`], a plain serde
//! snapshot. No entity here is shared with collaborators; they only see
//! copies handed out by the store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub joined_at: DateTime<Utc>,
}

/// The fixed set of loggable workout types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
    StrengthTraining,
    Cardio,
    Hiit,
    Yoga,
    CrossFit,
}

impl WorkoutKind {
    pub const ALL: [WorkoutKind; 5] = [
        WorkoutKind::StrengthTraining,
        WorkoutKind::Cardio,
        WorkoutKind::Hiit,
        WorkoutKind::Yoga,
        WorkoutKind::CrossFit,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            WorkoutKind::StrengthTraining => "Strength Training",
            WorkoutKind::Cardio => "Cardio",
            WorkoutKind::Hiit => "HIIT",
            WorkoutKind::Yoga => "Yoga",
            WorkoutKind::CrossFit => "CrossFit",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for WorkoutKind {
    type Err = ValidationError;

    /// Accepts the display name or its snake/kebab form, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        WorkoutKind::ALL
            .into_iter()
            .find(|kind| {
                kind.display_name()
                    .chars()
                    .filter(|c| *c != ' ')
                    .flat_map(char::to_lowercase)
                    .eq(normalized.chars())
            })
            .ok_or_else(|| ValidationError::Unknown {
                kind: "workout type",
                name: s.to_string(),
            })
    }
}

/// A logged workout. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    pub kind: WorkoutKind,
    pub duration_min: u32,
    pub points: u32,
    pub logged_at: DateTime<Utc>,
}

/// A fasting protocol as selected by the user, timed from `started_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastingSession {
    pub protocol: String,
    pub target_hours: u32,
    pub description: String,
    pub points: u32,
    pub premium: bool,
    pub started_at: DateTime<Utc>,
}

impl FastingSession {
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.started_at
            .checked_add_signed(Duration::hours(i64::from(self.target_hours)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Time left until the target; zero once it has passed.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.ends_at() - now).max(Duration::zero())
    }

    pub fn is_finished(&self, now: DateTime<Utc>) -> bool {
        self.ends_at() <= now
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Monthly,
    Yearly,
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Monthly => "monthly",
            SubscriptionTier::Yearly => "yearly",
        })
    }
}

/// A purchasable tier. `free` is not a plan, so it cannot be "bought".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaidPlan {
    Monthly,
    Yearly,
}

impl From<PaidPlan> for SubscriptionTier {
    fn from(plan: PaidPlan) -> Self {
        match plan {
            PaidPlan::Monthly => SubscriptionTier::Monthly,
            PaidPlan::Yearly => SubscriptionTier::Yearly,
        }
    }
}

impl fmt::Display for PaidPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        SubscriptionTier::from(*self).fmt(f)
    }
}

impl FromStr for PaidPlan {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monthly" => Ok(PaidPlan::Monthly),
            "yearly" => Ok(PaidPlan::Yearly),
            _ => Err(ValidationError::Unknown {
                kind: "plan",
                name: s.to_string(),
            }),
        }
    }
}

/// Paid subscription window.
///
/// Fields are private so the tier/expiry pairing can only be built through
/// [`SubscriptionState::free`] and [`SubscriptionState::paid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubscriptionState {
    tier: SubscriptionTier,
    expires_at: Option<DateTime<Utc>>,
}

impl SubscriptionState {
    pub fn free() -> Self {
        Self::default()
    }

    pub fn paid(plan: PaidPlan, expires_at: DateTime<Utc>) -> Self {
        Self {
            tier: plan.into(),
            expires_at: Some(expires_at),
        }
    }

    pub fn tier(&self) -> SubscriptionTier {
        self.tier
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

/// Time-boxed premium earned from the mini-game.
///
/// `active` is never cleared when the grant lapses; readers compare
/// `expires_at` against the clock instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemporaryPremiumGrant {
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TemporaryPremiumGrant {
    pub fn until(expires_at: DateTime<Utc>) -> Self {
        Self {
            active: true,
            expires_at: Some(expires_at),
        }
    }

    pub fn inactive() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameStats {
    pub high_score: u32,
    pub games_played: u32,
    pub premium_unlocks: u32,
}

/// Full snapshot owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    pub profile: UserProfile,
    pub points: u64,
    pub current_streak: u32,
    #[serde(default)]
    pub subscription: SubscriptionState,
    /// Most recent first.
    #[serde(default)]
    pub workout_history: Vec<Workout>,
    #[serde(default)]
    pub active_fast: Option<FastingSession>,
    #[serde(default)]
    pub temporary_premium: TemporaryPremiumGrant,
    #[serde(default)]
    pub game_stats: GameStats,
}

impl UserState {
    /// Fresh state for a newly created profile.
    pub fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            points: 0,
            current_streak: 0,
            subscription: SubscriptionState::free(),
            workout_history: Vec::new(),
            active_fast: None,
            temporary_premium: TemporaryPremiumGrant::inactive(),
            game_stats: GameStats::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workout_kind_parses_loose_names() {
        assert_eq!("Strength Training".parse::<WorkoutKind>().unwrap(), WorkoutKind::StrengthTraining);
        assert_eq!("strength-training".parse::<WorkoutKind>().unwrap(), WorkoutKind::StrengthTraining);
        assert_eq!("hiit".parse::<WorkoutKind>().unwrap(), WorkoutKind::Hiit);
        assert_eq!("cross_fit".parse::<WorkoutKind>().unwrap(), WorkoutKind::CrossFit);
        assert!("pilates".parse::<WorkoutKind>().is_err());
    }

    #[test]
    fn free_subscription_has_no_expiry() {
        let sub = SubscriptionState::free();
        assert_eq!(sub.tier(), SubscriptionTier::Free);
        assert!(sub.expires_at().is_none());
    }

    #[test]
    fn paid_plan_maps_to_tier() {
        let at = Utc::now();
        let sub = SubscriptionState::paid(PaidPlan::Yearly, at);
        assert_eq!(sub.tier(), SubscriptionTier::Yearly);
        assert_eq!(sub.expires_at(), Some(at));
        assert!("free".parse::<PaidPlan>().is_err());
    }

    #[test]
    fn fasting_session_counts_down_to_target() {
        let started_at = Utc::now();
        let session = FastingSession {
            protocol: "16:8".into(),
            target_hours: 16,
            description: String::new(),
            points: 20,
            premium: false,
            started_at,
        };
        assert_eq!(session.ends_at(), started_at + Duration::hours(16));
        assert_eq!(session.remaining(started_at + Duration::hours(10)), Duration::hours(6));
        assert!(!session.is_finished(started_at + Duration::hours(10)));
        assert!(session.is_finished(session.ends_at()));
        assert_eq!(session.remaining(started_at + Duration::hours(20)), Duration::zero());
    }

    #[test]
    fn tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SubscriptionTier::Monthly).unwrap(), "\"monthly\"");
        assert_eq!(serde_json::to_string(&WorkoutKind::CrossFit).unwrap(), "\"cross_fit\"");
    }
}
