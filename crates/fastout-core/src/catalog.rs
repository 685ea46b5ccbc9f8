//! Built-in fasting protocols and workout types, with their point values
//! and premium gating.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ValidationError;
use crate::model::{FastingSession, WorkoutKind};
use crate::rules::Rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FastingProtocol {
    pub name: &'static str,
    pub hours: u32,
    pub description: &'static str,
    pub points: u32,
    pub premium: bool,
}

pub const FASTING_PROTOCOLS: [FastingProtocol; 4] = [
    FastingProtocol {
        name: "16:8",
        hours: 16,
        description: "Most popular protocol",
        points: 20,
        premium: false,
    },
    FastingProtocol {
        name: "18:6",
        hours: 18,
        description: "Intermediate level",
        points: 30,
        premium: false,
    },
    FastingProtocol {
        name: "20:4",
        hours: 20,
        description: "Advanced protocol",
        points: 40,
        premium: true,
    },
    FastingProtocol {
        name: "OMAD",
        hours: 23,
        description: "One meal a day",
        points: 60,
        premium: true,
    },
];

impl FastingProtocol {
    /// A session of this protocol starting at `started_at`.
    pub fn session(&self, started_at: DateTime<Utc>) -> FastingSession {
        FastingSession {
            protocol: self.name.to_string(),
            target_hours: self.hours,
            description: self.description.to_string(),
            points: self.points,
            premium: self.premium,
            started_at,
        }
    }
}

/// Case-insensitive protocol lookup.
pub fn fasting_protocol(name: &str) -> Result<&'static FastingProtocol, ValidationError> {
    FASTING_PROTOCOLS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| ValidationError::Unknown {
            kind: "fasting protocol",
            name: name.to_string(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkoutType {
    pub kind: WorkoutKind,
    pub base_points: u32,
    pub premium: bool,
}

pub fn workout_type(kind: WorkoutKind) -> WorkoutType {
    let (base_points, premium) = match kind {
        WorkoutKind::StrengthTraining => (25, false),
        WorkoutKind::Cardio => (20, false),
        WorkoutKind::Hiit => (35, true),
        WorkoutKind::Yoga => (15, false),
        WorkoutKind::CrossFit => (40, true),
    };
    WorkoutType {
        kind,
        base_points,
        premium,
    }
}

pub fn workout_types() -> impl Iterator<Item = WorkoutType> {
    WorkoutKind::ALL.into_iter().map(workout_type)
}

/// Points for one logged workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkoutPoints {
    pub base: u32,
    pub bonus: u32,
    pub total: u32,
}

/// Base points of the workout type plus the long-session bonus,
/// `floor(base * pct / 100)`, once `minutes` reaches the threshold.
pub fn workout_points(kind: WorkoutKind, minutes: u32, rules: &Rules) -> WorkoutPoints {
    let base = workout_type(kind).base_points;
    let bonus = if minutes >= rules.long_workout_minutes {
        base.saturating_mul(rules.long_workout_bonus_pct) / 100
    } else {
        0
    };
    WorkoutPoints {
        base,
        bonus,
        total: base.saturating_add(bonus),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_lookup_ignores_case() {
        assert_eq!(fasting_protocol("omad").unwrap().hours, 23);
        assert_eq!(fasting_protocol("16:8").unwrap().points, 20);
        assert!(fasting_protocol("5:2").is_err());
    }

    #[test]
    fn premium_protocols() {
        let premium: Vec<_> = FASTING_PROTOCOLS.iter().filter(|p| p.premium).map(|p| p.name).collect();
        assert_eq!(premium, ["20:4", "OMAD"]);
    }

    #[test]
    fn cardio_long_session_gets_half_bonus() {
        let pts = workout_points(WorkoutKind::Cardio, 50, &Rules::default());
        assert_eq!(pts, WorkoutPoints { base: 20, bonus: 10, total: 30 });
    }

    #[test]
    fn bonus_starts_at_threshold() {
        let rules = Rules::default();
        assert_eq!(workout_points(WorkoutKind::Yoga, 44, &rules).bonus, 0);
        // floor(15 * 0.5)
        assert_eq!(workout_points(WorkoutKind::Yoga, 45, &rules).bonus, 7);
    }

    #[test]
    fn every_kind_has_a_type() {
        assert_eq!(workout_types().count(), 5);
        assert!(workout_type(WorkoutKind::Hiit).premium);
        assert!(!workout_type(WorkoutKind::StrengthTraining).premium);
    }
}
