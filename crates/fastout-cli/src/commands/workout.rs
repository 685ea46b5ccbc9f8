use clap::Subcommand;
use fastout_core::catalog::workout_types;
use fastout_core::error::Result;
use fastout_core::WorkoutKind;
use serde_json::json;

use super::{print_json, Session};

#[derive(Subcommand)]
pub enum WorkoutAction {
    /// Log a workout and earn its points
    Log {
        /// Workout type (e.g. "cardio", "strength-training", "hiit")
        kind: String,
        /// Duration in minutes
        minutes: u32,
    },
    /// Show logged workouts, most recent first
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show available workout types
    Types,
}

pub fn run(action: WorkoutAction) -> Result<()> {
    let mut session = Session::open()?;

    match action {
        WorkoutAction::Log { kind, minutes } => {
            let kind: WorkoutKind = kind.parse()?;
            let events = session.store.log_workout(kind, minutes)?;
            session.save()?;
            print_json(&events)?;
        }
        WorkoutAction::List { limit } => {
            let history = session.store.workout_history();
            let shown = &history[..limit.unwrap_or(history.len()).min(history.len())];
            print_json(shown)?;
        }
        WorkoutAction::Types => {
            let premium = session.store.is_user_premium();
            let types: Vec<_> = workout_types()
                .map(|t| {
                    json!({
                        "name": t.kind.display_name(),
                        "base_points": t.base_points,
                        "premium": t.premium,
                        "locked": t.premium && !premium,
                    })
                })
                .collect();
            print_json(&types)?;
        }
    }
    Ok(())
}
