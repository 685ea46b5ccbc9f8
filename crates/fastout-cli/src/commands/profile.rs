use clap::Subcommand;
use fastout_core::error::Result;
use serde_json::json;

use super::{print_json, Session};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show profile, points, streak and premium status
    Show,
}

pub fn run(action: ProfileAction) -> Result<()> {
    let session = Session::open()?;
    let store = &session.store;

    match action {
        ProfileAction::Show => {
            let state = store.state();
            print_json(&json!({
                "profile": state.profile,
                "points": state.points,
                "current_streak": state.current_streak,
                "subscription": state.subscription,
                "premium": store.premium_status(),
                "active_fast": state.active_fast,
                "workouts_logged": state.workout_history.len(),
                "game_stats": state.game_stats,
            }))?;
        }
    }
    Ok(())
}
