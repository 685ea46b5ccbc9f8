use clap::Subcommand;
use fastout_core::error::Result;

use super::{print_json, Session};

#[derive(Subcommand)]
pub enum GameAction {
    /// Record a finished game; a high enough score unlocks temporary premium
    Report { score: u32 },
    /// Show high score, games played and unlocks
    Stats,
}

pub fn run(action: GameAction) -> Result<()> {
    let mut session = Session::open()?;

    match action {
        GameAction::Report { score } => {
            let report = session.store.report_game_result(score)?;
            session.save()?;
            print_json(&report)?;
        }
        GameAction::Stats => {
            print_json(session.store.game_stats())?;
        }
    }
    Ok(())
}
