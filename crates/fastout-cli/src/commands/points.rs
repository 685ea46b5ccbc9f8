use clap::Subcommand;
use fastout_core::error::Result;

use super::{print_json, Session};

#[derive(Subcommand)]
pub enum PointsAction {
    /// Add points to the running total
    Add {
        /// Non-negative amount
        amount: u32,
    },
    /// Print the current total and streak
    Show,
}

pub fn run(action: PointsAction) -> Result<()> {
    let mut session = Session::open()?;

    match action {
        PointsAction::Add { amount } => {
            let event = session.store.add_points(amount)?;
            session.save()?;
            print_json(&event)?;
        }
        PointsAction::Show => {
            print_json(&session.store.snapshot())?;
        }
    }
    Ok(())
}
