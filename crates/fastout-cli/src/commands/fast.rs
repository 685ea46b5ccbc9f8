use chrono::Utc;
use clap::Subcommand;
use fastout_core::error::Result;
use fastout_core::{fasting_protocol, FASTING_PROTOCOLS};
use serde_json::json;

use super::{print_json, Session};

#[derive(Subcommand)]
pub enum FastAction {
    /// Show fasting protocols
    List,
    /// Start a fast (e.g. "16:8", "OMAD")
    Start { protocol: String },
    /// Collect the active fast's points once its target hours have passed
    Complete,
    /// Abandon the active fast
    Cancel,
    /// Show the active fast
    Status,
}

pub fn run(action: FastAction) -> Result<()> {
    let mut session = Session::open()?;

    match action {
        FastAction::List => {
            let premium = session.store.is_user_premium();
            let protocols: Vec<_> = FASTING_PROTOCOLS
                .iter()
                .map(|p| {
                    json!({
                        "name": p.name,
                        "hours": p.hours,
                        "description": p.description,
                        "points": p.points,
                        "premium": p.premium,
                        "locked": p.premium && !premium,
                    })
                })
                .collect();
            print_json(&protocols)?;
        }
        FastAction::Start { protocol } => {
            let protocol = fasting_protocol(&protocol)?;
            let event = session.store.start_fast(protocol)?;
            session.save()?;
            print_json(&event)?;
        }
        FastAction::Complete => {
            let event = session.store.complete_fast()?;
            session.save()?;
            print_json(&event)?;
        }
        FastAction::Cancel => {
            let event = session.store.cancel_fast();
            session.save()?;
            print_json(&event)?;
        }
        FastAction::Status => {
            let now = Utc::now();
            let active = session.store.active_fast();
            print_json(&json!({
                "active_fast": active,
                "ends_at": active.map(|f| f.ends_at()),
                "remaining_minutes": active.map(|f| (f.remaining(now).num_seconds() + 59) / 60),
                "finished": active.map(|f| f.is_finished(now)),
                "at": now,
            }))?;
        }
    }
    Ok(())
}
