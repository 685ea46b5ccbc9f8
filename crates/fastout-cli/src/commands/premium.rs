use clap::Subcommand;
use fastout_core::error::Result;
use serde_json::json;

use super::{print_json, Session};

#[derive(Subcommand)]
pub enum PremiumAction {
    /// Show whether premium is active and where it comes from
    Status,
}

pub fn run(action: PremiumAction) -> Result<()> {
    let session = Session::open()?;
    let store = &session.store;

    match action {
        PremiumAction::Status => {
            print_json(&json!({
                "premium": store.is_user_premium(),
                "status": store.premium_status(),
                "subscription": store.subscription(),
                "temporary_premium": store.temporary_premium(),
            }))?;
        }
    }
    Ok(())
}
