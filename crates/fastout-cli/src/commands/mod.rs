pub mod auth;
pub mod config;
pub mod fast;
pub mod game;
pub mod points;
pub mod premium;
pub mod profile;
pub mod subscribe;
pub mod workout;

use chrono::Utc;
use fastout_core::error::Result;
use fastout_core::{Config, Database, SystemClock, UserProfile, UserState, UserStore};
use serde::Serialize;

/// Everything a command needs: the saved snapshot wrapped in a live store.
pub struct Session {
    pub db: Database,
    pub config: Config,
    pub store: UserStore,
}

impl Session {
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        let db = Database::open()?;
        let state = match db.load_state()? {
            Some(state) => state,
            None => UserState::new(guest_profile()),
        };
        let store = UserStore::from_state(state, SystemClock).with_rules(config.rules);
        Ok(Self { db, config, store })
    }

    pub fn save(&self) -> Result<()> {
        self.db.save_state(self.store.state())
    }
}

/// Profile used until someone signs in.
pub fn guest_profile() -> UserProfile {
    UserProfile {
        name: "Guest".into(),
        email: String::new(),
        joined_at: Utc::now(),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn reset() -> Result<()> {
    let db = Database::open()?;
    db.clear_state()?;
    println!("progress reset");
    Ok(())
}
