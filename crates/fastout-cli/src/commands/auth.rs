use chrono::{DateTime, Utc};
use clap::Subcommand;
use fastout_core::error::Result;
use fastout_core::integrations::identity::token_store;
use fastout_core::storage::SessionSummary;
use fastout_core::{
    AuthError, AuthSession, Config, Database, HttpIdentityProvider, IdentityProvider,
    SignUpOutcome, UserState,
};
use serde_json::{json, Value};

use super::print_json;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with email and password
    Login {
        email: String,
        #[arg(long, env = "FASTOUT_PASSWORD")]
        password: String,
    },
    /// Create an account
    Signup {
        email: String,
        #[arg(long, env = "FASTOUT_PASSWORD")]
        password: String,
    },
    /// Sign out and forget stored tokens
    Logout,
    /// Show who is signed in
    Status,
}

/// State to save for a sign-in, or `None` when the saved state already
/// belongs to an account. Guest progress is kept under the account profile.
fn adopt_account(
    existing: Option<UserState>,
    session: &AuthSession,
    now: DateTime<Utc>,
) -> Option<UserState> {
    match existing {
        None => Some(UserState::new(session.profile(now))),
        Some(mut state) if state.profile.email.is_empty() => {
            state.profile = session.profile(now);
            Some(state)
        }
        Some(_) => None,
    }
}

/// What sign-in commands print. Tokens stay in the keyring.
fn signed_in_view(session: &AuthSession) -> Value {
    json!({ "status": "signed_in", "signed_in": session.email, "user_id": session.user_id })
}

fn sign_up_view(outcome: &SignUpOutcome) -> Value {
    match outcome {
        SignUpOutcome::SignedIn { session } => signed_in_view(session),
        SignUpOutcome::ConfirmationPending { email } => {
            json!({ "status": "confirmation_pending", "email": email })
        }
    }
}

/// Persist the session and attach the saved progress to the account.
fn remember(db: &Database, session: &AuthSession) -> Result<()> {
    let now = Utc::now();
    token_store::save(session)?;
    db.save_session(&SessionSummary {
        user_id: session.user_id.clone(),
        email: session.email.clone(),
        signed_in_at: now,
    })?;

    if let Some(state) = adopt_account(db.load_state()?, session, now) {
        tracing::info!(email = %state.profile.email, "profile attached to account");
        db.save_state(&state)?;
    }
    Ok(())
}

pub fn run(action: AuthAction) -> Result<()> {
    let db = Database::open()?;

    match action {
        AuthAction::Login { email, password } => {
            let config = Config::load()?;
            let provider = HttpIdentityProvider::from_config(&config.auth)?;
            let session = provider.sign_in(&email, &password)?;
            remember(&db, &session)?;
            print_json(&signed_in_view(&session))?;
        }
        AuthAction::Signup { email, password } => {
            let config = Config::load()?;
            let provider = HttpIdentityProvider::from_config(&config.auth)?;
            let outcome = provider.sign_up(&email, &password)?;
            if let SignUpOutcome::SignedIn { session } = &outcome {
                remember(&db, session)?;
            }
            print_json(&sign_up_view(&outcome))?;
        }
        AuthAction::Logout => {
            let summary = db.load_session()?.ok_or(AuthError::NotSignedIn)?;
            if let Some(session) = token_store::load()? {
                let config = Config::load()?;
                let signed_out = HttpIdentityProvider::from_config(&config.auth)
                    .and_then(|provider| provider.sign_out(&session));
                // Local credentials are dropped even when the provider call fails.
                if let Err(e) = signed_out {
                    tracing::warn!(error = %e, "remote sign-out failed");
                }
            }
            token_store::clear()?;
            db.clear_session()?;
            print_json(&json!({ "signed_out": summary.email }))?;
        }
        AuthAction::Status => match db.load_session()? {
            Some(summary) => print_json(&summary)?,
            None => print_json(&json!({ "signed_in": false }))?,
        },
    }
    Ok(())
}
