//! Identity collaborator.
//!
//! Sign-in, sign-up and sign-out against a hosted auth REST API
//! (`/auth/v1/...`). The store never sees credentials; it only receives a
//! [`UserProfile`] snapshot built from a session.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use super::{error_message, keyring_store, HttpRuntime};
use crate::error::AuthError;
use crate::model::UserProfile;
use crate::storage::config::AuthConfig;

const SESSION_KEY: &str = "auth_session";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    /// Profile snapshot for a fresh store. The display name is the local
    /// part of the email.
    pub fn profile(&self, now: DateTime<Utc>) -> UserProfile {
        let name = self
            .email
            .split('@')
            .next()
            .filter(|local| !local.is_empty())
            .unwrap_or(&self.email)
            .to_string();
        UserProfile {
            name,
            email: self.email.clone(),
            joined_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SignUpOutcome {
    SignedIn { session: AuthSession },
    /// Account created; the provider wants the email confirmed first.
    ConfirmationPending { email: String },
}

pub trait IdentityProvider {
    fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;
    fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError>;
    fn sign_out(&self, session: &AuthSession) -> Result<(), AuthError>;
}

fn require_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(())
}

#[derive(Deserialize)]
struct ApiUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    user: Option<ApiUser>,
    // Sign-up without a session returns the user at the top level.
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl TokenResponse {
    fn into_session(self, fallback_email: &str) -> Option<AuthSession> {
        let access_token = self.access_token?;
        let user = self.user?;
        Some(AuthSession {
            user_id: user.id,
            email: user.email.unwrap_or_else(|| fallback_email.to_string()),
            access_token,
            refresh_token: self.refresh_token,
            expires_at: self
                .expires_in
                .map(|secs| Utc::now() + chrono::Duration::seconds(secs)),
        })
    }
}

pub struct HttpIdentityProvider {
    base: Url,
    anon_key: String,
    http: HttpRuntime,
}

impl HttpIdentityProvider {
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> Result<Self, AuthError> {
        if base_url.trim().is_empty() {
            return Err(AuthError::NotConfigured("auth.url is empty".into()));
        }
        let base = Url::parse(base_url)
            .map_err(|e| AuthError::NotConfigured(format!("{base_url}: {e}")))?;
        let http = HttpRuntime::new(timeout).map_err(AuthError::Transport)?;
        Ok(Self {
            base,
            anon_key: anon_key.to_string(),
            http,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Self::new(
            &config.url,
            &config.anon_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        self.base
            .join(path)
            .map_err(|e| AuthError::NotConfigured(e.to_string()))
    }

    /// POST `body` and return the raw response body on 2xx.
    fn post(
        &self,
        action: &'static str,
        url: Url,
        bearer: Option<&str>,
        body: serde_json::Value,
    ) -> Result<String, AuthError> {
        let (status, text) = self
            .http
            .block_on(async {
                let mut req = self
                    .http
                    .client()
                    .post(url)
                    .header("apikey", &self.anon_key)
                    .json(&body);
                if let Some(token) = bearer {
                    req = req.bearer_auth(token);
                }
                let resp = req.send().await?;
                let status = resp.status();
                let text = resp.text().await?;
                Ok::<_, reqwest::Error>((status, text))
            })
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(action, status = status.as_u16(), "identity request rejected");
            return Err(AuthError::Rejected {
                action,
                status: status.as_u16(),
                message: error_message(&text),
            });
        }
        Ok(text)
    }
}

impl IdentityProvider for HttpIdentityProvider {
    fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        require_credentials(email, password)?;
        let url = self.endpoint("auth/v1/token?grant_type=password")?;
        let body = self.post(
            "sign-in",
            url,
            None,
            json!({ "email": email, "password": password }),
        )?;
        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        let session = parsed
            .into_session(email)
            .ok_or_else(|| AuthError::InvalidResponse("missing access token or user".into()))?;
        tracing::info!(user_id = %session.user_id, "signed in");
        Ok(session)
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        require_credentials(email, password)?;
        let url = self.endpoint("auth/v1/signup")?;
        let body = self.post(
            "sign-up",
            url,
            None,
            json!({ "email": email, "password": password }),
        )?;
        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        if parsed.access_token.is_some() {
            let session = parsed
                .into_session(email)
                .ok_or_else(|| AuthError::InvalidResponse("session without user".into()))?;
            return Ok(SignUpOutcome::SignedIn { session });
        }
        if parsed.id.is_none() && parsed.user.is_none() {
            return Err(AuthError::InvalidResponse("no user in sign-up response".into()));
        }
        Ok(SignUpOutcome::ConfirmationPending {
            email: parsed.email.unwrap_or_else(|| email.to_string()),
        })
    }

    fn sign_out(&self, session: &AuthSession) -> Result<(), AuthError> {
        let url = self.endpoint("auth/v1/logout")?;
        self.post("sign-out", url, Some(&session.access_token), json!({}))?;
        tracing::info!(user_id = %session.user_id, "signed out");
        Ok(())
    }
}

/// Session tokens kept in the OS keyring.
pub mod token_store {
    use super::*;

    pub fn save(session: &AuthSession) -> Result<(), AuthError> {
        let json =
            serde_json::to_string(session).map_err(|e| AuthError::Keyring(e.to_string()))?;
        keyring_store::set(SESSION_KEY, &json)
    }

    pub fn load() -> Result<Option<AuthSession>, AuthError> {
        match keyring_store::get(SESSION_KEY)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| AuthError::Keyring(e.to_string())),
            None => Ok(None),
        }
    }

    pub fn clear() -> Result<(), AuthError> {
        keyring_store::delete(SESSION_KEY)
    }
}
