//! External collaborators: the payment processor and the identity
//! provider. Both are reached over HTTP and stay behind narrow traits so
//! the store never depends on them directly.

pub mod identity;
pub mod payment;

pub use identity::{AuthSession, HttpIdentityProvider, IdentityProvider, SignUpOutcome};
pub use payment::{
    checkout, HttpPaymentGateway, PaymentConfirmation, PaymentGateway, PaymentRequest, Pricing,
};

use std::future::Future;
use std::time::Duration;

/// Blocking façade over an async reqwest client.
///
/// Each client owns a current-thread runtime so callers stay synchronous,
/// matching the single-threaded store.
pub(crate) struct HttpRuntime {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl HttpRuntime {
    pub(crate) fn new(timeout: Duration) -> Result<Self, String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| e.to_string())?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| e.to_string())?;
        Ok(Self { client, runtime })
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub(crate) fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }
}

/// Pull a human-readable message out of an error body.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|k| v.get(k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// OS keyring entries under the `fastout` service.
///
/// The only value kept here is the signed-in `AuthSession` as
/// JSON, written through `identity::token_store`. Missing entries read as
/// `None` and deleting one is a no-op.
pub mod keyring_store {
    use crate::error::AuthError;

    const SERVICE: &str = "fastout";

    pub fn get(key: &str) -> Result<Option<String>, AuthError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), AuthError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), AuthError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
