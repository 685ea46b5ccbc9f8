//! Payment collaborator.
//!
//! The processor is asked to take payment for a plan; only a confirmed
//! purchase ever reaches [`UserStore::set_subscription`]. A failed purchase
//! leaves the store untouched.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{error_message, HttpRuntime};
use crate::clock::Clock;
use crate::error::{PaymentError, Result};
use crate::events::Event;
use crate::model::PaidPlan;
use crate::storage::config::PaymentConfig;
use crate::store::UserStore;

/// Plan prices in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    pub monthly_cents: u32,
    pub yearly_cents: u32,
}

impl Pricing {
    pub fn amount_cents(&self, plan: PaidPlan) -> u32 {
        match plan {
            PaidPlan::Monthly => self.monthly_cents,
            PaidPlan::Yearly => self.yearly_cents,
        }
    }
}

impl Default for Pricing {
    fn default() -> Self {
        PaymentConfig::default().pricing()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    #[serde(rename = "subscriptionType")]
    pub plan: PaidPlan,
    #[serde(rename = "amount")]
    pub amount_cents: u32,
}

/// Opaque proof of a processed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub client_secret: String,
    #[serde(default)]
    pub ephemeral_key: Option<String>,
    #[serde(default)]
    pub customer: Option<String>,
}

pub trait PaymentGateway {
    fn purchase(&self, request: &PaymentRequest) -> Result<PaymentConfirmation, PaymentError>;
}

/// Charge for `plan` and, only once the processor confirms, activate the
/// subscription on `store`.
pub fn checkout<C, G>(
    store: &mut UserStore<C>,
    gateway: &G,
    plan: PaidPlan,
    pricing: &Pricing,
) -> Result<(PaymentConfirmation, Event)>
where
    C: Clock,
    G: PaymentGateway + ?Sized,
{
    let request = PaymentRequest {
        plan,
        amount_cents: pricing.amount_cents(plan),
    };
    tracing::info!(%plan, amount_cents = request.amount_cents, "requesting payment");

    let confirmation = gateway.purchase(&request).map_err(|e| {
        tracing::warn!(%plan, error = %e, "payment failed");
        e
    })?;
    let event = store.set_subscription(plan);
    Ok((confirmation, event))
}

/// Gateway that posts the request as JSON to a payment-intent endpoint.
pub struct HttpPaymentGateway {
    endpoint: Url,
    http: HttpRuntime,
}

impl HttpPaymentGateway {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, PaymentError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| PaymentError::NotConfigured(format!("{endpoint}: {e}")))?;
        let http = HttpRuntime::new(timeout).map_err(PaymentError::Transport)?;
        Ok(Self { endpoint, http })
    }

    pub fn from_config(config: &PaymentConfig) -> Result<Self, PaymentError> {
        Self::new(&config.endpoint, Duration::from_secs(config.timeout_secs))
    }
}

impl PaymentGateway for HttpPaymentGateway {
    fn purchase(&self, request: &PaymentRequest) -> Result<PaymentConfirmation, PaymentError> {
        let (status, body) = self
            .http
            .block_on(async {
                let resp = self
                    .http
                    .client()
                    .post(self.endpoint.clone())
                    .json(request)
                    .send()
                    .await?;
                let status = resp.status();
                let body = resp.text().await?;
                Ok::<_, reqwest::Error>((status, body))
            })
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(PaymentError::Declined {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| PaymentError::InvalidResponse(e.to_string()))
    }
}
