//! # FastOut Core Library
//!
//! Business logic behind the FastOut fitness app: points and streaks,
//! workout history, fasting sessions, and premium entitlements earned by
//! subscription or by the mini-game. Front ends (the mobile screens, the
//! `fastout` CLI) only read the store and call its operations.
//!
//! ## Architecture
//!
//! - **Store**: one explicit [`UserStore`] value per running app, owning the
//!   full [`UserState`] snapshot; time comes from an injected [`Clock`]
//! - **Entitlement**: premium is recomputed from expiry timestamps on every
//!   query, never cached
//! - **Catalog**: built-in fasting protocols, workout types, point bonuses
//! - **Integrations**: payment processor and identity provider behind
//!   [`PaymentGateway`] and [`IdentityProvider`]
//! - **Storage**: TOML configuration and an SQLite snapshot store
//!
//! ## Key Components
//!
//! - [`UserStore`]: state owner and mutation API
//! - [`Event`]: result of every state change
//! - [`Config`]: application configuration
//! - [`Database`]: snapshot persistence for long-lived front ends

pub mod catalog;
pub mod clock;
pub mod entitlement;
pub mod error;
pub mod events;
pub mod integrations;
pub mod model;
pub mod rules;
pub mod storage;
pub mod store;

pub use catalog::{fasting_protocol, workout_points, FastingProtocol, WorkoutPoints, FASTING_PROTOCOLS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entitlement::PremiumStatus;
pub use error::{
    AuthError, ConfigError, CoreError, DatabaseError, EntitlementError, PaymentError,
    ValidationError,
};
pub use events::Event;
pub use integrations::{
    checkout, AuthSession, HttpIdentityProvider, HttpPaymentGateway, IdentityProvider,
    PaymentConfirmation, PaymentGateway, PaymentRequest, Pricing, SignUpOutcome,
};
pub use model::{
    FastingSession, GameStats, PaidPlan, SubscriptionState, SubscriptionTier,
    TemporaryPremiumGrant, UserProfile, UserState, Workout, WorkoutKind,
};
pub use rules::Rules;
pub use storage::{Config, Database};
pub use store::{GameOutcome, GameReport, UserStore};
