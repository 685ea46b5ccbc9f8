//! Premium entitlement rules.
//!
//! Premium comes from two independent, time-limited sources: a paid
//! subscription and a temporary grant from the mini-game. Neither source is
//! trusted as a flag; both are judged against the current time on every
//! query, so an expired window simply stops counting without any sweep.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{PaidPlan, SubscriptionState, SubscriptionTier, TemporaryPremiumGrant};

/// Why a user is (or is not) premium right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PremiumStatus {
    Subscription {
        tier: SubscriptionTier,
        expires_at: DateTime<Utc>,
    },
    Temporary {
        expires_at: DateTime<Utc>,
    },
    Free,
}

impl PremiumStatus {
    pub fn is_premium(&self) -> bool {
        !matches!(self, PremiumStatus::Free)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            PremiumStatus::Subscription { expires_at, .. }
            | PremiumStatus::Temporary { expires_at } => Some(*expires_at),
            PremiumStatus::Free => None,
        }
    }
}

/// Expiry of a subscription bought at `now`.
///
/// Calendar arithmetic: the day of month is kept and clamped to the end of
/// a shorter target month (Jan 31 + 1 month = Feb 28 or 29).
pub fn subscription_expiry(plan: PaidPlan, now: DateTime<Utc>) -> DateTime<Utc> {
    let months = match plan {
        PaidPlan::Monthly => Months::new(1),
        PaidPlan::Yearly => Months::new(12),
    };
    // Only fails past year 262143.
    now.checked_add_months(months).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Expiry of a temporary grant of `hours` starting at `now`.
pub fn grant_expiry(hours: u32, now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_add_signed(Duration::hours(i64::from(hours)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn active_subscription(sub: &SubscriptionState, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if sub.tier() == SubscriptionTier::Free {
        return None;
    }
    sub.expires_at().filter(|expiry| *expiry > now)
}

fn active_grant(grant: &TemporaryPremiumGrant, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if !grant.active {
        return None;
    }
    grant.expires_at.filter(|expiry| *expiry > now)
}

/// Premium status at `now`. A live subscription wins over a live grant.
pub fn premium_status(
    sub: &SubscriptionState,
    grant: &TemporaryPremiumGrant,
    now: DateTime<Utc>,
) -> PremiumStatus {
    if let Some(expires_at) = active_subscription(sub, now) {
        return PremiumStatus::Subscription {
            tier: sub.tier(),
            expires_at,
        };
    }
    if let Some(expires_at) = active_grant(grant, now) {
        return PremiumStatus::Temporary { expires_at };
    }
    PremiumStatus::Free
}

/// True when either source is live at `now`. A missing expiry never counts.
pub fn is_premium(sub: &SubscriptionState, grant: &TemporaryPremiumGrant, now: DateTime<Utc>) -> bool {
    active_subscription(sub, now).is_some() || active_grant(grant, now).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn monthly_expiry_is_one_calendar_month() {
        assert_eq!(subscription_expiry(PaidPlan::Monthly, at(2025, 3, 15)), at(2025, 4, 15));
        // 28-day February, not a fixed 30-day offset
        assert_eq!(subscription_expiry(PaidPlan::Monthly, at(2025, 2, 1)), at(2025, 3, 1));
    }

    #[test]
    fn monthly_expiry_clamps_to_month_end() {
        assert_eq!(subscription_expiry(PaidPlan::Monthly, at(2025, 1, 31)), at(2025, 2, 28));
        assert_eq!(subscription_expiry(PaidPlan::Monthly, at(2024, 1, 31)), at(2024, 2, 29));
    }

    #[test]
    fn yearly_expiry_is_one_calendar_year() {
        assert_eq!(subscription_expiry(PaidPlan::Yearly, at(2024, 6, 1)), at(2025, 6, 1));
        assert_eq!(subscription_expiry(PaidPlan::Yearly, at(2024, 2, 29)), at(2025, 2, 28));
    }

    #[test]
    fn free_tier_is_never_premium() {
        let now = at(2025, 1, 1);
        let status = premium_status(&SubscriptionState::free(), &TemporaryPremiumGrant::inactive(), now);
        assert_eq!(status, PremiumStatus::Free);
        assert!(!status.is_premium());
    }

    #[test]
    fn expiry_is_exclusive() {
        let now = at(2025, 1, 1);
        let sub = SubscriptionState::paid(PaidPlan::Monthly, now);
        assert!(!is_premium(&sub, &TemporaryPremiumGrant::inactive(), now));

        let grant = TemporaryPremiumGrant::until(now);
        assert!(!is_premium(&SubscriptionState::free(), &grant, now));
    }

    #[test]
    fn active_flag_without_expiry_is_not_premium() {
        let grant = TemporaryPremiumGrant {
            active: true,
            expires_at: None,
        };
        assert!(!is_premium(&SubscriptionState::free(), &grant, at(2025, 1, 1)));
    }

    #[test]
    fn stale_grant_flag_is_ignored() {
        let now = at(2025, 1, 2);
        let grant = TemporaryPremiumGrant::until(at(2025, 1, 1));
        assert!(grant.active);
        assert!(!is_premium(&SubscriptionState::free(), &grant, now));
    }

    #[test]
    fn either_source_suffices() {
        let now = at(2025, 5, 10);
        let expired_sub = SubscriptionState::paid(PaidPlan::Monthly, at(2025, 5, 1));
        let live_grant = TemporaryPremiumGrant::until(now + Duration::hours(3));
        assert_eq!(
            premium_status(&expired_sub, &live_grant, now),
            PremiumStatus::Temporary {
                expires_at: now + Duration::hours(3)
            }
        );

        let live_sub = SubscriptionState::paid(PaidPlan::Yearly, at(2026, 5, 10));
        assert!(is_premium(&live_sub, &TemporaryPremiumGrant::inactive(), now));
    }

    #[test]
    fn subscription_reported_before_grant() {
        let now = at(2025, 5, 10);
        let sub = SubscriptionState::paid(PaidPlan::Monthly, at(2025, 6, 10));
        let grant = TemporaryPremiumGrant::until(now + Duration::hours(24));
        let status = premium_status(&sub, &grant, now);
        assert!(matches!(status, PremiumStatus::Subscription { tier: SubscriptionTier::Monthly, .. }));
        assert_eq!(status.expires_at(), Some(at(2025, 6, 10)));
    }
}
