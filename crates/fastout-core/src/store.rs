//! Entitlement & progression store.
//!
//! [`UserStore`] owns the whole [`UserState`] snapshot and is the only
//! thing that mutates it. It is an explicit value constructed by the
//! application and passed to whoever needs it; there is no global
//! instance. Every mutation validates first and then applies all of its
//! changes, so a returned error always means nothing changed.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = UserStore::new(profile);
//! store.log_workout(WorkoutKind::Cardio, 50)?;
//! let report = store.report_game_result(240)?;
//! assert!(store.is_user_premium());
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::{self, FastingProtocol};
use crate::clock::{Clock, SystemClock};
use crate::entitlement::{self, PremiumStatus};
use crate::error::{EntitlementError, Result, ValidationError};
use crate::events::Event;
use crate::model::{
    FastingSession, GameStats, PaidPlan, SubscriptionState, TemporaryPremiumGrant, UserProfile,
    UserState, Workout, WorkoutKind,
};
use crate::rules::Rules;

/// Result of the mini-game unlock check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GameOutcome {
    Unlocked { expires_at: DateTime<Utc> },
    /// Score qualified but the user already had premium; nothing granted.
    AlreadyPremium,
    BelowThreshold { needed: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameReport {
    pub outcome: GameOutcome,
    pub events: Vec<Event>,
}

/// Precomputed effect of a point award.
struct Award {
    amount: u32,
    total: u64,
    streak: u32,
    extends_streak: bool,
}

pub struct UserStore<C: Clock = SystemClock> {
    state: UserState,
    rules: Rules,
    clock: C,
}

impl UserStore<SystemClock> {
    /// Fresh store on the wall clock.
    pub fn new(profile: UserProfile) -> Self {
        Self::with_clock(profile, SystemClock)
    }
}

impl<C: Clock> UserStore<C> {
    pub fn with_clock(profile: UserProfile, clock: C) -> Self {
        Self::from_state(UserState::new(profile), clock)
    }

    /// Rebuild a store around a previously saved snapshot.
    pub fn from_state(state: UserState, clock: C) -> Self {
        Self {
            state,
            rules: Rules::default(),
            clock,
        }
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &UserState {
        &self.state
    }

    pub fn into_state(self) -> UserState {
        self.state
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn profile(&self) -> &UserProfile {
        &self.state.profile
    }

    pub fn points(&self) -> u64 {
        self.state.points
    }

    pub fn current_streak(&self) -> u32 {
        self.state.current_streak
    }

    /// Most recent first.
    pub fn workout_history(&self) -> &[Workout] {
        &self.state.workout_history
    }

    pub fn active_fast(&self) -> Option<&FastingSession> {
        self.state.active_fast.as_ref()
    }

    pub fn subscription(&self) -> &SubscriptionState {
        &self.state.subscription
    }

    pub fn temporary_premium(&self) -> &TemporaryPremiumGrant {
        &self.state.temporary_premium
    }

    pub fn game_stats(&self) -> &GameStats {
        &self.state.game_stats
    }

    /// Whether either premium source is live at this moment.
    pub fn is_user_premium(&self) -> bool {
        entitlement::is_premium(
            &self.state.subscription,
            &self.state.temporary_premium,
            self.clock.now(),
        )
    }

    pub fn premium_status(&self) -> PremiumStatus {
        entitlement::premium_status(
            &self.state.subscription,
            &self.state.temporary_premium,
            self.clock.now(),
        )
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            name: self.state.profile.name.clone(),
            points: self.state.points,
            current_streak: self.state.current_streak,
            premium: self.premium_status(),
            active_fast: self.state.active_fast.as_ref().map(|f| f.protocol.clone()),
            workouts_logged: self.state.workout_history.len(),
            at: self.clock.now(),
        }
    }

    // ── Primitive operations ─────────────────────────────────────────

    /// Add `amount` to the running total. An award of at least the streak
    /// threshold extends the streak by one.
    pub fn add_points(&mut self, amount: u32) -> Result<Event> {
        let award = self.plan_award(amount)?;
        Ok(self.apply_award(award))
    }

    /// Prepend a workout to the history, dropping the oldest entries past
    /// the history limit. Awards no points.
    pub fn add_workout(&mut self, entry: Workout) -> Result<Event> {
        if entry.duration_min == 0 {
            return Err(ValidationError::NotPositive {
                field: "duration_min",
            }
            .into());
        }
        Ok(self.push_workout(entry))
    }

    /// Replace the active fast wholesale. `None` means completed or cancelled.
    ///
    /// Premium gating is not applied here; see [`UserStore::start_fast`].
    pub fn set_active_fast(&mut self, session: Option<FastingSession>) -> Result<Event> {
        let at = self.clock.now();
        match session {
            Some(session) => {
                if session.target_hours == 0 {
                    return Err(ValidationError::NotPositive {
                        field: "target_hours",
                    }
                    .into());
                }
                tracing::info!(protocol = %session.protocol, "fast started");
                self.state.active_fast = Some(session.clone());
                Ok(Event::FastStarted { session, at })
            }
            None => {
                let previous = self.state.active_fast.take();
                tracing::info!(
                    protocol = previous.as_ref().map(|f| f.protocol.as_str()),
                    "fast cleared"
                );
                Ok(Event::FastCleared {
                    session: previous,
                    at,
                })
            }
        }
    }

    /// Activate a paid subscription. Assumes payment already succeeded.
    ///
    /// Any temporary grant is cleared; the subscription supersedes it.
    pub fn set_subscription(&mut self, plan: PaidPlan) -> Event {
        let now = self.clock.now();
        let expires_at = entitlement::subscription_expiry(plan, now);
        let superseded_temporary = entitlement::is_premium(
            &SubscriptionState::free(),
            &self.state.temporary_premium,
            now,
        );

        self.state.subscription = SubscriptionState::paid(plan, expires_at);
        self.state.temporary_premium = TemporaryPremiumGrant::inactive();

        tracing::info!(%plan, %expires_at, superseded_temporary, "subscription activated");
        Event::SubscriptionActivated {
            tier: plan.into(),
            expires_at,
            superseded_temporary,
            at: now,
        }
    }

    /// Grant premium for `hours` from now and count the unlock.
    ///
    /// Repeated calls reset the expiry and count again; existing premium is
    /// not checked.
    pub fn activate_temporary_premium(&mut self, hours: u32) -> Result<Event> {
        if hours == 0 {
            return Err(ValidationError::NotPositive { field: "hours" }.into());
        }
        Ok(self.grant_temporary(hours).1)
    }

    /// Record one finished game. Does not decide unlocking; see
    /// [`UserStore::report_game_result`].
    pub fn update_game_stats(&mut self, score: u32) -> Event {
        let stats = &mut self.state.game_stats;
        let new_high_score = score > stats.high_score;
        stats.high_score = stats.high_score.max(score);
        stats.games_played = stats.games_played.saturating_add(1);

        tracing::debug!(score, high_score = stats.high_score, "game recorded");
        Event::GameRecorded {
            score,
            high_score: stats.high_score,
            games_played: stats.games_played,
            new_high_score,
            at: self.clock.now(),
        }
    }

    // ── Composite operations ─────────────────────────────────────────

    /// Log a workout of `kind`, applying premium gating and the long-session
    /// bonus, and award its points.
    pub fn log_workout(&mut self, kind: WorkoutKind, minutes: u32) -> Result<Vec<Event>> {
        if minutes == 0 {
            return Err(ValidationError::NotPositive {
                field: "duration_min",
            }
            .into());
        }
        if catalog::workout_type(kind).premium && !self.is_user_premium() {
            tracing::warn!(%kind, "premium workout rejected");
            return Err(EntitlementError::PremiumRequired {
                feature: kind.display_name().to_string(),
            }
            .into());
        }

        let points = catalog::workout_points(kind, minutes, &self.rules);
        let award = self.plan_award(points.total)?;
        let workout = Workout {
            kind,
            duration_min: minutes,
            points: points.total,
            logged_at: self.clock.now(),
        };

        let logged = self.push_workout(workout);
        let awarded = self.apply_award(award);
        Ok(vec![logged, awarded])
    }

    /// Start a catalog protocol. Premium protocols need premium, and only
    /// one fast may run at a time.
    pub fn start_fast(&mut self, protocol: &FastingProtocol) -> Result<Event> {
        if let Some(active) = &self.state.active_fast {
            return Err(ValidationError::FastAlreadyActive {
                protocol: active.protocol.clone(),
            }
            .into());
        }
        if protocol.premium && !self.is_user_premium() {
            tracing::warn!(protocol = protocol.name, "premium protocol rejected");
            return Err(EntitlementError::PremiumRequired {
                feature: protocol.name.to_string(),
            }
            .into());
        }
        let now = self.clock.now();
        self.set_active_fast(Some(protocol.session(now)))
    }

    /// Finish the active fast once its target hours have elapsed: award its
    /// points and clear it.
    pub fn complete_fast(&mut self) -> Result<Event> {
        let now = self.clock.now();
        let active = self
            .state
            .active_fast
            .as_ref()
            .ok_or(ValidationError::NoActiveFast)?;
        if !active.is_finished(now) {
            let remaining = active.remaining(now);
            return Err(ValidationError::FastNotFinished {
                protocol: active.protocol.clone(),
                ends_at: active.ends_at(),
                remaining_minutes: (remaining.num_seconds() + 59) / 60,
            }
            .into());
        }
        let points = active.points;
        let award = self.plan_award(points)?;

        let Some(session) = self.state.active_fast.take() else {
            return Err(ValidationError::NoActiveFast.into());
        };
        let total = award.total;
        let streak = award.streak;
        self.apply_award(award);

        tracing::info!(protocol = %session.protocol, points, "fast completed");
        Ok(Event::FastCompleted {
            session,
            points_awarded: points,
            total,
            streak,
            at: now,
        })
    }

    /// Drop the active fast without awarding anything.
    pub fn cancel_fast(&mut self) -> Event {
        let at = self.clock.now();
        let session = self.state.active_fast.take();
        tracing::info!(
            protocol = session.as_ref().map(|f| f.protocol.as_str()),
            "fast cancelled"
        );
        Event::FastCleared { session, at }
    }

    /// Record a game and, when the score reaches the unlock threshold and
    /// the user is not already premium, grant temporary premium.
    pub fn report_game_result(&mut self, score: u32) -> Result<GameReport> {
        let threshold = self.rules.game_unlock_score;
        let hours = self.rules.game_unlock_hours;
        if score >= threshold && hours == 0 {
            return Err(ValidationError::NotPositive {
                field: "game_unlock_hours",
            }
            .into());
        }

        let was_premium = self.is_user_premium();
        let mut events = vec![self.update_game_stats(score)];

        let outcome = if score < threshold {
            GameOutcome::BelowThreshold {
                needed: threshold - score,
            }
        } else if was_premium {
            GameOutcome::AlreadyPremium
        } else {
            let (expires_at, event) = self.grant_temporary(hours);
            events.push(event);
            GameOutcome::Unlocked { expires_at }
        };

        Ok(GameReport { outcome, events })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// `hours` must already be validated as non-zero.
    fn grant_temporary(&mut self, hours: u32) -> (DateTime<Utc>, Event) {
        let now = self.clock.now();
        let expires_at = entitlement::grant_expiry(hours, now);

        self.state.temporary_premium = TemporaryPremiumGrant::until(expires_at);
        let stats = &mut self.state.game_stats;
        stats.premium_unlocks = stats.premium_unlocks.saturating_add(1);

        tracing::info!(hours, %expires_at, "temporary premium activated");
        let event = Event::TemporaryPremiumActivated {
            expires_at,
            premium_unlocks: stats.premium_unlocks,
            at: now,
        };
        (expires_at, event)
    }

    fn plan_award(&self, amount: u32) -> Result<Award> {
        let total = self
            .state
            .points
            .checked_add(u64::from(amount))
            .ok_or(ValidationError::Overflow { field: "points" })?;
        let extends_streak = amount >= self.rules.streak_threshold;
        let streak = if extends_streak {
            self.state.current_streak.saturating_add(1)
        } else {
            self.state.current_streak
        };
        Ok(Award {
            amount,
            total,
            streak,
            extends_streak,
        })
    }

    fn apply_award(&mut self, award: Award) -> Event {
        self.state.points = award.total;
        self.state.current_streak = award.streak;
        tracing::debug!(
            amount = award.amount,
            total = award.total,
            streak = award.streak,
            "points awarded"
        );
        Event::PointsAwarded {
            amount: award.amount,
            total: award.total,
            streak: award.streak,
            streak_extended: award.extends_streak,
            at: self.clock.now(),
        }
    }

    fn push_workout(&mut self, entry: Workout) -> Event {
        let history = &mut self.state.workout_history;
        history.insert(0, entry.clone());
        history.truncate(self.rules.workout_history_limit);
        tracing::debug!(kind = %entry.kind, minutes = entry.duration_min, "workout logged");
        Event::WorkoutLogged {
            workout: entry,
            history_len: history.len(),
            at: self.clock.now(),
        }
    }
}
