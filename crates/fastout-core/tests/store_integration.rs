//! Integration tests for the progression store and premium entitlements.

use chrono::{DateTime, Duration, Months, TimeZone, Utc};
use fastout_core::{
    Event, GameOutcome, ManualClock, PaidPlan, PremiumStatus, UserProfile, UserStore, Workout,
    WorkoutKind,
};
use proptest::prelude::*;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 7, 30, 0).unwrap()
}

fn fresh_store() -> UserStore<ManualClock> {
    let profile = UserProfile {
        name: "Alex".into(),
        email: "alex@example.com".into(),
        joined_at: start(),
    };
    UserStore::with_clock(profile, ManualClock::new(start()))
}

fn cardio(minutes: u32, at: DateTime<Utc>) -> Workout {
    Workout {
        kind: WorkoutKind::Cardio,
        duration_min: minutes,
        points: 0,
        logged_at: at,
    }
}

proptest! {
    #[test]
    fn total_equals_sum_of_awards(awards in proptest::collection::vec(0u32..10_000, 0..64)) {
        let mut store = fresh_store();
        for &p in &awards {
            store.add_points(p).unwrap();
        }
        let expected: u64 = awards.iter().map(|&p| u64::from(p)).sum();
        prop_assert_eq!(store.points(), expected);
    }

    #[test]
    fn streak_counts_qualifying_awards(awards in proptest::collection::vec(0u32..100, 0..64)) {
        let mut store = fresh_store();
        let mut last = 0;
        for &p in &awards {
            store.add_points(p).unwrap();
            let streak = store.current_streak();
            prop_assert!(streak >= last);
            prop_assert_eq!(streak - last, u32::from(p >= 30));
            last = streak;
        }
    }
}

#[test]
fn twenty_one_workouts_keep_twenty_newest() {
    let mut store = fresh_store();
    for i in 0..21 {
        store
            .add_workout(cardio(10 + i, start() + Duration::minutes(i64::from(i))))
            .unwrap();
    }
    let history = store.workout_history();
    assert_eq!(history.len(), 20);
    let minutes: Vec<u32> = history.iter().map(|w| w.duration_min).collect();
    let expected: Vec<u32> = (11..=30).rev().collect();
    assert_eq!(minutes, expected);
}

#[test]
fn monthly_subscription_is_premium_for_one_calendar_month() {
    let mut store = fresh_store();
    store.set_subscription(PaidPlan::Monthly);
    assert!(store.is_user_premium());

    let expiry = store.subscription().expires_at().unwrap();
    assert_eq!(expiry, start().checked_add_months(Months::new(1)).unwrap());

    store.clock().set(expiry - Duration::seconds(1));
    assert!(store.is_user_premium());
    store.clock().set(expiry);
    assert!(!store.is_user_premium());
}

#[test]
fn yearly_subscription_clears_temporary_grant() {
    let mut store = fresh_store();
    store.activate_temporary_premium(24).unwrap();
    assert!(store.temporary_premium().active);

    store.set_subscription(PaidPlan::Yearly);
    assert!(!store.temporary_premium().active);
    assert!(matches!(
        store.premium_status(),
        PremiumStatus::Subscription { .. }
    ));
}

#[test]
fn temporary_grant_lapses_after_its_hours() {
    let mut store = fresh_store();
    store.activate_temporary_premium(24).unwrap();
    assert!(store.is_user_premium());

    store.clock().advance(Duration::hours(25));
    assert!(!store.is_user_premium());
    assert_eq!(store.premium_status(), PremiumStatus::Free);
}

#[test]
fn live_grant_covers_expired_subscription() {
    let mut store = fresh_store();
    store.set_subscription(PaidPlan::Monthly);
    store.clock().advance(Duration::days(40));
    assert!(!store.is_user_premium());

    store.activate_temporary_premium(24).unwrap();
    assert!(store.is_user_premium());
    assert!(matches!(
        store.premium_status(),
        PremiumStatus::Temporary { .. }
    ));
}

#[test]
fn game_stats_keep_high_score() {
    let mut store = fresh_store();
    store.update_game_stats(150);
    store.update_game_stats(90);
    assert_eq!(store.game_stats().high_score, 150);
    assert_eq!(store.game_stats().games_played, 2);
    assert_eq!(store.game_stats().premium_unlocks, 0);
}

#[test]
fn cardio_bonus_scenario() {
    let mut store = fresh_store();
    store.add_workout(cardio(50, start())).unwrap();
    let before = store.points();

    let points = fastout_core::workout_points(WorkoutKind::Cardio, 50, store.rules());
    assert_eq!((points.base, points.bonus, points.total), (20, 10, 30));

    let event = store.add_points(points.total).unwrap();
    assert_eq!(store.points(), before + 30);
    assert_eq!(store.current_streak(), 1);
    assert!(matches!(event, Event::PointsAwarded { streak_extended: true, .. }));
}

#[test]
fn game_unlock_then_expiry_allows_second_unlock() {
    let mut store = fresh_store();
    let first = store.report_game_result(200).unwrap();
    assert!(matches!(first.outcome, GameOutcome::Unlocked { .. }));

    store.clock().advance(Duration::hours(24));
    let second = store.report_game_result(250).unwrap();
    assert!(matches!(second.outcome, GameOutcome::Unlocked { .. }));
    assert_eq!(store.game_stats().premium_unlocks, 2);
    assert_eq!(store.game_stats().high_score, 250);
}

#[test]
fn snapshot_roundtrips_through_json() {
    let mut store = fresh_store();
    store.log_workout(WorkoutKind::StrengthTraining, 60).unwrap();
    store.start_fast(fastout_core::fasting_protocol("16:8").unwrap()).unwrap();
    store.set_subscription(PaidPlan::Monthly);

    let json = serde_json::to_string(store.state()).unwrap();
    let restored = UserStore::from_state(
        serde_json::from_str(&json).unwrap(),
        ManualClock::new(start()),
    );
    assert_eq!(restored.state(), store.state());
    assert!(restored.is_user_premium());
}
