use std::time::Duration;

use feedgrab_core::RetryPolicy;
use pretty_assertions::assert_eq;

#[test]
fn default_delays_grow_then_cap() {
    let policy = RetryPolicy::default();
    let delays: Vec<u64> = (1..=8)
        .map(|attempt| policy.delay_for_attempt(attempt).as_millis() as u64)
        .collect();
    assert_eq!(
        delays,
        vec![5000, 7500, 11250, 16875, 25312, 30000, 30000, 30000]
    );
}

#[test]
fn huge_attempt_numbers_stay_capped() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.delay_for_attempt(u32::MAX), Duration::from_secs(30));
    assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(5));
}

#[test]
fn escalation_threshold_counts_consecutive_failures() {
    let policy = RetryPolicy::default();
    assert!(!policy.should_escalate(9));
    assert!(policy.should_escalate(10));

    let never = RetryPolicy {
        escalation_threshold: 0,
        ..RetryPolicy::default()
    };
    assert!(!never.should_escalate(1_000));
}
