use std::time::{Duration, Instant};

use flightdash::debounce::Debounced;

const DELAY: Duration = Duration::from_millis(800);

#[test]
fn holds_initial_value_until_first_settle() {
    let mut d = Debounced::new("".to_string(), DELAY);
    let t0 = Instant::now();
    d.set("KJFK".into(), t0);
    assert_eq!(d.value(), "");
    assert!(d.poll(t0 + DELAY / 2).is_none());
    assert_eq!(d.value(), "");
}

#[test]
fn settles_after_the_quiet_interval() {
    let mut d = Debounced::new("".to_string(), DELAY);
    let t0 = Instant::now();
    d.set("KJFK".into(), t0);
    assert_eq!(d.poll(t0 + DELAY), Some("KJFK".to_string()));
    assert_eq!(d.value(), "KJFK");
    assert!(!d.is_pending());
}

#[test]
fn each_set_restarts_the_timer() {
    let mut d = Debounced::new("".to_string(), DELAY);
    let t0 = Instant::now();
    d.set("K".into(), t0);
    d.set("KJ".into(), t0 + DELAY / 2);

    assert!(d.poll(t0 + DELAY).is_none());
    assert_eq!(d.poll(t0 + DELAY / 2 + DELAY), Some("KJ".to_string()));
}

#[test]
fn intermediate_values_never_settle() {
    let mut d = Debounced::new("".to_string(), DELAY);
    let t0 = Instant::now();
    d.set("K".into(), t0);
    d.set("KJ".into(), t0 + Duration::from_millis(100));
    d.set("KJF".into(), t0 + Duration::from_millis(200));
    d.set("KJFK".into(), t0 + Duration::from_millis(300));

    let settled = d.poll(t0 + Duration::from_millis(300) + DELAY);
    assert_eq!(settled, Some("KJFK".to_string()));
}

#[test]
fn setting_the_settled_value_is_not_pending() {
    let mut d = Debounced::new("KJFK".to_string(), DELAY);
    let t0 = Instant::now();
    d.set("KJFK".into(), t0);
    assert!(!d.is_pending());
    assert!(d.poll(t0 + DELAY).is_none());
}

#[test]
fn cancel_drops_the_pending_candidate() {
    let mut d = Debounced::new("".to_string(), DELAY);
    let t0 = Instant::now();
    d.set("KJFK".into(), t0);
    d.cancel();
    assert!(!d.is_pending());
    assert!(d.poll(t0 + DELAY * 2).is_none());
    assert_eq!(d.value(), "");
}

#[test]
fn generic_over_optional_values() {
    let mut d: Debounced<Option<String>> = Debounced::new(None, DELAY);
    let t0 = Instant::now();
    d.set(Some("2026-03-01".into()), t0);
    assert_eq!(d.value(), &None);

    assert_eq!(d.poll(t0 + DELAY), Some(Some("2026-03-01".to_string())));

    d.set(None, t0 + DELAY * 2);
    assert_eq!(d.poll(t0 + DELAY * 3), Some(None));
    assert_eq!(d.value(), &None);
}
