use flightdash::sentinel::{RowRange, ScrollSentinel, Viewport};

fn view(first: usize, rows: usize) -> RowRange {
    RowRange { first, rows }
}

#[test]
fn no_fire_without_a_binding() {
    let mut s = ScrollSentinel::new();
    assert!(!s.poll(&view(0, 10)));
}

#[test]
fn fires_when_the_watched_row_is_visible() {
    let mut s = ScrollSentinel::new();
    s.rebind(Some(8));
    assert!(s.poll(&view(0, 10)));
}

#[test]
fn no_fire_while_the_row_is_off_screen() {
    let mut s = ScrollSentinel::new();
    s.rebind(Some(20));
    assert!(!s.poll(&view(0, 10)));

    // Scrolling the row into view triggers.
    assert!(s.poll(&view(15, 10)));
}

#[test]
fn fires_at_most_once_per_binding() {
    let mut s = ScrollSentinel::new();
    s.rebind(Some(8));
    assert!(s.poll(&view(0, 10)));
    assert!(!s.poll(&view(0, 10)));
}

#[test]
fn rebinding_to_a_new_row_rearms() {
    let mut s = ScrollSentinel::new();
    s.rebind(Some(8));
    assert!(s.poll(&view(0, 10)));

    // The list grew by a page; the sentinel moves to the new last row.
    s.rebind(Some(17));
    assert!(!s.poll(&view(0, 10)));
    assert!(s.poll(&view(10, 10)));
}

#[test]
fn rebinding_to_the_same_row_keeps_the_latch() {
    let mut s = ScrollSentinel::new();
    s.rebind(Some(8));
    assert!(s.poll(&view(0, 10)));
    s.rebind(Some(8));
    assert!(!s.poll(&view(0, 10)));
}

#[test]
fn row_range_bounds() {
    let v = view(5, 3);
    assert!(!v.is_visible(4));
    assert!(v.is_visible(5));
    assert!(v.is_visible(7));
    assert!(!v.is_visible(8));
}
