use std::time::{Duration, Instant};

// A value that only settles after it has stopped changing for a full delay
// window. At most one candidate is pending at a time; every `set` replaces
// the candidate and restarts the window.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    settled: T,
    pending: Option<(T, Instant)>,
    delay: Duration,
}

impl<T: Clone + PartialEq> Debounced<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            settled: initial,
            pending: None,
            delay,
        }
    }

    pub fn set(&mut self, value: T, now: Instant) {
        if self.pending.is_none() && value == self.settled {
            return;
        }
        self.pending = Some((value, now + self.delay));
    }

    // Promotes the pending candidate once its deadline has passed. Returns
    // the newly settled value, or None if nothing settled on this poll.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((_, deadline)) if now >= deadline => {
                let (value, _) = self.pending.take().unwrap();
                self.settled = value.clone();
                Some(value)
            }
            _ => None,
        }
    }

    pub fn value(&self) -> &T {
        &self.settled
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
