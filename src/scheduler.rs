//! Timer Queue - Cancellable timeouts on a virtual clock
//!
//! The app is single-threaded: store notifications, timeouts and input all run
//! on the event loop. Timers here never fire on their own. The loop measures
//! real elapsed time and calls [`advance`], which runs every timer whose
//! deadline has passed, earliest first. Tests drive the same clock by hand.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use spark_folio::scheduler::{set_timeout, advance};
//!
//! let handle = set_timeout(Duration::from_secs(15), || println!("timed out"));
//!
//! advance(Duration::from_secs(10)); // nothing yet
//! handle.cancel();                  // never fires
//! advance(Duration::from_secs(10));
//! ```

use std::cell::RefCell;
use std::time::Duration;

// =============================================================================
// TIMER REGISTRY
// =============================================================================

struct TimerEntry {
    id: usize,
    deadline: Duration,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct TimerRegistry {
    /// Virtual time since the registry was created (or reset)
    now: Duration,
    timers: Vec<TimerEntry>,
    next_id: usize,
}

impl TimerRegistry {
    /// Remove and return the earliest due timer, if any.
    fn take_due(&mut self) -> Option<TimerEntry> {
        let now = self.now;
        let position = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(_, t)| (t.deadline, t.id))
            .map(|(i, _)| i)?;
        Some(self.timers.remove(position))
    }
}

thread_local! {
    static TIMERS: RefCell<TimerRegistry> = RefCell::new(TimerRegistry::default());
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Handle to a scheduled timeout.
///
/// Dropping the handle does not cancel the timer; call [`cancel`](Self::cancel).
#[derive(Debug)]
pub struct TimeoutHandle {
    id: usize,
}

impl TimeoutHandle {
    /// Cancel the timeout. Returns false if it already fired or was cancelled.
    pub fn cancel(&self) -> bool {
        TIMERS.with(|timers| {
            let mut timers = timers.borrow_mut();
            let before = timers.timers.len();
            timers.timers.retain(|t| t.id != self.id);
            timers.timers.len() != before
        })
    }

    /// Whether the timeout is still waiting to fire.
    pub fn is_pending(&self) -> bool {
        TIMERS.with(|timers| timers.borrow().timers.iter().any(|t| t.id == self.id))
    }
}

/// Schedule `callback` to run once `delay` of virtual time has passed.
pub fn set_timeout<F>(delay: Duration, callback: F) -> TimeoutHandle
where
    F: FnOnce() + 'static,
{
    TIMERS.with(|timers| {
        let mut timers = timers.borrow_mut();
        let id = timers.next_id;
        timers.next_id += 1;
        let deadline = timers.now + delay;
        timers.timers.push(TimerEntry {
            id,
            deadline,
            callback: Box::new(callback),
        });
        TimeoutHandle { id }
    })
}

/// Move the clock forward and run every timer that came due.
///
/// Callbacks run outside the registry borrow, so they may schedule or
/// cancel timers. Returns the number of callbacks run.
pub fn advance(elapsed: Duration) -> usize {
    TIMERS.with(|timers| timers.borrow_mut().now += elapsed);

    let mut fired = 0;
    while let Some(entry) = TIMERS.with(|timers| timers.borrow_mut().take_due()) {
        (entry.callback)();
        fired += 1;
    }
    fired
}

/// Current virtual time.
pub fn now() -> Duration {
    TIMERS.with(|timers| timers.borrow().now)
}

/// Number of timers waiting to fire.
pub fn pending_timers() -> usize {
    TIMERS.with(|timers| timers.borrow().timers.len())
}

/// Drop all timers and rewind the clock (for testing).
pub fn reset_timers() {
    TIMERS.with(|timers| *timers.borrow_mut() = TimerRegistry::default());
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() {
        reset_timers();
    }

    #[test]
    fn test_fires_after_deadline() {
        setup();
        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();

        let handle = set_timeout(Duration::from_millis(100), move || fired_clone.set(true));

        assert_eq!(advance(Duration::from_millis(99)), 0);
        assert!(handle.is_pending());
        assert_eq!(advance(Duration::from_millis(1)), 1);
        assert!(fired.get());
        assert!(!handle.is_pending());
    }

    #[test]
    fn test_cancel_prevents_fire() {
        setup();
        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();

        let handle = set_timeout(Duration::from_millis(10), move || fired_clone.set(true));
        assert!(handle.cancel());
        assert!(!handle.cancel(), "second cancel is a no-op");

        advance(Duration::from_secs(1));
        assert!(!fired.get());
        assert_eq!(pending_timers(), 0);
    }

    #[test]
    fn test_fires_in_deadline_order() {
        setup();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (label, ms) in [("late", 30u64), ("early", 10), ("middle", 20)] {
            let order = order.clone();
            set_timeout(Duration::from_millis(ms), move || order.borrow_mut().push(label));
        }

        advance(Duration::from_millis(50));
        assert_eq!(*order.borrow(), vec!["early", "middle", "late"]);
    }

    #[test]
    fn test_callback_can_schedule() {
        setup();
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        set_timeout(Duration::from_millis(5), move || {
            count_clone.set(count_clone.get() + 1);
            let count_inner = count_clone.clone();
            set_timeout(Duration::ZERO, move || count_inner.set(count_inner.get() + 1));
        });

        assert_eq!(advance(Duration::from_millis(5)), 2);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_now_accumulates() {
        setup();
        advance(Duration::from_millis(16));
        advance(Duration::from_millis(16));
        assert_eq!(now(), Duration::from_millis(32));
    }
}
