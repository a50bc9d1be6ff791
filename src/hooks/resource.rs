//! Subscription-to-state adapter.
//!
//! [`use_resource`] is the one pattern every data hook follows:
//!
//! 1. State starts at the default, `loading = true`
//! 2. A loading timeout is armed
//! 3. The store path is subscribed; each delivered snapshot is projected into
//!    state (absent snapshots leave state alone), then loading ends and the
//!    timeout is cancelled
//! 4. Disposal cancels the timeout and unsubscribes; late callbacks are
//!    ignored
//!
//! # Pattern: Settle Once
//!
//! Snapshot and timeout race. The first to arrive moves [`LoadState`] out of
//! `Pending` and flips `loading`; the other finds the state settled. A
//! snapshot after a timeout still updates the data.
//!
//! # Pattern: Structured Lifetime
//!
//! The subscription is owned by a [`SubscriptionHandle`]. Its `dispose()` is
//! idempotent and also runs on `Drop`, so every way of discarding a hook
//! releases the store subscription and the timer.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use serde_json::Value;
use spark_signals::{signal, Signal};
use tracing::{debug, warn};

use super::Context;
use crate::scheduler::{self, TimeoutHandle};
use crate::source::{present, DataSource, Snapshot, Unsubscribe};
use crate::Result;

// =============================================================================
// Load State
// =============================================================================

/// Where a subscription is in its loading race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing heard yet, timeout armed.
    #[default]
    Pending,
    /// A snapshot arrived first.
    Resolved,
    /// The timeout fired first.
    TimedOut,
}

#[derive(Default)]
struct Lifetime {
    disposed: Cell<bool>,
    state: Cell<LoadState>,
    timeout: RefCell<Option<TimeoutHandle>>,
    unsubscribe: RefCell<Option<Unsubscribe>>,
}

impl Lifetime {
    /// Leave `Pending`. Returns false if already settled.
    fn settle(&self, next: LoadState) -> bool {
        if self.state.get() != LoadState::Pending {
            return false;
        }
        self.state.set(next);
        true
    }

    fn clear_timeout(&self) {
        let timeout = self.timeout.borrow_mut().take();
        if let Some(timeout) = timeout {
            timeout.cancel();
        }
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.clear_timeout();
        let unsubscribe = self.unsubscribe.borrow_mut().take();
        if let Some(unsubscribe) = unsubscribe {
            unsubscribe();
        }
    }
}

// =============================================================================
// Subscription Handle
// =============================================================================

/// Owns one store subscription and its loading timeout.
pub struct SubscriptionHandle {
    lifetime: Rc<Lifetime>,
}

impl SubscriptionHandle {
    /// Subscribe to `path`.
    ///
    /// `on_snapshot` runs for every snapshot delivered before disposal.
    /// `on_settled` runs exactly once, when the subscription leaves
    /// `Pending`. With `timeout: None` only a snapshot can settle it.
    pub fn open<S, F>(
        source: &dyn DataSource,
        path: &str,
        timeout: Option<Duration>,
        on_snapshot: S,
        on_settled: F,
    ) -> Self
    where
        S: Fn(Snapshot) + 'static,
        F: Fn(LoadState) + 'static,
    {
        let lifetime = Rc::new(Lifetime::default());
        let on_settled = Rc::new(on_settled);

        if let Some(delay) = timeout {
            let lifetime_timer = lifetime.clone();
            let settled_timer = on_settled.clone();
            let path_timer = path.to_string();

            let handle = scheduler::set_timeout(delay, move || {
                if lifetime_timer.disposed.get() {
                    return;
                }
                lifetime_timer.timeout.borrow_mut().take();
                if lifetime_timer.settle(LoadState::TimedOut) {
                    warn!(path = %path_timer, "loading timed out");
                    settled_timer(LoadState::TimedOut);
                }
            });
            *lifetime.timeout.borrow_mut() = Some(handle);
        }

        let lifetime_sub = lifetime.clone();
        let unsubscribe = source.subscribe(
            path,
            Box::new(move |snapshot| {
                if lifetime_sub.disposed.get() {
                    return;
                }
                on_snapshot(snapshot);

                // The snapshot handler may have torn us down
                if lifetime_sub.disposed.get() {
                    return;
                }
                lifetime_sub.clear_timeout();
                if lifetime_sub.settle(LoadState::Resolved) {
                    on_settled(LoadState::Resolved);
                }
            }),
        );

        if lifetime.disposed.get() {
            unsubscribe();
        } else {
            *lifetime.unsubscribe.borrow_mut() = Some(unsubscribe);
        }

        Self { lifetime }
    }

    /// Cancel the timeout and unsubscribe. Safe to call more than once.
    pub fn dispose(&self) {
        self.lifetime.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.lifetime.disposed.get()
    }

    pub fn state(&self) -> LoadState {
        self.lifetime.state.get()
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.lifetime.dispose();
    }
}

// =============================================================================
// Resource
// =============================================================================

/// Hook output: reactive `{ data, loading }` plus the owning subscription.
///
/// Dropping the resource unmounts it.
pub struct Resource<T: Clone + PartialEq + 'static> {
    data: Signal<T>,
    loading: Signal<bool>,
    handle: SubscriptionHandle,
}

impl<T: Clone + PartialEq + 'static> Resource<T> {
    /// Current data (tracks as a reactive dependency).
    pub fn get(&self) -> T {
        self.data.get()
    }

    /// Whether the first snapshot (or timeout) is still outstanding.
    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    pub fn data_signal(&self) -> Signal<T> {
        self.data.clone()
    }

    pub fn loading_signal(&self) -> Signal<bool> {
        self.loading.clone()
    }

    pub fn load_state(&self) -> LoadState {
        self.handle.state()
    }

    /// Unmount: no further updates are applied.
    pub fn dispose(&self) {
        self.handle.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.handle.is_disposed()
    }
}

/// Bind the store value at `path` to reactive state.
///
/// `project` shapes a present snapshot into `T`; if it fails, the failure is
/// logged and state is left as it was.
pub fn use_resource<T, P>(cx: &Context, path: &str, initial: T, project: P) -> Resource<T>
where
    T: Clone + PartialEq + 'static,
    P: Fn(&Value) -> Result<T> + 'static,
{
    let data = signal(initial);
    let loading = signal(true);

    let data_sink = data.clone();
    let path_owned = path.to_string();
    let on_snapshot = move |snapshot: Snapshot| match present(&snapshot) {
        Some(value) => match project(value) {
            Ok(next) => data_sink.set(next),
            Err(err) => warn!(%err, "snapshot ignored"),
        },
        None => debug!(path = %path_owned, "no data at path"),
    };

    let loading_sink = loading.clone();
    let handle = SubscriptionHandle::open(
        cx.source(),
        path,
        Some(cx.loading_timeout()),
        on_snapshot,
        move |_| loading_sink.set(false),
    );

    Resource {
        data,
        loading,
        handle,
    }
}

// =============================================================================
// TESTS
// =============================================================================
