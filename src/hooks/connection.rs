//! Connection status hook.

use spark_signals::{signal, Signal};

use super::resource::SubscriptionHandle;
use super::Context;
use crate::source::{is_truthy, paths};

/// Live `.info/connected` flag.
pub struct Connection {
    connected: Signal<bool>,
    handle: SubscriptionHandle,
}

impl Connection {
    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    pub fn signal(&self) -> Signal<bool> {
        self.connected.clone()
    }

    pub fn dispose(&self) {
        self.handle.dispose();
    }
}

/// Track whether the store reports a live connection. Starts `false`.
pub fn use_connection(cx: &Context) -> Connection {
    let connected = signal(false);
    let sink = connected.clone();

    let handle = SubscriptionHandle::open(
        cx.source(),
        paths::CONNECTED,
        None,
        move |snapshot| sink.set(snapshot.as_ref().is_some_and(is_truthy)),
        |_| {},
    );

    Connection { connected, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{pending_timers, reset_timers};
    use crate::source::MemoryStore;
    use std::rc::Rc;

    fn setup() -> (MemoryStore, Context) {
        reset_timers();
        let store = MemoryStore::new();
        let cx = Context::new(Rc::new(store.clone()));
        (store, cx)
    }

    #[test]
    fn test_tracks_connected_flag() {
        let (store, cx) = setup();
        let connection = use_connection(&cx);
        assert!(!connection.is_connected());
        assert_eq!(pending_timers(), 0, "no loading timeout");

        store.set_connected(true);
        store.flush();
        assert!(connection.is_connected());

        store.set_connected(false);
        store.flush();
        assert!(!connection.is_connected());
    }

    #[test]
    fn test_stale_update_ignored() {
        let (store, cx) = setup();
        let connection = use_connection(&cx);
        store.set_connected(true);

        connection.dispose();
        store.flush();
        assert!(!connection.is_connected());
        assert_eq!(store.subscriber_count(), 0);
    }
}
