//! In-process realtime store.
//!
//! Holds one JSON document tree. Writes compute which subscribers now see a
//! different value at their path and queue a notification for each; nothing
//! is delivered until [`MemoryStore::flush`] drains the queue. That keeps
//! delivery on the event loop, never inside the caller of `set()` or
//! `subscribe()`.
//!
//! Storage rules follow the realtime database this stands in for: writing
//! `null` deletes, empty objects are never stored, and `.info/connected` is a
//! read-only virtual path driven by [`MemoryStore::set_connected`].

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{paths, split_path, DataSource, Snapshot, Unsubscribe, ValueCallback};
use crate::{Error, Result};

struct Subscriber {
    id: usize,
    path: String,
    callback: Rc<dyn Fn(Snapshot)>,
}

#[derive(Default)]
struct StoreInner {
    root: Value,
    connected: bool,
    subscribers: Vec<Subscriber>,
    queue: VecDeque<(usize, Snapshot)>,
    next_id: usize,
}

impl StoreInner {
    fn value_at(&self, path: &str) -> Snapshot {
        if path == paths::CONNECTED {
            return Some(Value::Bool(self.connected));
        }
        let segments = split_path(path).ok()?;
        lookup(&self.root, &segments).cloned()
    }

    fn snapshots(&self) -> Vec<(usize, Snapshot)> {
        self.subscribers
            .iter()
            .filter(|s| s.path != paths::CONNECTED)
            .map(|s| (s.id, self.value_at(&s.path)))
            .collect()
    }
}

/// Shared handle to an in-memory document store.
///
/// Cloning the handle shares the same tree and subscriber list.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl MemoryStore {
    /// Create an empty, disconnected store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value at `path`.
    pub fn get(&self, path: &str) -> Snapshot {
        self.inner.borrow().value_at(path)
    }

    /// Write `value` at `path`, replacing what was there.
    ///
    /// Subscribers whose visible value changed get a notification queued.
    pub fn set(&self, path: &str, value: Value) -> Result<()> {
        let segments = split_path(path)?;
        if segments.first() == Some(&".info") {
            return Err(Error::InvalidPath(path.to_string()));
        }

        let mut inner = self.inner.borrow_mut();
        let before = inner.snapshots();

        write_at(&mut inner.root, &segments, value);
        if is_empty(&inner.root) {
            inner.root = Value::Null;
        }

        let mut queued = 0;
        for (id, old) in before {
            let Some(path) = inner
                .subscribers
                .iter()
                .find(|s| s.id == id)
                .map(|s| s.path.clone())
            else {
                continue;
            };
            let new = inner.value_at(&path);
            if new != old {
                inner.queue.push_back((id, new));
                queued += 1;
            }
        }

        debug!(path, queued, "store write");
        Ok(())
    }

    /// Delete whatever is stored at `path`.
    pub fn remove(&self, path: &str) -> Result<()> {
        self.set(path, Value::Null)
    }

    /// Replace the whole tree.
    pub fn load(&self, root: Value) -> Result<()> {
        self.set("", root)
    }

    /// Update the virtual `.info/connected` flag.
    pub fn set_connected(&self, connected: bool) {
        let mut inner = self.inner.borrow_mut();
        if inner.connected == connected {
            return;
        }
        inner.connected = connected;

        let ids: Vec<usize> = inner
            .subscribers
            .iter()
            .filter(|s| s.path == paths::CONNECTED)
            .map(|s| s.id)
            .collect();
        for id in ids {
            inner.queue.push_back((id, Some(Value::Bool(connected))));
        }
    }

    /// Whether the store currently reports itself connected.
    pub fn is_connected(&self) -> bool {
        self.inner.borrow().connected
    }

    /// Deliver every queued notification. Returns how many callbacks ran.
    ///
    /// Notifications for subscriptions that were torn down after queuing are
    /// dropped. Callbacks may subscribe, unsubscribe or write; anything they
    /// queue is delivered in the same flush.
    pub fn flush(&self) -> usize {
        let mut delivered = 0;

        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let Some((id, snapshot)) = inner.queue.pop_front() else {
                    break;
                };
                let callback = inner
                    .subscribers
                    .iter()
                    .find(|s| s.id == id)
                    .map(|s| s.callback.clone());
                callback.map(|cb| (cb, snapshot))
            };

            // Borrow released before running user code
            if let Some((callback, snapshot)) = next {
                callback(snapshot);
                delivered += 1;
            }
        }

        delivered
    }

    /// Number of notifications waiting for `flush()`.
    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

impl DataSource for MemoryStore {
    fn subscribe(&self, path: &str, on_value: ValueCallback) -> Unsubscribe {
        if let Err(err) = split_path(path) {
            warn!(%err, "refusing subscription");
            return Box::new(|| {});
        }

        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;

            let current = inner.value_at(path);
            inner.subscribers.push(Subscriber {
                id,
                path: path.to_string(),
                callback: Rc::from(on_value),
            });
            inner.queue.push_back((id, current));
            id
        };

        let weak: Weak<RefCell<StoreInner>> = Rc::downgrade(&self.inner);
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().subscribers.retain(|s| s.id != id);
            }
        })
    }
}

// =============================================================================
// Tree helpers
// =============================================================================

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn lookup<'a>(root: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(root, |node, segment| match node {
            Value::Object(map) => map.get(*segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
        .filter(|value| !value.is_null())
}

/// Drop nulls and empty objects, recursively.
fn prune(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let pruned: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, prune(v)))
                .filter(|(_, v)| !is_empty(v))
                .collect();
            if pruned.is_empty() {
                Value::Null
            } else {
                Value::Object(pruned)
            }
        }
        other => other,
    }
}

fn write_at(node: &mut Value, segments: &[&str], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = prune(value);
        return;
    };

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        let child = map.entry(head.to_string()).or_insert(Value::Null);
        write_at(child, rest, value);
        if is_empty(child) {
            map.remove(*head);
        }
    }
}
