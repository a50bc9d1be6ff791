//! File-backed feed for a [`MemoryStore`].
//!
//! Reads a realtime-database JSON export (root object keyed by `profile`,
//! `posts`, ...) into the store and re-reads it whenever the file's
//! modification time moves. The store reports itself connected while the
//! last read succeeded.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde_json::Value;
use tracing::{info, warn};

use super::MemoryStore;
use crate::Result;

/// Keeps a store in sync with a JSON file on disk.
pub struct FileFeed {
    path: PathBuf,
    store: MemoryStore,
    interval: Duration,
    since_check: Duration,
    polled: bool,
    modified: Option<SystemTime>,
}

impl FileFeed {
    /// Create a feed. Nothing is read until [`poll`](Self::poll) or
    /// [`reload`](Self::reload).
    pub fn new(path: impl Into<PathBuf>, store: MemoryStore, interval: Duration) -> Self {
        Self {
            path: path.into(),
            store,
            interval,
            since_check: Duration::ZERO,
            polled: false,
            modified: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Account for `elapsed` time and reload when the check interval is up
    /// (or on the very first poll). Returns true if the store was updated.
    ///
    /// Read failures are logged and flip the store to disconnected.
    pub fn poll(&mut self, elapsed: Duration) -> bool {
        self.since_check += elapsed;
        if self.polled && self.since_check < self.interval {
            return false;
        }
        self.polled = true;
        self.since_check = Duration::ZERO;

        match self.reload() {
            Ok(updated) => updated,
            Err(err) => {
                if self.store.is_connected() {
                    warn!(path = %self.path.display(), %err, "data file unavailable");
                }
                self.store.set_connected(false);
                false
            }
        }
    }

    /// Read the file if it changed since the last successful read.
    pub fn reload(&mut self) -> Result<bool> {
        let modified = fs::metadata(&self.path)?.modified()?;
        if self.modified == Some(modified) {
            self.store.set_connected(true);
            return Ok(false);
        }

        let text = fs::read_to_string(&self.path)?;
        let root: Value = serde_json::from_str(&text)?;
        self.store.load(root)?;
        self.store.set_connected(true);
        self.modified = Some(modified);

        info!(path = %self.path.display(), "data file loaded");
        Ok(true)
    }
}
