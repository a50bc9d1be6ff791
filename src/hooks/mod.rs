//! Data hooks - store subscriptions as reactive view state.
//!
//! A hook subscribes once when called and keeps its [`Resource`] signals in
//! step with the store until it is disposed or dropped. Pages only read the
//! signals; all fetching, merging, filtering and sorting happens here.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use spark_folio::hooks::{Context, use_posts};
//! use spark_folio::source::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let cx = Context::new(Rc::new(store.clone()));
//!
//! let posts = use_posts(&cx);
//! assert!(posts.loading());
//!
//! store.flush();
//! println!("{} posts", posts.get().len());
//! ```

mod connection;
mod entities;
mod merge;
mod project;
mod resource;

pub use connection::{use_connection, Connection};
pub use entities::{
    use_collection, use_creator_info, use_posts, use_profile, use_projects, use_services,
    use_singleton, use_skills, use_social_links, use_testimonials, ProfileHook,
};
pub use merge::{merge_defaults, overlay};
pub use project::{project_collection, project_singleton};
pub use resource::{use_resource, LoadState, Resource, SubscriptionHandle};

use std::rc::Rc;
use std::time::Duration;

use crate::source::DataSource;

/// How long a hook waits for its first snapshot before giving up on loading.
pub const LOADING_TIMEOUT: Duration = Duration::from_millis(15_000);

/// What every hook needs: the store and the loading timeout.
#[derive(Clone)]
pub struct Context {
    source: Rc<dyn DataSource>,
    loading_timeout: Duration,
}

impl Context {
    pub fn new(source: Rc<dyn DataSource>) -> Self {
        Self {
            source,
            loading_timeout: LOADING_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, loading_timeout: Duration) -> Self {
        self.loading_timeout = loading_timeout;
        self
    }

    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    pub fn loading_timeout(&self) -> Duration {
        self.loading_timeout
    }
}
