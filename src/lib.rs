//! # spark-folio
//!
//! Reactive terminal portfolio viewer backed by a realtime document store.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! Data flows one way:
//! ```text
//! DataSource → data hook (merge/project + timeout) → Page::view → paint → DiffRenderer
//! ```
//!
//! Hooks own store subscriptions and expose `{ data, loading }` as signals.
//! Pages are pure functions of those signals. A render effect per mounted page
//! marks the frame dirty whenever anything the page read changes.
//!
//! ## Modules
//!
//! - [`source`] - `DataSource` capability, in-memory store, file feed
//! - [`scheduler`] - cancellable timeouts on a virtual clock
//! - [`model`] - portfolio entities
//! - [`hooks`] - subscription-to-state adapter and per-entity hooks
//! - [`pages`] - home, list and detail pages
//! - [`view`] - view tree, card grid layout (taffy), painting
//! - [`render`] - frame buffer, text measurement, diff renderer
//! - [`router`], [`input`], [`app`], [`config`] - application shell

pub mod app;
pub mod config;
pub mod error;
pub mod hooks;
pub mod input;
pub mod model;
pub mod pages;
pub mod render;
pub mod router;
pub mod scheduler;
pub mod source;
pub mod view;

pub use error::{Error, Result};

pub use app::{open_external, Action, App};
pub use config::Config;

pub use hooks::{
    use_connection, use_creator_info, use_posts, use_profile, use_projects, use_resource,
    use_services, use_skills, use_social_links, use_testimonials, Context, LoadState, Resource,
    SubscriptionHandle, LOADING_TIMEOUT,
};

pub use model::{CreatorInfo, Post, Profile, Project, Service, Skill, SocialLinks, Testimonial};
pub use router::{History, Route};
pub use source::{paths, DataSource, FileFeed, MemoryStore, Snapshot, Unsubscribe};
