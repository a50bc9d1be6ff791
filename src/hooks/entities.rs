//! Per-entity data hooks.
//!
//! Every hook here is [`use_resource`] bound to one store path. Singletons
//! are merged over their default; collections are keyed, filtered and
//! ordered by [`project_collection`].

use super::connection::{use_connection, Connection};
use super::project::{project_collection, project_singleton};
use super::resource::{use_resource, Resource};
use super::Context;
use crate::model::{
    CreatorInfo, Post, Profile, Project, Record, Service, Singleton, Skill, SocialLinks,
    Testimonial,
};

// =============================================================================
// Generic
// =============================================================================

/// Bind a singleton entity. State starts at `T::default()`.
pub fn use_singleton<T: Singleton>(cx: &Context) -> Resource<T> {
    use_resource(cx, T::PATH, T::default(), project_singleton::<T>)
}

/// Bind a collection entity. State starts empty.
pub fn use_collection<T: Record>(cx: &Context) -> Resource<Vec<T>> {
    use_resource(cx, T::PATH, Vec::new(), project_collection::<T>)
}

// =============================================================================
// Profile
// =============================================================================

/// Profile data plus the store's connection status.
pub struct ProfileHook {
    pub profile: Resource<Profile>,
    pub connection: Connection,
}

impl ProfileHook {
    pub fn get(&self) -> Profile {
        self.profile.get()
    }

    pub fn loading(&self) -> bool {
        self.profile.loading()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    pub fn dispose(&self) {
        self.profile.dispose();
        self.connection.dispose();
    }
}

pub fn use_profile(cx: &Context) -> ProfileHook {
    ProfileHook {
        profile: use_singleton(cx),
        connection: use_connection(cx),
    }
}

// =============================================================================
// The rest
// =============================================================================

pub fn use_social_links(cx: &Context) -> Resource<SocialLinks> {
    use_singleton(cx)
}

/// Creator credit, defaulting to [`DEFAULT_CREATOR`](crate::model::DEFAULT_CREATOR).
pub fn use_creator_info(cx: &Context) -> Resource<CreatorInfo> {
    use_singleton(cx)
}

pub fn use_skills(cx: &Context) -> Resource<Vec<Skill>> {
    use_collection(cx)
}

pub fn use_services(cx: &Context) -> Resource<Vec<Service>> {
    use_collection(cx)
}

pub fn use_projects(cx: &Context) -> Resource<Vec<Project>> {
    use_collection(cx)
}

/// Approved testimonials only.
pub fn use_testimonials(cx: &Context) -> Resource<Vec<Testimonial>> {
    use_collection(cx)
}

/// Posts, most recent first.
pub fn use_posts(cx: &Context) -> Resource<Vec<Post>> {
    use_collection(cx)
}

// =============================================================================
// TESTS
// =============================================================================
