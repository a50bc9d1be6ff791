//! Routes and navigation history.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Every screen the app can show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Posts,
    Projects,
    Services,
    Testimonials,
    Post(String),
    Service(String),
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let path = trimmed.trim_end_matches('/');
        let segments: Vec<&str> = path.split('/').skip(1).collect();

        if !trimmed.starts_with('/') {
            return Err(Error::InvalidRoute(s.to_string()));
        }

        let route = match segments.as_slice() {
            [] => Route::Home,
            ["posts"] => Route::Posts,
            ["projects"] => Route::Projects,
            ["services"] => Route::Services,
            ["testimonials"] => Route::Testimonials,
            ["post", id] if !id.is_empty() => Route::Post(id.to_string()),
            ["service", id] if !id.is_empty() => Route::Service(id.to_string()),
            _ => return Err(Error::InvalidRoute(s.to_string())),
        };
        Ok(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Posts => write!(f, "/posts"),
            Route::Projects => write!(f, "/projects"),
            Route::Services => write!(f, "/services"),
            Route::Testimonials => write!(f, "/testimonials"),
            Route::Post(id) => write!(f, "/post/{id}"),
            Route::Service(id) => write!(f, "/service/{id}"),
        }
    }
}

// =============================================================================
// History
// =============================================================================

/// Stack of visited routes. Never empty.
#[derive(Debug, Clone)]
pub struct History {
    stack: Vec<Route>,
}

impl History {
    pub fn new(start: Route) -> Self {
        Self { stack: vec![start] }
    }

    pub fn current(&self) -> &Route {
        // Invariant: the stack always holds the starting route
        &self.stack[self.stack.len() - 1]
    }

    /// Navigate to `route`. Pushing the current route again is ignored.
    pub fn push(&mut self, route: Route) -> bool {
        if *self.current() == route {
            return false;
        }
        self.stack.push(route);
        true
    }

    /// Return to the previous route. No-op (returns false) at the root.
    pub fn back(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        true
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }
}
