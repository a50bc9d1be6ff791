//! Pages - pure renderings of hook state.
//!
//! A page owns the hooks it reads and nothing else. [`Page::view`] reads the
//! hook signals and builds a [`View`]; calling it inside an effect makes the
//! effect track exactly the data the page shows. Dropping a page disposes
//! every hook it owns.
//!
//! # Example
//!
//! ```ignore
//! let page = pages::mount(&Route::Posts, &cx);
//! let view = page.view(); // View::Loading until the first snapshot
//! drop(page);             // unsubscribes everything
//! ```

mod detail;
mod footer;
mod home;
mod lists;

pub use detail::{PostDetailPage, ServiceDetailPage};
pub use footer::Footer;
pub use home::HomePage;
pub use lists::{PostsPage, ProjectsPage, ServicesPage, TestimonialsPage};

use crate::hooks::Context;
use crate::router::Route;
use crate::view::View;

/// A mounted screen.
pub trait Page {
    /// Current content. Reads hook signals, so it is reactive.
    fn view(&self) -> View;

    /// Release every hook subscription. Also happens on drop.
    fn dispose(&self);
}

/// Mount the page for `route`, subscribing its hooks.
pub fn mount(route: &Route, cx: &Context) -> Box<dyn Page> {
    match route {
        Route::Home => Box::new(HomePage::mount(cx)),
        Route::Posts => Box::new(PostsPage::mount(cx)),
        Route::Projects => Box::new(ProjectsPage::mount(cx)),
        Route::Services => Box::new(ServicesPage::mount(cx)),
        Route::Testimonials => Box::new(TestimonialsPage::mount(cx)),
        Route::Post(id) => Box::new(PostDetailPage::mount(cx, id)),
        Route::Service(id) => Box::new(ServiceDetailPage::mount(cx, id)),
    }
}
