//! The four "see all" pages.
//!
//! Each is a pure function of one collection hook: the loading indicator
//! while loading, otherwise a back control, heading, blurb and a card grid.

use super::footer::Footer;
use super::Page;
use crate::hooks::{use_posts, use_projects, use_services, use_testimonials, Context, Resource};
use crate::model::{non_empty, Post, Project, Service, Testimonial};
use crate::router::Route;
use crate::view::{format_date, Card, Link, PageView, Section, View};

/// Columns for posts, projects and services.
pub const WIDE_GRID: usize = 4;
/// Columns for testimonials.
pub const NARROW_GRID: usize = 3;

fn list_page(
    heading: &str,
    blurb: &str,
    max_columns: usize,
    cards: Vec<Card>,
    footer: &Footer,
) -> View {
    View::Page(
        PageView::new(heading)
            .with_back()
            .blurb(blurb)
            .section(Section::Grid { max_columns, cards })
            .sections(footer.sections()),
    )
}

// =============================================================================
// Posts
// =============================================================================

pub struct PostsPage {
    posts: Resource<Vec<Post>>,
    footer: Footer,
}

impl PostsPage {
    pub fn mount(cx: &Context) -> Self {
        Self {
            posts: use_posts(cx),
            footer: Footer::mount(cx),
        }
    }
}

/// Human date for a post, or the raw string if it does not parse.
pub(crate) fn post_date(post: &Post) -> Option<String> {
    match post.published() {
        Some(date) => Some(format_date(&date)),
        None => Some(post.date.trim())
            .filter(|raw| !raw.is_empty())
            .map(str::to_string),
    }
}

fn post_card(post: &Post) -> Card {
    Card {
        media: non_empty(&post.image).map(str::to_string),
        title: post.title.clone(),
        meta: post_date(post),
        stars: None,
        body: post.content.clone(),
        clamp: 3,
        action: Some((
            "Read More".to_string(),
            Link::Route(Route::Post(post.id.clone())),
        )),
    }
}

impl Page for PostsPage {
    fn view(&self) -> View {
        if self.posts.loading() {
            return View::Loading;
        }
        let cards = self.posts.get().iter().map(post_card).collect();
        list_page(
            "All Posts",
            "Knowledge, tips, and insights on the digital marketing landscape.",
            WIDE_GRID,
            cards,
            &self.footer,
        )
    }

    fn dispose(&self) {
        self.posts.dispose();
        self.footer.dispose();
    }
}

// =============================================================================
// Projects
// =============================================================================

pub struct ProjectsPage {
    projects: Resource<Vec<Project>>,
    footer: Footer,
}

impl ProjectsPage {
    pub fn mount(cx: &Context) -> Self {
        Self {
            projects: use_projects(cx),
            footer: Footer::mount(cx),
        }
    }
}

fn project_card(project: &Project) -> Card {
    Card {
        media: non_empty(&project.image).map(str::to_string),
        title: project.title.clone(),
        meta: None,
        stars: None,
        body: project.description.clone(),
        clamp: 3,
        action: non_empty(&project.link)
            .map(|link| ("View Project".to_string(), Link::External(link.to_string()))),
    }
}

impl Page for ProjectsPage {
    fn view(&self) -> View {
        if self.projects.loading() {
            return View::Loading;
        }
        let cards = self.projects.get().iter().map(project_card).collect();
        list_page(
            "My Portfolio",
            "A collection of all my works, projects, and successful campaigns.",
            WIDE_GRID,
            cards,
            &self.footer,
        )
    }

    fn dispose(&self) {
        self.projects.dispose();
        self.footer.dispose();
    }
}

// =============================================================================
// Services
// =============================================================================

pub struct ServicesPage {
    services: Resource<Vec<Service>>,
    footer: Footer,
}

impl ServicesPage {
    pub fn mount(cx: &Context) -> Self {
        Self {
            services: use_services(cx),
            footer: Footer::mount(cx),
        }
    }
}

fn service_card(service: &Service) -> Card {
    Card {
        media: non_empty(&service.image).map(str::to_string),
        title: service.title.clone(),
        meta: None,
        stars: None,
        body: service.description.clone(),
        clamp: 2,
        action: Some((
            "Learn More".to_string(),
            Link::Route(Route::Service(service.id.clone())),
        )),
    }
}

impl Page for ServicesPage {
    fn view(&self) -> View {
        if self.services.loading() {
            return View::Loading;
        }
        let cards = self.services.get().iter().map(service_card).collect();
        list_page(
            "All Services",
            "Discover my full range of digital marketing and production services.",
            WIDE_GRID,
            cards,
            &self.footer,
        )
    }

    fn dispose(&self) {
        self.services.dispose();
        self.footer.dispose();
    }
}

// =============================================================================
// Testimonials
// =============================================================================

pub struct TestimonialsPage {
    testimonials: Resource<Vec<Testimonial>>,
    footer: Footer,
}

impl TestimonialsPage {
    pub fn mount(cx: &Context) -> Self {
        Self {
            testimonials: use_testimonials(cx),
            footer: Footer::mount(cx),
        }
    }
}

fn testimonial_card(testimonial: &Testimonial) -> Card {
    Card {
        media: non_empty(&testimonial.image).map(str::to_string),
        title: testimonial.name.clone(),
        meta: None,
        stars: Some(testimonial.stars),
        body: format!("\"{}\"", testimonial.feedback),
        clamp: 5,
        action: None,
    }
}

impl Page for TestimonialsPage {
    fn view(&self) -> View {
        if self.testimonials.loading() {
            return View::Loading;
        }
        let cards = self.testimonials.get().iter().map(testimonial_card).collect();
        list_page(
            "Client Testimonials",
            "Hear what my clients have to say about our partnership and results.",
            NARROW_GRID,
            cards,
            &self.footer,
        )
    }

    fn dispose(&self) {
        self.testimonials.dispose();
        self.footer.dispose();
    }
}

// =============================================================================
// TESTS
// =============================================================================
