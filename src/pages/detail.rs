//! Single post and single service pages.

use super::footer::Footer;
use super::lists::post_date;
use super::Page;
use crate::hooks::{use_posts, use_services, Context, Resource};
use crate::model::{non_empty, Post, Service};
use crate::view::{PageView, Section, View};

fn image_line(image: &Option<String>) -> Option<Section> {
    non_empty(image).map(|image| Section::Paragraphs {
        title: None,
        text: format!("▣ {image}"),
    })
}

fn not_found(what: &str, footer: &Footer) -> View {
    View::Page(
        PageView::new(format!("{what} not found"))
            .with_back()
            .section(Section::Paragraphs {
                title: None,
                text: format!("The {} you are looking for does not exist.", what.to_lowercase()),
            })
            .sections(footer.sections()),
    )
}

// =============================================================================
// Post
// =============================================================================

pub struct PostDetailPage {
    id: String,
    posts: Resource<Vec<Post>>,
    footer: Footer,
}

impl PostDetailPage {
    pub fn mount(cx: &Context, id: &str) -> Self {
        Self {
            id: id.to_string(),
            posts: use_posts(cx),
            footer: Footer::mount(cx),
        }
    }
}

impl Page for PostDetailPage {
    fn view(&self) -> View {
        if self.posts.loading() {
            return View::Loading;
        }
        let posts = self.posts.get();
        let Some(post) = posts.iter().find(|p| p.id == self.id) else {
            return not_found("Post", &self.footer);
        };

        let mut page = PageView::new(post.title.clone()).with_back();
        page.blurb = post_date(post);
        page.sections.extend(image_line(&post.image));
        page.sections.push(Section::Paragraphs {
            title: None,
            text: post.content.clone(),
        });
        View::Page(page.sections(self.footer.sections()))
    }

    fn dispose(&self) {
        self.posts.dispose();
        self.footer.dispose();
    }
}

// =============================================================================
// Service
// =============================================================================

pub struct ServiceDetailPage {
    id: String,
    services: Resource<Vec<Service>>,
    footer: Footer,
}

impl ServiceDetailPage {
    pub fn mount(cx: &Context, id: &str) -> Self {
        Self {
            id: id.to_string(),
            services: use_services(cx),
            footer: Footer::mount(cx),
        }
    }
}

impl Page for ServiceDetailPage {
    fn view(&self) -> View {
        if self.services.loading() {
            return View::Loading;
        }
        let services = self.services.get();
        let Some(service) = services.iter().find(|s| s.id == self.id) else {
            return not_found("Service", &self.footer);
        };

        let mut page = PageView::new(service.title.clone()).with_back();
        page.sections.extend(image_line(&service.image));
        page.sections.push(Section::Paragraphs {
            title: None,
            text: service.description.clone(),
        });
        View::Page(page.sections(self.footer.sections()))
    }

    fn dispose(&self) {
        self.services.dispose();
        self.footer.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::reset_timers;
    use crate::source::MemoryStore;
    use serde_json::json;
    use std::rc::Rc;

    fn setup() -> (MemoryStore, Context) {
        reset_timers();
        let store = MemoryStore::new();
        let cx = Context::new(Rc::new(store.clone()));
        (store, cx)
    }

    #[test]
    fn test_post_detail() {
        let (store, cx) = setup();
        store
            .set(
                "posts/p1",
                json!({"title": "Hello", "content": "Full text", "date": "2024-06-01", "image": "hello.png"}),
            )
            .unwrap();
        let page = PostDetailPage::mount(&cx, "p1");
        store.flush();

        let View::Page(view) = page.view() else {
            panic!("loaded");
        };
        assert_eq!(view.heading, "Hello");
        assert!(view.back);
        assert_eq!(view.blurb.as_deref(), Some("Jun 1, 2024"));
        assert_eq!(
            view.sections[0],
            Section::Paragraphs {
                title: None,
                text: "▣ hello.png".into()
            }
        );
        assert_eq!(
            view.sections[1],
            Section::Paragraphs {
                title: None,
                text: "Full text".into()
            }
        );
    }

    #[test]
    fn test_post_not_found() {
        let (store, cx) = setup();
        store.set("posts/p1", json!({"title": "Hello"})).unwrap();
        let page = PostDetailPage::mount(&cx, "missing");
        store.flush();

        let View::Page(view) = page.view() else {
            panic!("loaded");
        };
        assert_eq!(view.heading, "Post not found");
    }

    #[test]
    fn test_service_detail_follows_updates() {
        let (store, cx) = setup();
        store
            .set("services/s1", json!({"title": "Video", "description": "Edits"}))
            .unwrap();
        let page = ServiceDetailPage::mount(&cx, "s1");
        store.flush();

        store
            .set("services/s1/description", json!("Edits and colour"))
            .unwrap();
        store.flush();

        let View::Page(view) = page.view() else {
            panic!("loaded");
        };
        assert_eq!(view.heading, "Video");
        assert_eq!(
            view.sections[0],
            Section::Paragraphs {
                title: None,
                text: "Edits and colour".into()
            }
        );
    }
}
