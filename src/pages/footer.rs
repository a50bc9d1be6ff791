//! Footer: social links and the creator credit. Mounted with every page.

use crate::hooks::{use_creator_info, use_social_links, Context, Resource};
use crate::model::{CreatorInfo, SocialLinks};
use crate::view::{Link, Section};

pub struct Footer {
    links: Resource<SocialLinks>,
    creator: Resource<CreatorInfo>,
}

impl Footer {
    pub fn mount(cx: &Context) -> Self {
        Self {
            links: use_social_links(cx),
            creator: use_creator_info(cx),
        }
    }

    /// Footer sections. Shown with whatever data is there; the footer never
    /// holds a page in its loading state.
    pub fn sections(&self) -> Vec<Section> {
        let links = self.links.get();
        let creator = self.creator.get();
        let mut sections = Vec::new();

        let social: Vec<(String, Link)> = links
            .entries()
            .into_iter()
            .map(|(label, target)| (label.to_string(), Link::External(social_target(label, target))))
            .collect();
        if !social.is_empty() {
            sections.push(Section::Links(social));
        }

        let credit = format!("© {}", creator.name);
        if creator.link.trim().is_empty() {
            sections.push(Section::Paragraphs {
                title: None,
                text: credit,
            });
        } else {
            sections.push(Section::Links(vec![(credit, Link::External(creator.link))]));
        }

        sections
    }

    pub fn dispose(&self) {
        self.links.dispose();
        self.creator.dispose();
    }
}

/// Bare email addresses become `mailto:` links.
fn social_target(label: &str, target: &str) -> String {
    if label == "Email" && !target.contains(':') {
        format!("mailto:{target}")
    } else {
        target.to_string()
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
    fn test_default_credit() {
        let (_store, cx) = setup();
        let footer = Footer::mount(&cx);
        assert_eq!(
            footer.sections(),
            vec![Section::Paragraphs {
                title: None,
                text: "© SABAN PRODUCTIONS".into()
            }]
        );
    }

    #[test]
    fn test_links_and_linked_credit() {
        let (store, cx) = setup();
        store
            .set(
                "socialLinks",
                json!({"email": "me@example.com", "linkedin": "https://linkedin.com/in/me"}),
            )
            .unwrap();
        store
            .set("creatorInfo", json!({"name": "Studio", "link": "https://studio.example"}))
            .unwrap();
        let footer = Footer::mount(&cx);
        store.flush();

        let sections = footer.sections();
        assert_eq!(
            sections[0],
            Section::Links(vec![
                ("Email".into(), Link::External("mailto:me@example.com".into())),
                (
                    "LinkedIn".into(),
                    Link::External("https://linkedin.com/in/me".into())
                ),
            ])
        );
        assert_eq!(
            sections[1],
            Section::Links(vec![(
                "© Studio".into(),
                Link::External("https://studio.example".into())
            )])
        );
    }
}
