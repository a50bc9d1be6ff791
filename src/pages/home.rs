//! Landing page: profile, skills and the way into every list page.

use super::footer::Footer;
use super::Page;
use crate::hooks::{use_profile, use_skills, Context, ProfileHook, Resource};
use crate::model::{Profile, Skill};
use crate::router::Route;
use crate::view::{Card, Link, PageView, Section, View};

const MENU: [(&str, &str, Route); 4] = [
    ("Blog", "Knowledge, tips and insights", Route::Posts),
    ("Portfolio", "Works, projects and campaigns", Route::Projects),
    ("Services", "Marketing and production services", Route::Services),
    ("Testimonials", "What clients say", Route::Testimonials),
];

pub struct HomePage {
    profile: ProfileHook,
    skills: Resource<Vec<Skill>>,
    footer: Footer,
}

impl HomePage {
    pub fn mount(cx: &Context) -> Self {
        Self {
            profile: use_profile(cx),
            skills: use_skills(cx),
            footer: Footer::mount(cx),
        }
    }
}

fn headline(profile: &Profile) -> Option<String> {
    let parts: Vec<&str> = [profile.headline1.as_str(), profile.headline2.as_str()]
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

fn menu() -> Vec<Card> {
    MENU.iter()
        .map(|(title, body, route)| Card {
            media: None,
            title: title.to_string(),
            meta: None,
            stars: None,
            body: body.to_string(),
            clamp: 1,
            action: Some(("Open".to_string(), Link::Route(route.clone()))),
        })
        .collect()
}

impl Page for HomePage {
    fn view(&self) -> View {
        if self.profile.loading() {
            return View::Loading;
        }

        let profile = self.profile.get();
        let heading = Some(profile.name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or("Portfolio")
            .to_string();

        let mut page = PageView::new(heading);
        page.status = Some(if self.profile.is_connected() {
            "● live".to_string()
        } else {
            "○ offline".to_string()
        });
        page.blurb = headline(&profile);

        if !profile.picture.trim().is_empty() {
            page.sections.push(Section::Paragraphs {
                title: None,
                text: format!("▣ {}", profile.picture.trim()),
            });
        }
        if !profile.intro.trim().is_empty() {
            page.sections.push(Section::Paragraphs {
                title: None,
                text: profile.intro.clone(),
            });
        }
        page.sections.push(Section::Stats(vec![
            (format!("{}+", profile.years_experience), "Years Experience".to_string()),
            (format!("{}+", profile.clients_worked), "Clients".to_string()),
        ]));

        let skills: Vec<String> = self
            .skills
            .get()
            .into_iter()
            .map(|skill| skill.name)
            .filter(|name| !name.trim().is_empty())
            .collect();
        if !skills.is_empty() {
            page.sections.push(Section::Chips {
                title: "Skills".to_string(),
                items: skills,
            });
        }

        page.sections.push(Section::Grid {
            max_columns: 4,
            cards: menu(),
        });

        View::Page(page.sections(self.footer.sections()))
    }

    fn dispose(&self) {
        self.profile.dispose();
        self.skills.dispose();
        self.footer.dispose();
    }
}
