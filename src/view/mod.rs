//! View tree - what a page looks like, independent of the terminal.
//!
//! Pages return a [`View`]. It is plain data: headings, paragraphs and card
//! grids with the links they carry. [`paint`] lays it out for a given width
//! and draws it into a [`FrameBuffer`](crate::render::FrameBuffer), collecting
//! a focus [`Target`] for every link on the way.

mod grid;
mod paint;

pub use grid::{grid_columns, layout_grid, GridLayout, COLUMN_GAP, ROW_GAP};
pub use paint::{paint, Painted, Target};

use chrono::{DateTime, Utc};

use crate::router::Route;

/// Where activating a focus target leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// Return to the previous view.
    Back,
    Route(Route),
    /// Off-app URL, opened with the platform opener.
    External(String),
}

/// A page's content.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// The single loading indicator shown while data is outstanding.
    Loading,
    Page(PageView),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageView {
    /// Show a back control above the heading.
    pub back: bool,
    pub heading: String,
    pub blurb: Option<String>,
    /// Short status line under the heading (connection indicator).
    pub status: Option<String>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Paragraphs {
        title: Option<String>,
        text: String,
    },
    /// Value/label pairs on one line.
    Stats(Vec<(String, String)>),
    Chips {
        title: String,
        items: Vec<String>,
    },
    Grid {
        max_columns: usize,
        cards: Vec<Card>,
    },
    /// A row of labelled links.
    Links(Vec<(String, Link)>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Card {
    /// Image reference; `None` draws a placeholder.
    pub media: Option<String>,
    pub title: String,
    pub meta: Option<String>,
    pub stars: Option<f64>,
    pub body: String,
    /// Maximum body lines.
    pub clamp: usize,
    /// Call-to-action label and where it leads.
    pub action: Option<(String, Link)>,
}

impl PageView {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            ..Default::default()
        }
    }

    pub fn with_back(mut self) -> Self {
        self.back = true;
        self
    }

    pub fn blurb(mut self, blurb: impl Into<String>) -> Self {
        self.blurb = Some(blurb.into());
        self
    }

    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn sections(mut self, sections: impl IntoIterator<Item = Section>) -> Self {
        self.sections.extend(sections);
        self
    }
}

static BACK: Link = Link::Back;

impl View {
    /// Every link in focus order.
    pub fn links(&self) -> Vec<&Link> {
        let View::Page(page) = self else {
            return Vec::new();
        };

        let mut links = Vec::new();
        if page.back {
            links.push(&BACK);
        }
        for section in &page.sections {
            match section {
                Section::Grid { cards, .. } => {
                    links.extend(cards.iter().filter_map(|c| c.action.as_ref().map(|(_, l)| l)));
                }
                Section::Links(items) => links.extend(items.iter().map(|(_, l)| l)),
                _ => {}
            }
        }
        links
    }
}

// =============================================================================
// Formatting helpers
// =============================================================================

pub const STAR_COUNT: usize = 5;

/// Five stars; position `i` is filled when `i < stars`.
pub fn star_row(stars: f64) -> String {
    (0..STAR_COUNT)
        .map(|i| if (i as f64) < stars { '★' } else { '☆' })
        .collect()
}

/// `Jun 1, 2024`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}
