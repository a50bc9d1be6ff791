//! Paint a [`View`] into a [`FrameBuffer`].
//!
//! Two passes: every section is measured for the given width (grids go
//! through taffy), then a buffer as tall as the content is allocated and
//! drawn top to bottom. Links become focus [`Target`]s in the same order as
//! [`View::links`].
//!
//! Heights are measured in `usize`. A page taller than `u16::MAX` rows is
//! cut at the buffer's last row, and links below the cut get no target.

use super::grid::{layout_grid, GridLayout};
use super::{star_row, Card, Link, PageView, Section, View};
use crate::render::text::{clamp_lines, string_width, truncate_text, wrap_text};
use crate::render::{Attr, FrameBuffer, Rect, Tone};
use crate::Result;

/// Left and right page margin.
const MARGIN: u16 = 2;
const LOADING: &str = "Loading…";

/// A focusable link and where it was drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub rect: Rect,
    pub link: Link,
}

/// Result of painting a view.
#[derive(Debug, Clone)]
pub struct Painted {
    pub buffer: FrameBuffer,
    pub targets: Vec<Target>,
}

/// Lay out and draw `view` at `width` columns. `focused` indexes the
/// targets and is drawn highlighted. `min_height` pads short pages so the
/// loading indicator can be centered.
pub fn paint(view: &View, width: u16, min_height: u16, focused: Option<usize>) -> Result<Painted> {
    match view {
        View::Loading => Ok(paint_loading(width, min_height)),
        View::Page(page) => paint_page(page, width, focused),
    }
}

fn paint_loading(width: u16, height: u16) -> Painted {
    let height = height.max(1);
    let mut buffer = FrameBuffer::new(width, height);
    let x = width.saturating_sub(string_width(LOADING)) / 2;
    buffer.draw_text(x, height / 2, LOADING, Tone::Muted, Attr::NONE, None);
    Painted {
        buffer,
        targets: Vec::new(),
    }
}

// =============================================================================
// Measure
// =============================================================================

enum Block<'a> {
    Lines(Vec<(String, Tone, Attr)>),
    Flow(Vec<(Rect, &'a str, Option<&'a Link>)>, usize),
    Grid(&'a [Card], GridLayout),
}

impl Block<'_> {
    fn height(&self) -> usize {
        match self {
            Block::Lines(lines) => lines.len(),
            Block::Flow(_, height) => *height,
            Block::Grid(_, grid) => grid.height,
        }
    }
}

fn measure<'a>(section: &'a Section, width: u16) -> Result<Block<'a>> {
    let block = match section {
        Section::Paragraphs { title, text } => {
            let mut lines = Vec::new();
            if let Some(title) = title {
                lines.push((truncate_text(title, width), Tone::Heading, Attr::BOLD));
            }
            for line in wrap_text(text, width) {
                lines.push((line, Tone::Default, Attr::NONE));
            }
            Block::Lines(lines)
        }
        Section::Stats(stats) => {
            let line = stats
                .iter()
                .map(|(value, label)| format!("{value} {label}"))
                .collect::<Vec<_>>()
                .join("   ");
            Block::Lines(vec![(truncate_text(&line, width), Tone::Accent, Attr::BOLD)])
        }
        Section::Chips { items, .. } => {
            let chips: Vec<(&str, Option<&Link>)> =
                items.iter().map(|item| (item.as_str(), None)).collect();
            let (rects, height) = flow(&chips, width, 1, 2);
            let placed = rects
                .into_iter()
                .zip(chips)
                .map(|(rect, (text, link))| (rect, text, link))
                .collect();
            Block::Flow(placed, height)
        }
        Section::Links(items) => {
            let links: Vec<(&str, Option<&Link>)> = items
                .iter()
                .map(|(label, link)| (label.as_str(), Some(link)))
                .collect();
            let (rects, height) = flow(&links, width, 0, 3);
            let placed = rects
                .into_iter()
                .zip(links)
                .map(|(rect, (text, link))| (rect, text, link))
                .collect();
            Block::Flow(placed, height)
        }
        Section::Grid { max_columns, cards } => {
            let height = card_height(cards);
            Block::Grid(cards, layout_grid(cards.len(), width, *max_columns, height)?)
        }
    };
    Ok(block)
}

/// Place items left to right, wrapping when a row is full. `pad` cells are
/// added on each side of every item.
fn flow(items: &[(&str, Option<&Link>)], width: u16, pad: u16, gap: u16) -> (Vec<Rect>, usize) {
    let mut rects = Vec::with_capacity(items.len());
    let (mut x, mut y) = (0u16, 0usize);

    for (text, _) in items {
        let w = string_width(text).saturating_add(pad * 2).min(width);
        if x > 0 && x.saturating_add(w) > width {
            x = 0;
            y += 1;
        }
        let row = u16::try_from(y).unwrap_or(u16::MAX);
        rects.push(Rect::new(x, row, w, 1));
        x = x.saturating_add(w).saturating_add(gap);
    }

    let height = if items.is_empty() { 0 } else { y + 1 };
    (rects, height)
}

/// Rows a card needs: border, media, title, optional meta/stars, body,
/// optional action. Cards in one grid share the tallest height.
fn card_height(cards: &[Card]) -> u16 {
    let meta = cards.iter().any(|c| c.meta.is_some()) as u16;
    let stars = cards.iter().any(|c| c.stars.is_some()) as u16;
    let action = cards.iter().any(|c| c.action.is_some()) as u16;
    let body = cards.iter().map(|c| c.clamp).max().unwrap_or(0) as u16;
    2 + 1 + 1 + meta + stars + body + action
}

// =============================================================================
// Draw
// =============================================================================

fn paint_page(page: &PageView, width: u16, focused: Option<usize>) -> Result<Painted> {
    let inner = width.saturating_sub(MARGIN * 2).max(1);

    // Header lines
    let mut header: Vec<(String, Tone, Attr)> = Vec::new();
    header.push((truncate_text(&page.heading, inner), Tone::Heading, Attr::BOLD));
    if let Some(status) = &page.status {
        header.push((truncate_text(status, inner), Tone::Success, Attr::NONE));
    }
    if let Some(blurb) = &page.blurb {
        for line in wrap_text(blurb, inner) {
            header.push((line, Tone::Muted, Attr::NONE));
        }
    }

    let mut titles = Vec::with_capacity(page.sections.len());
    let mut blocks = Vec::with_capacity(page.sections.len());
    for section in &page.sections {
        let title = match section {
            Section::Chips { title, .. } => Some(title.as_str()),
            _ => None,
        };
        titles.push(title);
        blocks.push(measure(section, inner)?);
    }

    let back_rows = if page.back { 2 } else { 0 };
    let body = blocks
        .iter()
        .zip(&titles)
        .map(|(b, t)| b.height().saturating_add(t.is_some() as usize + 1))
        .fold(0usize, usize::saturating_add);
    let height = (1 + back_rows + header.len() + 1).saturating_add(body);

    let mut buffer = FrameBuffer::new(width, clamp_rows(height));
    let mut targets = Vec::new();
    let mut y = 1usize;

    if page.back {
        let label = "← Back";
        let rect = Rect::new(MARGIN, 1, string_width(label), 1);
        buffer.draw_text(rect.x, rect.y, label, Tone::Link, Attr::NONE, None);
        push_target(&mut buffer, &mut targets, rect, Link::Back, focused);
        y += back_rows;
    }

    for (text, tone, attrs) in &header {
        buffer.draw_text(MARGIN, clamp_rows(y), text, *tone, *attrs, None);
        y += 1;
    }
    y += 1;

    for (block, title) in blocks.iter().zip(titles) {
        if y >= buffer.height() as usize {
            break;
        }
        if let Some(title) = title {
            buffer.draw_text(MARGIN, clamp_rows(y), title, Tone::Heading, Attr::BOLD, None);
            y += 1;
        }
        draw_block(&mut buffer, &mut targets, block, y, focused);
        y = y.saturating_add(block.height()).saturating_add(1);
    }

    Ok(Painted { buffer, targets })
}

fn clamp_rows(rows: usize) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Draw `block` with its first row at `top`. Rows past the buffer are
/// dropped.
fn draw_block(
    buffer: &mut FrameBuffer,
    targets: &mut Vec<Target>,
    block: &Block<'_>,
    top: usize,
    focused: Option<usize>,
) {
    let rows = buffer.height() as usize;
    match block {
        Block::Lines(lines) => {
            for (row, (text, tone, attrs)) in lines.iter().enumerate() {
                let y = top + row;
                if y >= rows {
                    break;
                }
                buffer.draw_text(MARGIN, clamp_rows(y), text, *tone, *attrs, None);
            }
        }
        Block::Flow(items, _) => {
            for (rect, text, link) in items {
                let y = top + rect.y as usize;
                if y >= rows {
                    break;
                }
                let rect = Rect::new(MARGIN + rect.x, clamp_rows(y), rect.width, 1);
                match link {
                    Some(link) => {
                        let label = truncate_text(text, rect.width);
                        buffer.draw_text(rect.x, rect.y, &label, Tone::Link, Attr::UNDERLINE, None);
                        push_target(buffer, targets, rect, (*link).clone(), focused);
                    }
                    None => {
                        let chip = truncate_text(&format!(" {text} "), rect.width);
                        buffer.draw_text(rect.x, rect.y, &chip, Tone::Accent, Attr::INVERSE, None);
                    }
                }
            }
        }
        Block::Grid(cards, grid) => {
            for (card, rect) in cards.iter().zip(&grid.cards) {
                let y = top + rect.y as usize;
                if y + rect.height as usize > rows {
                    break;
                }
                let rect = Rect::new(MARGIN + rect.x, clamp_rows(y), rect.width, rect.height);
                let is_focused = card.action.is_some() && focused == Some(targets.len());
                draw_card(buffer, card, rect, is_focused);
                if let Some((_, link)) = &card.action {
                    targets.push(Target {
                        rect,
                        link: link.clone(),
                    });
                }
            }
        }
    }
}

fn push_target(
    buffer: &mut FrameBuffer,
    targets: &mut Vec<Target>,
    rect: Rect,
    link: Link,
    focused: Option<usize>,
) {
    if focused == Some(targets.len()) {
        buffer.apply_attrs(rect, Attr::INVERSE);
    }
    targets.push(Target { rect, link });
}

fn draw_card(buffer: &mut FrameBuffer, card: &Card, rect: Rect, focused: bool) {
    let border = if focused { Tone::Accent } else { Tone::Muted };
    buffer.draw_border(rect, border);

    let clip = Rect::new(
        rect.x + 2,
        rect.y + 1,
        rect.width.saturating_sub(4),
        rect.height.saturating_sub(2),
    );
    let w = clip.width;
    let x = clip.x;
    let mut y = clip.y;

    let media = match card.media.as_deref() {
        Some(image) => truncate_text(&format!("▣ {image}"), w),
        None => truncate_text("▢ no image", w),
    };
    buffer.draw_text(x, y, &media, Tone::Muted, Attr::DIM, Some(&clip));
    y += 1;

    let title_attrs = if focused { Attr::BOLD | Attr::UNDERLINE } else { Attr::BOLD };
    buffer.draw_text(x, y, &truncate_text(&card.title, w), Tone::Heading, title_attrs, Some(&clip));
    y += 1;

    if let Some(meta) = &card.meta {
        buffer.draw_text(x, y, &truncate_text(meta, w), Tone::Muted, Attr::NONE, Some(&clip));
        y += 1;
    }
    if let Some(stars) = card.stars {
        buffer.draw_text(x, y, &star_row(stars), Tone::Star, Attr::NONE, Some(&clip));
        y += 1;
    }

    for line in clamp_lines(&card.body, w, card.clamp) {
        buffer.draw_text(x, y, &line, Tone::Default, Attr::NONE, Some(&clip));
        y += 1;
    }

    if let Some((label, _)) = &card.action {
        let row = clip.bottom().saturating_sub(1);
        let text = truncate_text(&format!("→ {label}"), w);
        buffer.draw_text(x, row, &text, Tone::Link, Attr::NONE, Some(&clip));
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Route;

    fn card(title: &str, link: Option<Link>) -> Card {
        Card {
            media: None,
            title: title.into(),
            meta: None,
            stars: None,
            body: "Body text that runs on for a while".into(),
            clamp: 2,
            action: link.map(|l| ("Open".to_string(), l)),
        }
    }

    #[test]
    fn test_loading_is_alone() {
        let painted = paint(&View::Loading, 40, 10, None).unwrap();
        assert!(painted.targets.is_empty());
        assert_eq!(painted.buffer.row_text(5).trim(), "Loading…");
        let text = painted.buffer.to_text();
        assert_eq!(text.trim(), "Loading…");
    }

    #[test]
    fn test_page_header() {
        let view = View::Page(PageView::new("All Posts").blurb("Knowledge, tips."));
        let painted = paint(&view, 40, 0, None).unwrap();
        let text = painted.buffer.to_text();
        assert!(text.contains("All Posts"));
        assert!(text.contains("Knowledge, tips."));
        assert!(!text.contains("Back"));
    }

    #[test]
    fn test_targets_match_links() {
        let view = View::Page(
            PageView::new("Posts").with_back().section(Section::Grid {
                max_columns: 4,
                cards: vec![
                    card("One", Some(Link::Route(Route::Post("1".into())))),
                    card("Two", None),
                    card("Three", Some(Link::Route(Route::Post("3".into())))),
                ],
            }),
        );
        let painted = paint(&view, 120, 0, None).unwrap();
        let links: Vec<&Link> = painted.targets.iter().map(|t| &t.link).collect();
        assert_eq!(links, view.links());
        assert_eq!(painted.targets.len(), 3);
    }

    #[test]
    fn test_cards_share_a_row() {
        let view = View::Page(PageView::new("Grid").section(Section::Grid {
            max_columns: 4,
            cards: vec![
                card("Alpha", Some(Link::Back)),
                card("Beta", Some(Link::Back)),
            ],
        }));
        let painted = paint(&view, 104, 0, None).unwrap();
        let first = painted.targets[0].rect;
        let second = painted.targets[1].rect;
        assert_eq!(first.y, second.y);
        assert!(second.x > first.right());

        let row = painted.buffer.row_text(first.y + 2);
        assert!(row.contains("Alpha"));
        assert!(row.contains("Beta"));
    }

    #[test]
    fn test_focus_highlights_target() {
        let view = View::Page(PageView::new("Detail").with_back());
        let painted = paint(&view, 40, 0, Some(0)).unwrap();
        let rect = painted.targets[0].rect;
        let cell = painted.buffer.get(rect.x, rect.y).unwrap();
        assert!(cell.attrs.contains(Attr::INVERSE));
    }

    #[test]
    fn test_card_body_clamped() {
        let mut long = card("Clamp", None);
        long.body = "word ".repeat(100);
        long.clamp = 3;
        let view = View::Page(PageView::new("C").section(Section::Grid {
            max_columns: 1,
            cards: vec![long],
        }));
        let painted = paint(&view, 30, 0, None).unwrap();
        let text = painted.buffer.to_text();
        assert_eq!(text.matches('…').count(), 1);
    }

    #[test]
    fn test_stars_drawn() {
        let mut review = card("Client", None);
        review.stars = Some(4.0);
        let view = View::Page(PageView::new("T").section(Section::Grid {
            max_columns: 3,
            cards: vec![review],
        }));
        let painted = paint(&view, 40, 0, None).unwrap();
        assert!(painted.buffer.to_text().contains("★★★★☆"));
    }

    #[test]
    fn test_huge_word_paints() {
        let view = View::Page(PageView::new("Post").section(Section::Paragraphs {
            title: None,
            text: format!("data:image/png;base64,{}", "A".repeat(70_000)),
        }));
        let painted = paint(&view, 44, 0, None).unwrap();
        // 40 inner columns; 70_022 characters hard-break into 1_751 rows
        assert_eq!(painted.buffer.height(), 1 + 1 + 1 + 1_751 + 1);
        assert!(painted.buffer.row_text(3).contains("data:image/png;base64,"));
    }

    #[test]
    fn test_grid_taller_than_buffer_is_cut() {
        let cards: Vec<Card> = (0..10_000)
            .map(|i| card(&format!("Client {i}"), Some(Link::Back)))
            .collect();
        let view = View::Page(PageView::new("Testimonials").section(Section::Grid {
            max_columns: 3,
            cards,
        }));
        let painted = paint(&view, 40, 0, None).unwrap();
        assert_eq!(painted.buffer.height(), u16::MAX);
        assert!(!painted.targets.is_empty());
        assert!(painted.targets.len() < 10_000);

        let last = painted.targets.last().unwrap().rect;
        assert!(last.bottom() <= painted.buffer.height());
    }

    #[test]
    fn test_links_flow() {
        let view = View::Page(PageView::new("F").section(Section::Links(vec![
            ("Email".into(), Link::External("mailto:a@b.c".into())),
            ("LinkedIn".into(), Link::External("https://linkedin.com/in/a".into())),
        ])));
        let painted = paint(&view, 60, 0, None).unwrap();
        assert_eq!(painted.targets.len(), 2);
        assert_eq!(painted.targets[0].rect.y, painted.targets[1].rect.y);
    }
}
