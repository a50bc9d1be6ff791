//! Card grid layout.
//!
//! The grid is a taffy flex row with `flex-wrap: wrap`. Every card gets the
//! same fixed size, so rows fill left to right and wrap when full. The column
//! count follows terminal width breakpoints, capped by the page's maximum.

use taffy::{
    AvailableSpace, Dimension, FlexDirection, FlexWrap, LengthPercentage, Size, Style, TaffyTree,
};

use crate::render::Rect;
use crate::Result;

pub const COLUMN_GAP: u16 = 2;
pub const ROW_GAP: u16 = 1;

/// Columns for a grid `width` cells wide, never more than `max_columns`.
///
/// | width   | columns |
/// |---------|---------|
/// | < 48    | 1       |
/// | 48..72  | 2       |
/// | 72..100 | 3       |
/// | 100+    | 4       |
pub fn grid_columns(width: u16, max_columns: usize) -> usize {
    let by_width = match width {
        0..48 => 1,
        48..72 => 2,
        72..100 => 3,
        _ => 4,
    };
    by_width.min(max_columns).max(1)
}

/// Computed card positions, relative to the grid's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub cards: Vec<Rect>,
    /// Total rows. Can exceed `u16::MAX` for very long lists; card rects
    /// past that row saturate.
    pub height: usize,
}

/// Lay out `count` cards of `card_height` rows in a grid `width` cells wide.
pub fn layout_grid(
    count: usize,
    width: u16,
    max_columns: usize,
    card_height: u16,
) -> Result<GridLayout> {
    let columns = grid_columns(width, max_columns);
    let gaps = COLUMN_GAP as usize * (columns - 1);
    let card_width = (width as usize).saturating_sub(gaps) / columns;

    let mut tree: TaffyTree<()> = TaffyTree::new();

    let card_style = Style {
        size: Size {
            width: Dimension::Length(card_width as f32),
            height: Dimension::Length(card_height as f32),
        },
        flex_shrink: 0.0,
        ..Default::default()
    };
    let children = (0..count)
        .map(|_| tree.new_leaf(card_style.clone()))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let root = tree.new_with_children(
        Style {
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::Wrap,
            gap: Size {
                width: LengthPercentage::Length(COLUMN_GAP as f32),
                height: LengthPercentage::Length(ROW_GAP as f32),
            },
            size: Size {
                width: Dimension::Length(width as f32),
                height: Dimension::Auto,
            },
            ..Default::default()
        },
        &children,
    )?;

    tree.compute_layout(
        root,
        Size {
            width: AvailableSpace::Definite(width as f32),
            height: AvailableSpace::MaxContent,
        },
    )?;

    let mut cards = Vec::with_capacity(count);
    for child in children {
        let layout = tree.layout(child)?;
        cards.push(Rect::new(
            layout.location.x.round() as u16,
            layout.location.y.round() as u16,
            layout.size.width.round() as u16,
            layout.size.height.round() as u16,
        ));
    }
    let height = tree.layout(root)?.size.height.round() as usize;

    Ok(GridLayout {
        columns,
        cards,
        height,
    })
}
