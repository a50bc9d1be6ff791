//! FrameBuffer and drawing primitives.
//!
//! A 2D grid of [`Cell`]s in row-major order (`index = y * width + x`). Pages
//! paint into a buffer as tall as their content; the app copies the visible
//! window out of it with [`FrameBuffer::viewport`].
//!
//! Wide characters occupy two cells. The second holds `'\0'` as a
//! continuation marker and is skipped on output.

use super::text::char_width;

// =============================================================================
// Cell
// =============================================================================

bitflags::bitflags! {
    /// Text attributes. Combine with `|`: `Attr::BOLD | Attr::UNDERLINE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE = 1 << 4;
    }
}

/// Semantic foreground color. The renderer maps tones to terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Default,
    Muted,
    Heading,
    Accent,
    Link,
    Star,
    Success,
    Warning,
}

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub tone: Tone,
    pub attrs: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            tone: Tone::Default,
            attrs: Attr::NONE,
        }
    }
}

impl Cell {
    /// Second half of a wide character.
    pub fn is_continuation(&self) -> bool {
        self.ch == '\0'
    }
}

/// Cell-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    #[inline]
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

// =============================================================================
// FrameBuffer
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.in_bounds(x, y).then(|| &self.cells[self.index(x, y)])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Draw text starting at (x, y), clipped to `clip` when given.
    ///
    /// Returns the number of columns advanced.
    pub fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        tone: Tone,
        attrs: Attr,
        clip: Option<&Rect>,
    ) -> u16 {
        let limit = clip.map_or(self.width, |c| c.right().min(self.width));
        let mut col = x;

        for ch in text.chars() {
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            if col + w > limit {
                break;
            }
            let visible = clip.is_none_or(|c| c.contains(col, y));
            if visible {
                if let Some(cell) = self.get_mut(col, y) {
                    *cell = Cell { ch, tone, attrs };
                }
                if w == 2 {
                    if let Some(next) = self.get_mut(col + 1, y) {
                        *next = Cell {
                            ch: '\0',
                            tone,
                            attrs,
                        };
                    }
                }
            }
            col += w;
        }

        col - x
    }

    /// Add `attrs` to every cell in `rect`.
    pub fn apply_attrs(&mut self, rect: Rect, attrs: Attr) {
        for y in rect.y..rect.bottom().min(self.height) {
            for x in rect.x..rect.right().min(self.width) {
                if let Some(cell) = self.get_mut(x, y) {
                    cell.attrs |= attrs;
                }
            }
        }
    }

    /// Draw a single-line box around `rect`.
    pub fn draw_border(&mut self, rect: Rect, tone: Tone) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let x2 = rect.right() - 1;
        let y2 = rect.bottom() - 1;

        let mut put = |x: u16, y: u16, ch: char| {
            if let Some(cell) = self.get_mut(x, y) {
                *cell = Cell {
                    ch,
                    tone,
                    attrs: Attr::NONE,
                };
            }
        };

        put(rect.x, rect.y, '┌');
        put(x2, rect.y, '┐');
        put(rect.x, y2, '└');
        put(x2, y2, '┘');
        for x in rect.x + 1..x2 {
            put(x, rect.y, '─');
            put(x, y2, '─');
        }
        for y in rect.y + 1..y2 {
            put(rect.x, y, '│');
            put(x2, y, '│');
        }
    }

    /// Copy `height` rows starting at `top` into a new buffer. Rows past the
    /// end come back blank.
    pub fn viewport(&self, top: u16, height: u16) -> FrameBuffer {
        let mut out = FrameBuffer::new(self.width, height);
        for row in 0..height {
            let src_y = top.saturating_add(row);
            if src_y >= self.height {
                break;
            }
            let src = self.index(0, src_y);
            let dst = out.index(0, row);
            let w = self.width as usize;
            out.cells[dst..dst + w].copy_from_slice(&self.cells[src..src + w]);
        }
        out
    }

    /// Text of one row with trailing blanks trimmed.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = self.index(0, y);
        let row: String = self.cells[start..start + self.width as usize]
            .iter()
            .filter(|c| !c.is_continuation())
            .map(|c| c.ch)
            .collect();
        row.trim_end().to_string()
    }

    /// Every row, joined with newlines.
    pub fn to_text(&self) -> String {
        (0..self.height)
            .map(|y| self.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_text() {
        let mut buffer = FrameBuffer::new(10, 2);
        let used = buffer.draw_text(1, 0, "hello", Tone::Default, Attr::BOLD, None);
        assert_eq!(used, 5);
        assert_eq!(buffer.row_text(0), " hello");
        assert_eq!(buffer.get(1, 0).unwrap().attrs, Attr::BOLD);
    }

    #[test]
    fn test_draw_text_clipped() {
        let mut buffer = FrameBuffer::new(10, 1);
        let clip = Rect::new(0, 0, 4, 1);
        buffer.draw_text(0, 0, "abcdefg", Tone::Default, Attr::NONE, Some(&clip));
        assert_eq!(buffer.row_text(0), "abcd");
    }

    #[test]
    fn test_wide_chars() {
        let mut buffer = FrameBuffer::new(6, 1);
        let used = buffer.draw_text(0, 0, "日本", Tone::Default, Attr::NONE, None);
        assert_eq!(used, 4);
        assert!(buffer.get(1, 0).unwrap().is_continuation());
        assert_eq!(buffer.row_text(0), "日本");
    }

    #[test]
    fn test_border() {
        let mut buffer = FrameBuffer::new(4, 3);
        buffer.draw_border(Rect::new(0, 0, 4, 3), Tone::Muted);
        assert_eq!(buffer.to_text(), "┌──┐\n│  │\n└──┘");
    }

    #[test]
    fn test_viewport() {
        let mut buffer = FrameBuffer::new(3, 4);
        for (y, label) in ["a", "b", "c", "d"].iter().enumerate() {
            buffer.draw_text(0, y as u16, label, Tone::Default, Attr::NONE, None);
        }
        let view = buffer.viewport(2, 3);
        assert_eq!(view.to_text(), "c\nd\n");
    }

    #[test]
    fn test_apply_attrs() {
        let mut buffer = FrameBuffer::new(4, 2);
        buffer.apply_attrs(Rect::new(1, 1, 2, 1), Attr::INVERSE);
        assert!(buffer.get(1, 1).unwrap().attrs.contains(Attr::INVERSE));
        assert!(!buffer.get(0, 1).unwrap().attrs.contains(Attr::INVERSE));
    }
}
