//! Differential renderer for fullscreen mode.
//!
//! Compares each frame to the previous one and writes only changed cells.
//!
//! # Algorithm
//!
//! 1. Begin a synchronized update
//! 2. For each cell that differs from the previous frame (or every cell when
//!    there is no previous frame, or its size changed): move the cursor if
//!    not sequential, switch style if it changed, print the character
//! 3. End the synchronized update and flush once
//! 4. Keep the frame for the next comparison

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::terminal::{
    self, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use super::buffer::{Attr, Cell, FrameBuffer, Tone};

pub struct DiffRenderer {
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// Render a frame, writing only changed cells. Returns true if any cell
    /// was written.
    pub fn render<W: Write>(&mut self, out: &mut W, buffer: &FrameBuffer) -> io::Result<bool> {
        queue!(out, BeginSynchronizedUpdate)?;

        let previous = self
            .previous
            .as_ref()
            .filter(|p| p.width() == buffer.width() && p.height() == buffer.height());

        let mut cursor: Option<(u16, u16)> = None;
        let mut style: Option<(Tone, Attr)> = None;
        let mut changed = false;

        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                let Some(cell) = buffer.get(x, y) else {
                    continue;
                };
                if cell.is_continuation() {
                    continue;
                }
                if previous.and_then(|p| p.get(x, y)) == Some(cell) {
                    continue;
                }

                if cursor != Some((x, y)) {
                    queue!(out, MoveTo(x, y))?;
                }
                if style != Some((cell.tone, cell.attrs)) {
                    write_style(out, cell)?;
                    style = Some((cell.tone, cell.attrs));
                }
                queue!(out, Print(cell.ch))?;

                let advance = super::text::char_width(cell.ch).max(1);
                cursor = Some((x + advance, y));
                changed = true;
            }
        }

        queue!(out, SetAttribute(Attribute::Reset), EndSynchronizedUpdate)?;
        out.flush()?;

        self.previous = Some(buffer.clone());
        Ok(changed)
    }

    /// Forget the previous frame; the next render redraws everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn write_style<W: Write>(out: &mut W, cell: &Cell) -> io::Result<()> {
    queue!(out, SetAttribute(Attribute::Reset))?;
    for (flag, attribute) in [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::ITALIC, Attribute::Italic),
        (Attr::UNDERLINE, Attribute::Underlined),
        (Attr::INVERSE, Attribute::Reverse),
    ] {
        if cell.attrs.contains(flag) {
            queue!(out, SetAttribute(attribute))?;
        }
    }
    queue!(out, SetForegroundColor(tone_color(cell.tone)))
}

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Default => Color::Reset,
        Tone::Muted => Color::DarkGrey,
        Tone::Heading => Color::White,
        Tone::Accent => Color::Cyan,
        Tone::Link => Color::Blue,
        Tone::Star => Color::Yellow,
        Tone::Success => Color::Green,
        Tone::Warning => Color::Red,
    }
}

// =============================================================================
// Terminal Session
// =============================================================================

/// Raw mode plus the alternate screen, restored on drop.
pub struct TerminalSession {
    out: io::Stdout,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // From here on, drop restores the terminal on any error.
        let mut session = Self { out: io::stdout() };
        execute!(session.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(session)
    }

    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    pub fn out(&mut self) -> &mut io::Stdout {
        &mut self.out
    }
}

/// Reset attributes, show the cursor and leave the alternate screen.
fn restore_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(
        out,
        SetAttribute(Attribute::Reset),
        Show,
        LeaveAlternateScreen
    )
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = restore_screen(&mut self.out);
        let _ = terminal::disable_raw_mode();
    }
}

// =============================================================================
// Tests
// =============================================================================
