//! App shell - one mounted page, focus, scrolling and key handling.
//!
//! # Lifecycle
//!
//! ```text
//! App::new(route)
//!   └── mount page ── render effect (page.view() + focus) ── marks dirty
//!
//! navigate / back
//!   ├── stop render effect
//!   ├── dispose old page (unsubscribes all its hooks)
//!   └── mount new page, new render effect
//! ```
//!
//! The app never touches the terminal. The event loop asks for a
//! [`frame`](App::frame) when [`is_dirty`](App::is_dirty) and hands it to
//! the diff renderer; external links come back as [`Action::Open`].

use std::cell::Cell;
use std::process::{Command, Stdio};
use std::rc::Rc;
use std::thread;

use spark_signals::{effect, signal, Signal};
use tracing::{debug, info, warn};

use crate::hooks::Context;
use crate::input::Key;
use crate::pages::{self, Page};
use crate::render::FrameBuffer;
use crate::router::{History, Route};
use crate::view::{paint, Link, Target};
use crate::Result;

/// What the event loop should do after a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// Open a URL outside the app.
    Open(String),
}

pub struct App {
    cx: Context,
    history: History,
    page: Rc<dyn Page>,
    stop_render: Option<Box<dyn FnOnce()>>,
    dirty: Rc<Cell<bool>>,
    focus: Signal<Option<usize>>,
    scroll: u16,
    width: u16,
    height: u16,
    targets: Vec<Target>,
    content_height: u16,
}

impl App {
    pub fn new(cx: Context, start: Route, width: u16, height: u16) -> Self {
        let page: Rc<dyn Page> = Rc::from(pages::mount(&start, &cx));
        let mut app = Self {
            cx,
            history: History::new(start),
            page,
            stop_render: None,
            dirty: Rc::new(Cell::new(true)),
            focus: signal(None),
            scroll: 0,
            width,
            height,
            targets: Vec::new(),
            content_height: 0,
        };
        app.watch();
        app
    }

    pub fn route(&self) -> &Route {
        self.history.current()
    }

    pub fn focused(&self) -> Option<usize> {
        self.focus.get()
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Whether something changed since the last frame.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn navigate(&mut self, route: Route) {
        if self.history.push(route) {
            self.remount();
        }
    }

    /// Go to the previous route. Returns false at the root.
    pub fn back(&mut self) -> bool {
        if !self.history.back() {
            return false;
        }
        self.remount();
        true
    }

    fn remount(&mut self) {
        self.unwatch();
        self.page.dispose();

        let route = self.history.current().clone();
        debug!(%route, "mounting page");
        self.page = Rc::from(pages::mount(&route, &self.cx));

        self.scroll = 0;
        self.targets.clear();
        self.focus.set(None);
        self.watch();
    }

    /// Render effect: re-runs whenever the page's data or the focus changes.
    fn watch(&mut self) {
        let page = self.page.clone();
        let focus = self.focus.clone();
        let dirty = self.dirty.clone();

        let stop = effect(move || {
            let _ = page.view();
            let _ = focus.get();
            dirty.set(true);
        });
        self.stop_render = Some(Box::new(stop));
    }

    fn unwatch(&mut self) {
        if let Some(stop) = self.stop_render.take() {
            stop();
        }
    }

    // =========================================================================
    // Frames
    // =========================================================================

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.dirty.set(true);
    }

    /// Paint the current page and return the visible window.
    pub fn frame(&mut self) -> Result<FrameBuffer> {
        let view = self.page.view();
        let focus = self.focus.get();
        let painted = paint(&view, self.width, self.height, focus)?;

        self.targets = painted.targets;
        self.content_height = painted.buffer.height();

        if focus.is_some_and(|i| i >= self.targets.len()) {
            self.focus.set(None);
        }
        self.clamp_scroll();
        self.dirty.set(false);

        Ok(painted.buffer.viewport(self.scroll, self.height))
    }

    fn max_scroll(&self) -> u16 {
        self.content_height.saturating_sub(self.height)
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn scroll_by(&mut self, delta: i32) {
        let next = (self.scroll as i32 + delta).clamp(0, self.max_scroll() as i32);
        if next as u16 != self.scroll {
            self.scroll = next as u16;
            self.dirty.set(true);
        }
    }

    /// Scroll so the focused target is fully on screen.
    fn reveal_focus(&mut self) {
        let Some(rect) = self.focus.get().and_then(|i| self.targets.get(i)).map(|t| t.rect) else {
            return;
        };
        if rect.y < self.scroll {
            self.scroll = rect.y.saturating_sub(1);
        } else if rect.bottom() > self.scroll.saturating_add(self.height) {
            self.scroll = rect.bottom().saturating_sub(self.height);
        }
        self.clamp_scroll();
        self.dirty.set(true);
    }

    // =========================================================================
    // Keys
    // =========================================================================

    pub fn handle_key(&mut self, key: Key) -> Action {
        match key {
            Key::Quit => return Action::Quit,
            Key::Back => {
                self.back();
            }
            Key::Down | Key::Right | Key::Tab => self.move_focus(1),
            Key::Up | Key::Left | Key::BackTab => self.move_focus(-1),
            Key::PageDown => self.scroll_by(self.height.saturating_sub(1).max(1) as i32),
            Key::PageUp => self.scroll_by(-(self.height.saturating_sub(1).max(1) as i32)),
            Key::Home => self.scroll_by(-(self.scroll as i32)),
            Key::End => self.scroll_by(self.max_scroll() as i32),
            Key::Enter => return self.activate(),
        }
        Action::None
    }

    /// Step focus through the targets, wrapping. Pages without targets
    /// scroll instead.
    fn move_focus(&mut self, step: i32) {
        let count = self.targets.len() as i32;
        if count == 0 {
            self.scroll_by(step);
            return;
        }
        let next = match self.focus.get() {
            None if step > 0 => 0,
            None => count - 1,
            Some(i) => (i as i32 + step).rem_euclid(count),
        };
        self.focus.set(Some(next as usize));
        self.reveal_focus();
    }

    fn activate(&mut self) -> Action {
        let Some(link) = self
            .focus
            .get()
            .and_then(|i| self.targets.get(i))
            .map(|t| t.link.clone())
        else {
            return Action::None;
        };

        match link {
            Link::Back => {
                self.back();
                Action::None
            }
            Link::Route(route) => {
                self.navigate(route);
                Action::None
            }
            Link::External(url) => Action::Open(url),
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.unwatch();
        self.page.dispose();
    }
}

// =============================================================================
// External links
// =============================================================================

pub fn is_web_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// The platform opener for `url`. The URL is always a single argument handed
/// straight to the opener, never to a shell.
fn opener_command(url: &str) -> Command {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("rundll32");
        cmd.arg("url.dll,FileProtocolHandler");
        cmd
    } else {
        Command::new("xdg-open")
    };
    command.arg(url);
    command
}

/// Open `url` with the platform opener. Only http(s) URLs are opened;
/// returns whether an opener was started.
pub fn open_external(url: &str) -> Result<bool> {
    if !is_web_url(url) {
        warn!(url, "not opening non-web link");
        return Ok(false);
    }

    let mut child = opener_command(url.trim())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    // Openers exit quickly; reap off the event loop so no zombie is left.
    thread::spawn(move || {
        if let Err(err) = child.wait() {
            debug!(%err, "opener wait failed");
        }
    });

    info!(url, "opened external link");
    Ok(true)
}

// =============================================================================
// TESTS
// =============================================================================
