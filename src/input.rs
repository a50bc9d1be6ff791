//! Input - crossterm events to app keys.
//!
//! Only key presses matter; releases, repeats on terminals that report
//! them, mouse and paste events are dropped. Resizes are passed through so
//! the app can repaint.

use std::io;
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Keys the app reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Tab,
    BackTab,
    Enter,
    Back,
    PageUp,
    PageDown,
    Home,
    End,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    Resize(u16, u16),
}

/// Map a crossterm key event. `None` for keys the app ignores.
pub fn convert_key_event(event: KeyEvent) -> Option<Key> {
    if event.kind != KeyEventKind::Press {
        return None;
    }

    let key = match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Key::Quit,
        KeyCode::Char('q') => Key::Quit,
        KeyCode::Char('b') | KeyCode::Esc | KeyCode::Backspace => Key::Back,
        KeyCode::Char('j') | KeyCode::Down => Key::Down,
        KeyCode::Char('k') | KeyCode::Up => Key::Up,
        KeyCode::Char('h') | KeyCode::Left => Key::Left,
        KeyCode::Char('l') | KeyCode::Right => Key::Right,
        KeyCode::Tab if event.modifiers.contains(KeyModifiers::SHIFT) => Key::BackTab,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Enter => Key::Enter,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => return None,
    };
    Some(key)
}

pub fn convert_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) => convert_key_event(key).map(InputEvent::Key),
        Event::Resize(w, h) => Some(InputEvent::Resize(w, h)),
        _ => None,
    }
}

/// Wait up to `timeout` for the next relevant event.
pub fn poll_event(timeout: Duration) -> io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(convert_event(read()?))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(convert_key_event(press(KeyCode::Down)), Some(Key::Down));
        assert_eq!(convert_key_event(press(KeyCode::Up)), Some(Key::Up));
        assert_eq!(convert_key_event(press(KeyCode::Tab)), Some(Key::Tab));
        assert_eq!(convert_key_event(press(KeyCode::BackTab)), Some(Key::BackTab));
        assert_eq!(convert_key_event(press(KeyCode::Enter)), Some(Key::Enter));
    }

    #[test]
    fn test_back_keys() {
        for code in [KeyCode::Esc, KeyCode::Backspace, KeyCode::Char('b')] {
            assert_eq!(convert_key_event(press(code)), Some(Key::Back));
        }
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(convert_key_event(press(KeyCode::Char('q'))), Some(Key::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(convert_key_event(ctrl_c), Some(Key::Quit));
        assert_eq!(convert_key_event(press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_release_ignored() {
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(convert_key_event(release), None);
    }

    #[test]
    fn test_resize_passes_through() {
        assert_eq!(
            convert_event(Event::Resize(80, 24)),
            Some(InputEvent::Resize(80, 24))
        );
        assert_eq!(convert_event(Event::FocusGained), None);
    }
}
