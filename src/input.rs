//! Input mapping: events → messages.
//!
//! Pure functions that translate keyboard and resize events into the
//! application's `Message` type.

use opentui::{Event, KeyCode, KeyModifiers};

use crate::message::Message;
use crate::model::{Focus, Model, Screen};

pub fn map_event_to_message(model: &Model, event: &Event) -> Message {
    match event {
        Event::Key(key) => map_key(model, key.code, key.modifiers),
        Event::Resize(resize) => Message::Resize {
            width: resize.width.saturating_sub(2).max(1),
            height: resize.height,
        },
        _ => Message::Noop,
    }
}

/// Map one key press for the current screen and focus.
#[must_use]
pub fn map_key(model: &Model, key: KeyCode, modifiers: KeyModifiers) -> Message {
    // Check for Ctrl+C to quit
    if modifiers.contains(KeyModifiers::CTRL) && key == KeyCode::Char('c') {
        return Message::Quit;
    }

    match (model.screen, model.focus) {
        (Screen::RfcList, _) => map_rfc_list_key(key),
        (Screen::RfcDetail, Focus::Composer | Focus::Reply | Focus::GeneralComposer) => {
            map_editor_key(key, modifiers)
        }
        (Screen::RfcDetail, _) => map_document_key(model, key, modifiers),
    }
}

fn map_rfc_list_key(key: KeyCode) -> Message {
    match key {
        KeyCode::Char('q') => Message::Quit,
        KeyCode::Char('j') | KeyCode::Down => Message::ListDown,
        KeyCode::Char('k') | KeyCode::Up => Message::ListUp,
        KeyCode::Char('g') | KeyCode::Home => Message::ListTop,
        KeyCode::Char('G') | KeyCode::End => Message::ListBottom,
        KeyCode::PageUp => Message::ListPageUp,
        KeyCode::PageDown => Message::ListPageDown,
        KeyCode::Enter | KeyCode::Char('l') => Message::OpenSelected,
        KeyCode::Tab | KeyCode::Char('f') => Message::CycleRepo,
        KeyCode::Char('r' | 'R') => Message::Refresh,
        KeyCode::Char('t') => Message::CycleTheme,
        _ => Message::Noop,
    }
}

fn map_document_key(model: &Model, key: KeyCode, modifiers: KeyModifiers) -> Message {
    if modifiers.contains(KeyModifiers::CTRL) {
        return match key {
            KeyCode::Char('d') => Message::HalfPageDown,
            KeyCode::Char('u') => Message::HalfPageUp,
            _ => Message::Noop,
        };
    }

    let visual = model
        .rfc
        .as_ref()
        .is_some_and(|view| view.visual_anchor.is_some());

    match key {
        KeyCode::Esc if visual => Message::VisualToggle,
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('h') => Message::Back,
        KeyCode::Char('j') | KeyCode::Down => Message::CursorDown,
        KeyCode::Char('k') | KeyCode::Up => Message::CursorUp,
        KeyCode::Char('g') | KeyCode::Home => Message::CursorTop,
        KeyCode::Char('G') | KeyCode::End => Message::CursorBottom,
        KeyCode::Char('b') | KeyCode::PageUp => Message::PageUp,
        KeyCode::Char('f') | KeyCode::PageDown => Message::PageDown,
        KeyCode::Char('n') => Message::NextCommented,
        KeyCode::Char('p' | 'N') => Message::PrevCommented,
        KeyCode::Char('V' | 'v') => Message::VisualToggle,
        KeyCode::Char('c') | KeyCode::Enter => Message::OpenComposer,
        KeyCode::Char('r') => Message::OpenReply,
        KeyCode::Char('z') => Message::ToggleCollapse,
        KeyCode::Char('C') => Message::OpenGeneralComposer,
        KeyCode::Char('R') => Message::Reload,
        KeyCode::Char('t') => Message::CycleTheme,
        _ => Message::Noop,
    }
}

fn map_editor_key(key: KeyCode, modifiers: KeyModifiers) -> Message {
    if modifiers.contains(KeyModifiers::CTRL) {
        return match key {
            KeyCode::Char('s') | KeyCode::Enter => Message::Submit,
            KeyCode::Char('w') => Message::EditorDeleteWord,
            KeyCode::Char('u') => Message::EditorClearLine,
            KeyCode::Char('a') => Message::EditorHome,
            KeyCode::Char('e') => Message::EditorEnd,
            KeyCode::Char('b') => Message::EditorLeft,
            KeyCode::Char('f') => Message::EditorRight,
            _ => Message::Noop,
        };
    }
    if modifiers.contains(KeyModifiers::ALT) {
        return match key {
            KeyCode::Enter => Message::Submit,
            KeyCode::Char('b') => Message::EditorWordLeft,
            KeyCode::Char('f') => Message::EditorWordRight,
            _ => Message::Noop,
        };
    }
    match key {
        KeyCode::Esc => Message::CancelEdit,
        KeyCode::Enter => Message::EditorNewline,
        KeyCode::Up => Message::EditorUp,
        KeyCode::Down => Message::EditorDown,
        KeyCode::Left => Message::EditorLeft,
        KeyCode::Right => Message::EditorRight,
        KeyCode::Home => Message::EditorHome,
        KeyCode::End => Message::EditorEnd,
        KeyCode::Backspace => Message::EditorBackspace,
        KeyCode::Tab => Message::EditorInsert(' '),
        KeyCode::Char(c) => Message::EditorInsert(c),
        _ => Message::Noop,
    }
}
