use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use qa_core::{AppViewModel, Focus, InputField, Msg};

const PAGE_LINES: i16 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Dispatch(Msg),
}

pub const HINTS: &str = "Enter submit · Alt+Enter newline · Tab switch pane · ↑↓ scroll · Esc quit";

/// Maps a key press to an action against the current view.
pub fn map_key(key: KeyEvent, view: &AppViewModel) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => return Some(KeyAction::Quit),
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => return Some(KeyAction::Quit),
        KeyCode::Tab | KeyCode::BackTab => return dispatch(Msg::FocusToggled),
        _ => {}
    }

    match view.focus {
        Focus::Answer => map_scroll_key(key.code),
        Focus::Input => map_input_key(key, view),
    }
}

fn map_scroll_key(code: KeyCode) -> Option<KeyAction> {
    let delta = match code {
        KeyCode::Up | KeyCode::Char('k') => -1,
        KeyCode::Down | KeyCode::Char('j') => 1,
        KeyCode::PageUp => -PAGE_LINES,
        KeyCode::PageDown | KeyCode::Char(' ') => PAGE_LINES,
        _ => return None,
    };
    dispatch(Msg::AnswerScrolled(delta))
}

fn map_input_key(key: KeyEvent, view: &AppViewModel) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let mut text = view.input_text.clone();
    match key.code {
        KeyCode::Enter if alt && view.field != InputField::Url => text.push('\n'),
        KeyCode::Enter => return dispatch(Msg::Submit),
        KeyCode::Backspace => {
            text.pop()?;
        }
        KeyCode::Char('u') if ctrl => {
            if text.is_empty() {
                return None;
            }
            text.clear();
        }
        KeyCode::Up => return dispatch(Msg::AnswerScrolled(-1)),
        KeyCode::Down => return dispatch(Msg::AnswerScrolled(1)),
        KeyCode::Char(c) if !ctrl => text.push(c),
        _ => return None,
    }
    dispatch(Msg::InputChanged(text))
}

/// Appends pasted text to the active field; URLs stay on one line.
pub fn map_paste(pasted: &str, view: &AppViewModel) -> Option<KeyAction> {
    if pasted.is_empty() || view.focus != Focus::Input {
        return None;
    }
    let mut text = view.input_text.clone();
    if view.field == InputField::Url {
        text.extend(pasted.chars().filter(|c| *c != '\n' && *c != '\r'));
    } else {
        text.push_str(&pasted.replace("\r\n", "\n"));
    }
    dispatch(Msg::InputChanged(text))
}

fn dispatch(msg: Msg) -> Option<KeyAction> {
    Some(KeyAction::Dispatch(msg))
}
