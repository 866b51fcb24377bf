use ratatui::layout::{Constraint, Layout, Rect};

use qa_core::AppViewModel;

const MAX_INPUT_LINES: u16 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub title: Rect,
    pub input: Rect,
    pub action: Rect,
    pub answer: Rect,
    pub hints: Rect,
}

/// Splits the frame top to bottom; the input box grows with its wrapped text.
pub fn split(area: Rect, view: &AppViewModel) -> AppLayout {
    let rows = wrap_input(&view.input_text, area.width.saturating_sub(2)).len();
    let input_lines = u16::try_from(rows)
        .unwrap_or(MAX_INPUT_LINES)
        .clamp(1, MAX_INPUT_LINES);
    let [title, input, action, answer, hints] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(input_lines + 2),
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    AppLayout {
        title,
        input,
        action,
        answer,
        hints,
    }
}

/// Hard-wraps input text into rows of at most `width` chars.
///
/// The cursor sits after the last char, so a full last row is followed by an
/// empty one for it to land on.
pub fn wrap_input(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            rows.push(String::new());
            continue;
        }
        rows.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
    }
    if rows.last().is_some_and(|row| row.chars().count() == width) {
        rows.push(String::new());
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use qa_core::{update, AppState, Mode, Msg};

    #[test]
    fn input_box_grows_up_to_limit() {
        let area = Rect::new(0, 0, 80, 30);
        let (state, _) = update(
            AppState::new(Mode::Chat),
            Msg::InputChanged("a\nb\nc".to_string()),
        );
        assert_eq!(split(area, &state.view()).input.height, 5);

        let (state, _) = update(state, Msg::InputChanged("x\n".repeat(20)));
        assert_eq!(split(area, &state.view()).input.height, MAX_INPUT_LINES + 2);
    }

    #[test]
    fn long_lines_count_as_wrapped_rows() {
        let area = Rect::new(0, 0, 22, 30);
        let (state, _) = update(AppState::new(Mode::Chat), Msg::InputChanged("a".repeat(45)));
        assert_eq!(split(area, &state.view()).input.height, 3 + 2);
    }

    #[test]
    fn wrap_input_splits_on_width_and_newlines() {
        assert_eq!(wrap_input("", 4), vec![String::new()]);
        assert_eq!(wrap_input("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap_input("ab\n\ncd", 4), vec!["ab", "", "cd"]);
        assert_eq!(wrap_input("abcd", 4), vec!["abcd", ""]);
    }

    #[test]
    fn answer_takes_remaining_space() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = split(area, &AppState::new(Mode::Chat).view());
        assert_eq!(layout.title.y, 0);
        assert_eq!(layout.hints.y, 23);
        assert_eq!(layout.answer.height, 24 - 1 - 3 - 1 - 1);
    }
}
