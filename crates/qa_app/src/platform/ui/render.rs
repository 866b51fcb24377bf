use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::Frame;

use qa_core::{AppViewModel, BackendStatus, Focus, Mode};

use super::keys::HINTS;
use super::layout;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn render(frame: &mut Frame, view: &AppViewModel) {
    let areas = layout::split(frame.area(), view);

    frame.render_widget(Paragraph::new(title_line(view)), areas.title);

    let input_block = Block::bordered()
        .title(view.field.label())
        .border_style(input_border_style(view));
    let inner = input_block.inner(areas.input);
    let rows = layout::wrap_input(&view.input_text, inner.width);
    let cursor_row = u16::try_from(rows.len().saturating_sub(1)).unwrap_or(u16::MAX);
    let cursor_col = rows
        .last()
        .map_or(0, |row| u16::try_from(row.chars().count()).unwrap_or(u16::MAX));
    // Keep the row holding the cursor on screen.
    let input_scroll = cursor_row.saturating_add(1).saturating_sub(inner.height);

    let input_text = if view.input_text.is_empty() {
        Text::from(Span::styled(
            view.field.placeholder(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let style = if view.busy {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        Text::from(rows.into_iter().map(Line::from).collect::<Vec<_>>()).style(style)
    };
    frame.render_widget(
        Paragraph::new(input_text)
            .scroll((input_scroll, 0))
            .block(input_block),
        areas.input,
    );

    frame.render_widget(Paragraph::new(action_line(view)), areas.action);

    let answer_block = Block::bordered()
        .title("Answer")
        .border_style(border_style(view.focus == Focus::Answer));
    let max_scroll = answer_max_scroll(answer_block.inner(areas.answer), view);
    frame.render_widget(
        Paragraph::new(answer_text(view))
            .wrap(Wrap { trim: false })
            .scroll((view.answer_scroll.min(max_scroll), 0))
            .block(answer_block),
        areas.answer,
    );

    frame.render_widget(
        Paragraph::new(Span::styled(HINTS, Style::default().fg(Color::DarkGray))),
        areas.hints,
    );

    if view.focus == Focus::Input {
        frame.set_cursor_position(Position::new(
            inner.x + cursor_col.min(inner.width.saturating_sub(1)),
            inner.y + cursor_row.saturating_sub(input_scroll).min(inner.height.saturating_sub(1)),
        ));
    }
}

/// Largest answer scroll offset that still shows text in a frame of `area`.
pub fn answer_scroll_limit(area: Rect, view: &AppViewModel) -> u16 {
    let pane = layout::split(area, view).answer;
    answer_max_scroll(Block::bordered().inner(pane), view)
}

fn answer_max_scroll(inner: Rect, view: &AppViewModel) -> u16 {
    let rows = Paragraph::new(answer_text(view))
        .wrap(Wrap { trim: false })
        .line_count(inner.width);
    u16::try_from(rows)
        .unwrap_or(u16::MAX)
        .saturating_sub(inner.height)
}

fn title_line(view: &AppViewModel) -> Line<'static> {
    let mode = match view.mode {
        Mode::Chat => "chat",
        Mode::Site => "site",
    };
    let mut spans = vec![
        Span::styled(
            "Grounded QA",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" · {mode} mode")),
    ];
    // Site mode has no /chat backend to report on.
    if view.mode == Mode::Chat {
        let (backend, color) = match view.backend {
            BackendStatus::Unknown => ("checking…", Color::DarkGray),
            BackendStatus::Online => ("online", Color::Green),
            BackendStatus::Offline => ("offline", Color::Red),
        };
        spans.push(Span::raw(" · backend "));
        spans.push(Span::styled(backend, Style::default().fg(color)));
    }
    Line::from(spans)
}

fn action_line(view: &AppViewModel) -> Line<'static> {
    let mut spans = Vec::new();
    let label = format!("[ {} ]", view.action_label);
    if view.action_enabled {
        spans.push(Span::styled(
            label,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::styled(label, Style::default().fg(Color::DarkGray)));
    }
    if view.busy {
        let frame = SPINNER_FRAMES[view.spinner_frame % SPINNER_FRAMES.len()];
        spans.push(Span::styled(
            format!(" {frame}"),
            Style::default().fg(Color::Cyan),
        ));
    }
    if let Some(url) = &view.ingested_url {
        spans.push(Span::raw("  Source: "));
        spans.push(Span::styled(
            url.clone(),
            Style::default().add_modifier(Modifier::UNDERLINED),
        ));
    }
    Line::from(spans)
}

fn answer_text(view: &AppViewModel) -> Text<'static> {
    let mut text = view.answer.clone().map(Text::from).unwrap_or_default();
    if let Some(error) = &view.error {
        text.push_line(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    text
}

fn input_border_style(view: &AppViewModel) -> Style {
    if view.busy {
        Style::default().fg(Color::DarkGray)
    } else {
        border_style(view.focus == Focus::Input)
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}
