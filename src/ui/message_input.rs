//! Message input field rendering.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::domain::{message_input_state::MessageInputState, shell_state::ActivePane};

use super::styles;

/// Placeholder text shown while the input is empty.
const PLACEHOLDER_TEXT: &str = "Type a message...";

/// Prompt symbol shown before the input text.
const PROMPT_SYMBOL: &str = "> ";

/// Renders the message input field.
pub fn render_message_input(
    frame: &mut Frame<'_>,
    area: Rect,
    input_state: &MessageInputState,
    active_pane: ActivePane,
) {
    let is_focused = active_pane == ActivePane::MessageInput;

    let border_style = if is_focused {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    };

    // Inner width minus borders and prompt
    let text_width = (area.width as usize).saturating_sub(2 + PROMPT_SYMBOL.len());
    let view = visible_window(input_state, text_width);

    let paragraph = Paragraph::new(build_input_line(input_state, &view.text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );

    frame.render_widget(paragraph, area);

    if is_focused {
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(PROMPT_SYMBOL.len() as u16)
            .saturating_add(view.cursor_column.min(u16::MAX as usize) as u16);
        let cursor_y = area.y.saturating_add(1);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

/// The slice of input text that fits the field, scrolled so the cursor stays visible.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InputView {
    text: String,
    cursor_column: usize,
}

fn visible_window(input_state: &MessageInputState, width: usize) -> InputView {
    let chars = input_state.chars();
    let cursor = input_state.cursor_position().min(chars.len());
    let char_width = |ch: &char| ch.width().unwrap_or(0);

    // Drop leading characters until the text up to the cursor fits, leaving a
    // column for the cursor itself.
    let mut start = 0;
    let mut before_cursor: usize = chars[..cursor].iter().map(char_width).sum();
    while start < cursor && before_cursor + 1 > width {
        before_cursor -= char_width(&chars[start]);
        start += 1;
    }

    let mut text = String::new();
    let mut used = 0;
    for ch in &chars[start..] {
        let w = char_width(ch);
        if used + w > width {
            break;
        }
        text.push(*ch);
        used += w;
    }

    InputView {
        text,
        cursor_column: before_cursor,
    }
}

fn build_input_line(input_state: &MessageInputState, visible: &str) -> Line<'static> {
    let prompt = Span::styled(PROMPT_SYMBOL.to_owned(), styles::input_prompt_style());

    if input_state.is_empty() {
        Line::from(vec![
            prompt,
            Span::styled(
                PLACEHOLDER_TEXT.to_owned(),
                styles::input_placeholder_style(),
            ),
        ])
    } else {
        Line::from(vec![
            prompt,
            Span::styled(visible.to_owned(), styles::input_text_style()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(text: &str) -> MessageInputState {
        let mut state = MessageInputState::default();
        for ch in text.chars() {
            state.insert_char(ch);
        }
        state
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn empty_input_shows_placeholder() {
        let state = MessageInputState::default();

        let text = line_text(&build_input_line(&state, ""));

        assert_eq!(text, "> Type a message...");
    }

    #[test]
    fn typed_text_replaces_placeholder() {
        let state = input("Hi");

        let text = line_text(&build_input_line(&state, "Hi"));

        assert_eq!(text, "> Hi");
    }

    #[test]
    fn short_text_is_fully_visible() {
        let view = visible_window(&input("hello"), 20);

        assert_eq!(view.text, "hello");
        assert_eq!(view.cursor_column, 5);
    }

    #[test]
    fn long_text_scrolls_to_keep_cursor_visible() {
        let view = visible_window(&input("abcdefghij"), 5);

        assert_eq!(view.text, "ghij");
        assert_eq!(view.cursor_column, 4);
    }

    #[test]
    fn cursor_at_home_shows_text_start() {
        let mut state = input("abcdefghij");
        state.move_cursor_home();

        let view = visible_window(&state, 5);

        assert_eq!(view.text, "abcde");
        assert_eq!(view.cursor_column, 0);
    }

    #[test]
    fn wide_characters_move_cursor_two_columns() {
        let view = visible_window(&input("日本"), 10);

        assert_eq!(view.cursor_column, 4);
    }
}
