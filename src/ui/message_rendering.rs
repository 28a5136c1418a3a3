//! Conversation rendering logic.
//!
//! Handles visual formatting of the chat pane:
//! - User messages right-aligned, assistant messages left-aligned
//! - Word wrapping by display width (wide glyphs count as two columns)
//! - The `AI: ...` typing indicator below the last message

use ratatui::{
    layout::Alignment,
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::{
    message::{ChatMessage, Sender},
    typing::TypingState,
};

use super::styles;

/// Share of the pane width a single message may occupy, in percent.
const BUBBLE_WIDTH_PERCENT: usize = 80;
const MIN_BUBBLE_WIDTH: usize = 10;

/// Represents a visual element in the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatElement {
    Message {
        sender: Sender,
        time: Option<String>,
        content: String,
    },
    /// Typing indicator frame (e.g. `...` or `Hel|`).
    Typing(String),
}

pub fn build_chat_elements(messages: &[ChatMessage], typing: &TypingState) -> Vec<ChatElement> {
    let mut elements: Vec<ChatElement> = messages
        .iter()
        .map(|message| ChatElement::Message {
            sender: message.sender,
            time: message.display_time(),
            content: message.text.clone(),
        })
        .collect();

    if let Some(frame) = typing.frame() {
        elements.push(ChatElement::Typing(frame));
    }

    elements
}

/// Lays out all elements for a pane `width` columns wide, with a blank line between messages.
pub fn build_chat_lines(elements: &[ChatElement], width: usize) -> Vec<Line<'static>> {
    let bubble_width = (width * BUBBLE_WIDTH_PERCENT / 100)
        .max(MIN_BUBBLE_WIDTH)
        .min(width.max(1));

    let mut lines = Vec::new();
    for (index, element) in elements.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        lines.extend(element_lines(element, bubble_width));
    }
    lines
}

fn element_lines(element: &ChatElement, bubble_width: usize) -> Vec<Line<'static>> {
    match element {
        ChatElement::Message {
            sender,
            time,
            content,
        } => message_lines(*sender, time.as_deref(), content, bubble_width),
        ChatElement::Typing(frame) => {
            let text = format!("AI: {frame}");
            wrap_text(&text, bubble_width)
                .into_iter()
                .map(|row| Line::from(Span::styled(row, styles::typing_style())))
                .collect()
        }
    }
}

fn message_lines(
    sender: Sender,
    time: Option<&str>,
    content: &str,
    bubble_width: usize,
) -> Vec<Line<'static>> {
    let (label, alignment, text_style) = match sender {
        Sender::User => ("You", Alignment::Right, styles::user_message_style()),
        Sender::Ai => ("AI", Alignment::Left, styles::ai_message_style()),
    };

    let mut header = vec![Span::styled(label.to_owned(), styles::message_sender_style())];
    if let Some(time) = time {
        header.push(Span::styled(format!(" {time}"), styles::message_time_style()));
    }

    let mut lines = vec![Line::from(header).alignment(alignment)];
    lines.extend(
        wrap_text(content, bubble_width)
            .into_iter()
            .map(|row| Line::from(Span::styled(row, text_style)).alignment(alignment)),
    );
    lines
}

/// Greedy word wrap by display width. Words wider than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return text.lines().map(ToOwned::to_owned).collect();
    }

    let mut rows = Vec::new();
    for paragraph in text.split('\n') {
        let mut row = String::new();
        let mut row_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            let separator = usize::from(!row.is_empty());

            if row_width + separator + word_width <= width {
                if separator == 1 {
                    row.push(' ');
                }
                row.push_str(word);
                row_width += separator + word_width;
                continue;
            }

            if !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }

            if word_width <= width {
                row.push_str(word);
                row_width = word_width;
            } else {
                for ch in word.chars() {
                    let ch_width = ch.width().unwrap_or(0);
                    if row_width + ch_width > width && !row.is_empty() {
                        rows.push(std::mem::take(&mut row));
                        row_width = 0;
                    }
                    row.push(ch);
                    row_width += ch_width;
                }
            }
        }

        rows.push(row);
    }
    rows
}
