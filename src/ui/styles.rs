//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// Panel styles
// =============================================================================

/// Border of the pane that currently receives keys.
pub fn active_panel_border_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn inactive_panel_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// =============================================================================
// Sidebar styles
// =============================================================================

/// Style for the New Chat and Logout actions.
pub fn sidebar_action_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Style for section headers like "-- Previous Chats --".
pub fn section_header_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn thread_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Thread whose messages are on screen.
pub fn active_thread_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn selection_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
}

// =============================================================================
// Message list styles
// =============================================================================

/// Style for the sender label above a message.
pub fn message_sender_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn message_time_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn user_message_style() -> Style {
    Style::default().fg(Color::LightBlue)
}

pub fn ai_message_style() -> Style {
    Style::default().fg(Color::White)
}

/// Style for the `AI: ...` typing indicator.
pub fn typing_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::ITALIC)
}

pub fn empty_chat_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// =============================================================================
// Input and modal styles
// =============================================================================

pub fn input_prompt_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn input_placeholder_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn modal_border_style() -> Style {
    Style::default().fg(Color::Yellow)
}

/// The "Login with Google" button.
pub fn modal_button_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn status_style() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn notice_style() -> Style {
    Style::default().fg(Color::Yellow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_thread_is_bold_yellow() {
        let style = active_thread_style();
        assert_eq!(style.fg, Some(Color::Yellow));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn user_and_ai_messages_are_distinguishable() {
        assert_ne!(user_message_style().fg, ai_message_style().fg);
    }

    #[test]
    fn typing_indicator_is_italic_green() {
        let style = typing_style();
        assert_eq!(style.fg, Some(Color::Green));
        assert!(style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn panel_borders_differ_by_focus() {
        assert_ne!(active_panel_border_style(), inactive_panel_border_style());
    }
}
