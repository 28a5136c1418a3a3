use ratatui::{
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::domain::shell_state::{ActivePane, ShellState, SidebarEntry};

use super::message_input::render_message_input;
use super::message_rendering::{build_chat_elements, build_chat_lines};
use super::styles;

const SIDEBAR_WIDTH: u16 = 28;
const LOGIN_MODAL_WIDTH: u16 = 36;
const LOGIN_MODAL_HEIGHT: u16 = 7;

pub fn render(frame: &mut Frame<'_>, state: &ShellState) {
    let [content_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .areas(frame.area());

    let main_area = if state.sidebar_open() {
        let [sidebar_area, main_area] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
            .areas(content_area);
        render_sidebar(frame, sidebar_area, state);
        main_area
    } else {
        content_area
    };

    // 3 lines for input: 1 border + 1 text + 1 border
    let [chat_area, input_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .areas(main_area);

    let active_pane = state.active_pane();
    render_chat_panel(frame, chat_area, state, active_pane);
    render_message_input(frame, input_area, state.message_input(), active_pane);
    frame.render_widget(Paragraph::new(status_line(state)), status_area);

    if state.login_modal_visible() {
        render_login_modal(frame, content_area);
    }
}

fn render_sidebar(frame: &mut Frame<'_>, area: Rect, state: &ShellState) {
    let is_active = state.active_pane() == ActivePane::Sidebar;
    let border_style = if is_active {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    };

    let entries = state.sidebar_entries();
    let items = build_sidebar_items(&entries, state.active_chat_id());

    let list = List::new(items)
        .block(
            Block::default()
                .title("Chats")
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(styles::selection_style());

    let mut list_state = ListState::default();
    if is_active {
        list_state.select(Some(visual_index(&entries, state.sidebar_selected())));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Actions first, then a "Previous Chats" header and the numbered threads.
fn build_sidebar_items(entries: &[SidebarEntry], active_chat_id: Option<&str>) -> Vec<ListItem<'static>> {
    let mut items = Vec::new();
    let mut header_shown = false;

    for entry in entries {
        match entry {
            SidebarEntry::NewChat => {
                items.push(ListItem::new(Span::styled("+ New Chat", styles::sidebar_action_style())));
            }
            SidebarEntry::Logout => {
                items.push(ListItem::new(Span::styled("Logout", styles::sidebar_action_style())));
            }
            SidebarEntry::Thread { chat_id, label } => {
                if !header_shown {
                    items.push(ListItem::new(Span::styled(
                        "-- Previous Chats --",
                        styles::section_header_style(),
                    )));
                    header_shown = true;
                }
                let style = if Some(chat_id.as_str()) == active_chat_id {
                    styles::active_thread_style()
                } else {
                    styles::thread_style()
                };
                items.push(ListItem::new(Span::styled(label.clone(), style)));
            }
        }
    }

    items
}

/// Maps an entry index to its row, skipping the section header.
fn visual_index(entries: &[SidebarEntry], selected: usize) -> usize {
    let first_thread = entries
        .iter()
        .position(|entry| matches!(entry, SidebarEntry::Thread { .. }));

    match first_thread {
        Some(first) if selected >= first => selected + 1,
        _ => selected,
    }
}

fn render_chat_panel(frame: &mut Frame<'_>, area: Rect, state: &ShellState, active_pane: ActivePane) {
    let border_style = if active_pane == ActivePane::MessageInput {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    };
    let block = Block::default()
        .title(chat_title(state))
        .borders(Borders::ALL)
        .border_style(border_style);

    let elements = build_chat_elements(state.chat_history(), state.typing());
    if elements.is_empty() {
        let hint = if state.is_logged_in() {
            "Start a conversation below."
        } else {
            "Type a message to get started. You'll be asked to log in."
        };
        let panel = Paragraph::new(Span::styled(hint, styles::empty_chat_style())).block(block);
        frame.render_widget(panel, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let viewport_height = area.height.saturating_sub(2) as usize;
    let lines = build_chat_lines(&elements, inner_width);

    // Keep the newest line in view
    let scroll = lines.len().saturating_sub(viewport_height).min(u16::MAX as usize) as u16;
    let panel = Paragraph::new(lines).block(block).scroll((scroll, 0));
    frame.render_widget(panel, area);
}

fn chat_title(state: &ShellState) -> String {
    let Some(chat_id) = state.active_chat_id() else {
        return "New Chat".to_owned();
    };

    match state.threads().position(chat_id) {
        Some(index) => format!("Chat - {}", index + 1),
        None => "Chat".to_owned(),
    }
}

fn render_login_modal(frame: &mut Frame<'_>, area: Rect) {
    let modal_area = centered(area, LOGIN_MODAL_WIDTH, LOGIN_MODAL_HEIGHT);

    let lines = vec![
        Line::default(),
        Line::from(Span::styled(" Login with Google ", styles::modal_button_style()))
            .alignment(Alignment::Center),
        Line::default(),
        Line::from(Span::styled(
            "Enter: login | Esc: close",
            styles::section_header_style(),
        ))
        .alignment(Alignment::Center),
    ];

    let modal = Paragraph::new(lines).block(
        Block::default()
            .title("Please log in")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(styles::modal_border_style()),
    );

    frame.render_widget(Clear, modal_area);
    frame.render_widget(modal, modal_area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

fn status_line(state: &ShellState) -> Line<'static> {
    let user = state
        .user()
        .map(|user| format!("user: {}", user.display_name()))
        .unwrap_or_else(|| "not logged in".to_owned());
    let nav_hint = match state.active_pane() {
        ActivePane::MessageInput => {
            "Enter: send | Ctrl+B: chats | Ctrl+N: new | Ctrl+L: logout | Ctrl+C: quit"
        }
        ActivePane::Sidebar => "j/k: move | Enter: open | Esc: back | Ctrl+B: hide",
        ActivePane::LoginModal => "Enter: login | Esc: close",
    };

    let mut spans = vec![Span::styled(user, styles::status_style())];
    if let Some(notice) = state.notice() {
        spans.push(Span::styled(" | ", styles::status_style()));
        spans.push(Span::styled(notice.to_owned(), styles::notice_style()));
    }
    spans.push(Span::styled(format!(" | {nav_hint}"), Style::default()));
    Line::from(spans)
}
