use super::{
    message::ChatMessage, message_input_state::MessageInputState, thread::ThreadIndex,
    typing::TypingState, user::UserProfile,
};

/// Which part of the screen receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    MessageInput,
    Sidebar,
    LoginModal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEntry {
    NewChat,
    Logout,
    Thread { chat_id: String, label: String },
}

/// A sent message whose reply has not been committed to the thread yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub user_text: String,
    /// Conversation as it was right after the user message was appended.
    pub history: Vec<ChatMessage>,
    pub chat_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    running: bool,
    user: Option<UserProfile>,
    threads: ThreadIndex,
    active_chat_id: Option<String>,
    chat_history: Vec<ChatMessage>,
    typing: TypingState,
    pending_reply: Option<PendingReply>,
    login_modal_visible: bool,
    login_requested: bool,
    sidebar_open: bool,
    sidebar_focused: bool,
    sidebar_selected: usize,
    message_input: MessageInputState,
    notice: Option<String>,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            running: true,
            user: None,
            threads: ThreadIndex::default(),
            active_chat_id: None,
            chat_history: Vec::new(),
            typing: TypingState::Idle,
            pending_reply: None,
            login_modal_visible: false,
            login_requested: false,
            sidebar_open: false,
            sidebar_focused: false,
            sidebar_selected: 0,
            message_input: MessageInputState::default(),
            notice: None,
        }
    }
}

impl ShellState {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn set_user(&mut self, user: UserProfile) {
        self.user = Some(user);
    }

    pub fn threads(&self) -> &ThreadIndex {
        &self.threads
    }

    pub fn threads_mut(&mut self) -> &mut ThreadIndex {
        &mut self.threads
    }

    pub fn replace_threads(&mut self, threads: ThreadIndex) {
        self.threads = threads;
        self.clamp_sidebar_selection();
    }

    pub fn active_chat_id(&self) -> Option<&str> {
        self.active_chat_id.as_deref()
    }

    pub fn set_active_chat_id(&mut self, chat_id: Option<String>) {
        self.active_chat_id = chat_id;
    }

    pub fn chat_history(&self) -> &[ChatMessage] {
        &self.chat_history
    }

    pub fn set_chat_history(&mut self, messages: Vec<ChatMessage>) {
        self.chat_history = messages;
    }

    pub fn push_message(&mut self, message: ChatMessage) {
        self.chat_history.push(message);
    }

    pub fn typing(&self) -> &TypingState {
        &self.typing
    }

    pub fn typing_mut(&mut self) -> &mut TypingState {
        &mut self.typing
    }

    pub fn set_typing(&mut self, typing: TypingState) {
        self.typing = typing;
    }

    pub fn pending_reply(&self) -> Option<&PendingReply> {
        self.pending_reply.as_ref()
    }

    pub fn pending_reply_mut(&mut self) -> Option<&mut PendingReply> {
        self.pending_reply.as_mut()
    }

    pub fn set_pending_reply(&mut self, pending: PendingReply) {
        self.pending_reply = Some(pending);
    }

    pub fn take_pending_reply(&mut self) -> Option<PendingReply> {
        self.pending_reply.take()
    }

    pub fn login_modal_visible(&self) -> bool {
        self.login_modal_visible && !self.is_logged_in()
    }

    pub fn show_login_modal(&mut self) {
        self.login_modal_visible = true;
    }

    pub fn hide_login_modal(&mut self) {
        self.login_modal_visible = false;
    }

    pub fn request_login(&mut self) {
        self.login_requested = true;
    }

    /// Returns whether a login was requested since the last call.
    pub fn take_login_request(&mut self) -> bool {
        std::mem::take(&mut self.login_requested)
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    /// Opening the sidebar also moves focus into it.
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_focused = self.sidebar_open;
        self.clamp_sidebar_selection();
    }

    pub fn focus_input(&mut self) {
        self.sidebar_focused = false;
    }

    pub fn active_pane(&self) -> ActivePane {
        if self.login_modal_visible() {
            ActivePane::LoginModal
        } else if self.sidebar_open && self.sidebar_focused {
            ActivePane::Sidebar
        } else {
            ActivePane::MessageInput
        }
    }

    pub fn sidebar_entries(&self) -> Vec<SidebarEntry> {
        let mut entries = vec![SidebarEntry::NewChat];
        if self.is_logged_in() {
            entries.push(SidebarEntry::Logout);
        }
        entries.extend(
            self.threads
                .iter()
                .enumerate()
                .map(|(index, (chat_id, _))| SidebarEntry::Thread {
                    chat_id: chat_id.to_owned(),
                    label: format!("Chat - {}", index + 1),
                }),
        );
        entries
    }

    pub fn sidebar_selected(&self) -> usize {
        self.sidebar_selected
    }

    pub fn selected_sidebar_entry(&self) -> Option<SidebarEntry> {
        self.sidebar_entries().into_iter().nth(self.sidebar_selected)
    }

    pub fn select_next_entry(&mut self) {
        let last = self.sidebar_entries().len().saturating_sub(1);
        self.sidebar_selected = (self.sidebar_selected + 1).min(last);
    }

    pub fn select_previous_entry(&mut self) {
        self.sidebar_selected = self.sidebar_selected.saturating_sub(1);
    }

    pub fn message_input(&self) -> &MessageInputState {
        &self.message_input
    }

    pub fn message_input_mut(&mut self) -> &mut MessageInputState {
        &mut self.message_input
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Drops everything tied to the signed-in user.
    pub fn reset_session(&mut self) {
        self.user = None;
        self.threads = ThreadIndex::default();
        self.active_chat_id = None;
        self.chat_history.clear();
        self.typing = TypingState::Idle;
        self.pending_reply = None;
        self.clamp_sidebar_selection();
    }

    fn clamp_sidebar_selection(&mut self) {
        let last = self.sidebar_entries().len().saturating_sub(1);
        self.sidebar_selected = self.sidebar_selected.min(last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::thread::Thread;
    use crate::test_support::sample_user;

    fn state_with_threads(ids: &[&str]) -> ShellState {
        let mut state = ShellState::default();
        state.set_user(sample_user());
        state.replace_threads(
            ids.iter()
                .map(|id| (id.to_string(), Thread::new(*id, vec![])))
                .collect(),
        );
        state
    }

    #[test]
    fn default_state_is_logged_out_with_closed_sidebar() {
        let state = ShellState::default();

        assert!(state.is_running());
        assert!(!state.is_logged_in());
        assert!(!state.sidebar_open());
        assert_eq!(state.active_pane(), ActivePane::MessageInput);
    }

    #[test]
    fn sidebar_lists_actions_then_numbered_threads() {
        let state = state_with_threads(&["x", "y"]);

        assert_eq!(
            state.sidebar_entries(),
            vec![
                SidebarEntry::NewChat,
                SidebarEntry::Logout,
                SidebarEntry::Thread {
                    chat_id: "x".to_owned(),
                    label: "Chat - 1".to_owned()
                },
                SidebarEntry::Thread {
                    chat_id: "y".to_owned(),
                    label: "Chat - 2".to_owned()
                },
            ]
        );
    }

    #[test]
    fn logout_entry_hidden_when_logged_out() {
        let state = ShellState::default();

        assert_eq!(state.sidebar_entries(), vec![SidebarEntry::NewChat]);
    }

    #[test]
    fn toggling_sidebar_moves_focus() {
        let mut state = ShellState::default();

        state.toggle_sidebar();
        assert_eq!(state.active_pane(), ActivePane::Sidebar);

        state.focus_input();
        assert_eq!(state.active_pane(), ActivePane::MessageInput);
        assert!(state.sidebar_open());

        state.toggle_sidebar();
        state.toggle_sidebar();
        assert_eq!(state.active_pane(), ActivePane::Sidebar);
    }

    #[test]
    fn login_modal_takes_focus_only_when_logged_out() {
        let mut state = ShellState::default();
        state.show_login_modal();
        assert_eq!(state.active_pane(), ActivePane::LoginModal);

        state.set_user(sample_user());
        assert!(!state.login_modal_visible());
        assert_eq!(state.active_pane(), ActivePane::MessageInput);
    }

    #[test]
    fn selection_is_clamped_to_entries() {
        let mut state = state_with_threads(&["a"]);
        state.toggle_sidebar();

        for _ in 0..10 {
            state.select_next_entry();
        }
        assert_eq!(state.sidebar_selected(), 2);

        state.reset_session();
        assert_eq!(state.sidebar_selected(), 0);
        assert_eq!(state.selected_sidebar_entry(), Some(SidebarEntry::NewChat));
    }

    #[test]
    fn take_login_request_is_one_shot() {
        let mut state = ShellState::default();
        state.request_login();

        assert!(state.take_login_request());
        assert!(!state.take_login_request());
    }

    #[test]
    fn reset_session_clears_conversation() {
        let mut state = state_with_threads(&["a"]);
        state.set_active_chat_id(Some("a".to_owned()));
        state.push_message(ChatMessage::notice("hi"));
        state.set_typing(TypingState::Awaiting);

        state.reset_session();

        assert!(!state.is_logged_in());
        assert!(state.threads().is_empty());
        assert_eq!(state.active_chat_id(), None);
        assert!(state.chat_history().is_empty());
        assert!(!state.typing().is_active());
    }
}
