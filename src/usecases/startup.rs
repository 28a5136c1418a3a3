use crate::{
    domain::shell_state::ShellState,
    infra::{
        contracts::{SessionStore, StoredSession},
        error::AppError,
        session_store::FileSessionStore,
        storage_layout::StorageLayout,
    },
};

/// Opens the locked store and reads what the previous run left behind.
pub fn open_session(layout: StorageLayout) -> Result<(FileSessionStore, StoredSession), AppError> {
    let store = FileSessionStore::open(layout)?;
    let stored = store.load().map_err(AppError::Other)?;

    tracing::info!(
        logged_in = stored.user.is_some(),
        threads = stored.threads.len(),
        "session restored"
    );

    Ok((store, stored))
}

/// The stored chat id only becomes active when its thread still exists.
pub fn restore_shell_state(stored: StoredSession) -> ShellState {
    let mut state = ShellState::default();

    if let Some(user) = stored.user {
        state.set_user(user);
    }
    state.replace_threads(stored.threads);

    let restored = stored
        .current_chat_id
        .and_then(|chat_id| {
            let messages = state.threads().get(&chat_id)?.messages.clone();
            Some((chat_id, messages))
        });

    if let Some((chat_id, messages)) = restored {
        state.set_active_chat_id(Some(chat_id));
        state.set_chat_history(messages);
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{message::ChatMessage, thread::Thread},
        test_support::sample_user,
    };

    fn stored_with_thread(current: Option<&str>) -> StoredSession {
        StoredSession {
            user: Some(sample_user()),
            threads: [(
                "c1".to_owned(),
                Thread::new("Trip", vec![ChatMessage::notice("hello")]),
            )]
            .into_iter()
            .collect(),
            current_chat_id: current.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn empty_store_starts_logged_out() {
        let state = restore_shell_state(StoredSession::default());

        assert!(!state.is_logged_in());
        assert!(state.threads().is_empty());
        assert_eq!(state.active_chat_id(), None);
    }

    #[test]
    fn known_current_chat_is_reopened() {
        let state = restore_shell_state(stored_with_thread(Some("c1")));

        assert!(state.is_logged_in());
        assert_eq!(state.active_chat_id(), Some("c1"));
        assert_eq!(state.chat_history(), [ChatMessage::notice("hello")]);
    }

    #[test]
    fn dangling_current_chat_is_ignored() {
        let state = restore_shell_state(stored_with_thread(Some("gone")));

        assert_eq!(state.active_chat_id(), None);
        assert!(state.chat_history().is_empty());
        assert_eq!(state.threads().len(), 1);
    }

    #[test]
    fn open_session_reads_files_under_layout() {
        let dir = tempfile::tempdir().expect("tempdir");
        let layout = StorageLayout::under(dir.path());

        {
            let (mut store, stored) = open_session(layout.clone()).expect("open");
            assert_eq!(stored, StoredSession::default());
            store.save_user(&sample_user()).expect("save user");
        }

        let (_store, stored) = open_session(layout).expect("reopen");
        assert_eq!(stored.user, Some(sample_user()));
    }
}
