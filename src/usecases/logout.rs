use anyhow::Result;

use crate::{
    domain::shell_state::ShellState,
    infra::{
        contracts::SessionStore,
        error::AppError,
        session_store::{clear_session_files, FileSessionStore},
        storage_layout::StorageLayout,
    },
};

/// Signs out inside the running client. In-memory state is reset even when
/// the store cannot be cleared; the error is returned for logging.
pub fn logout(state: &mut ShellState, store: &mut dyn SessionStore) -> Result<()> {
    state.reset_session();
    state.focus_input();
    state.set_notice("Logged out");

    store.clear()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub files_removed: usize,
}

/// Clears the stored session from the command line. Fails while a client holds the store.
pub fn logout_and_reset(layout: StorageLayout) -> Result<LogoutOutcome, AppError> {
    let store = FileSessionStore::open(layout)?;
    let files_removed = clear_session_files(store.layout())?;

    tracing::info!(files_removed, "local session cleared");
    Ok(LogoutOutcome { files_removed })
}
