//! In-memory adapters for tests.

use anyhow::Result;

use crate::{
    domain::{thread::ThreadIndex, user::UserProfile},
    infra::{
        config::AppConfig,
        contracts::{ConfigAdapter, SessionStore, StoredSession},
    },
};

#[derive(Debug, Clone, Default)]
pub struct StubConfigAdapter;

impl ConfigAdapter for StubConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(AppConfig::default())
    }
}

/// Session store kept in memory; counts writes so tests can assert persistence.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    pub session: StoredSession,
    pub writes: usize,
    pub cleared: bool,
}

impl InMemorySessionStore {
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> Result<StoredSession> {
        Ok(self.session.clone())
    }

    fn save_user(&mut self, user: &UserProfile) -> Result<()> {
        self.session.user = Some(user.clone());
        self.writes += 1;
        Ok(())
    }

    fn save_threads(&mut self, threads: &ThreadIndex) -> Result<()> {
        self.session.threads = threads.clone();
        self.writes += 1;
        Ok(())
    }

    fn save_current_chat_id(&mut self, chat_id: &str) -> Result<()> {
        self.session.current_chat_id = Some(chat_id.to_owned());
        self.writes += 1;
        Ok(())
    }

    fn remove_current_chat_id(&mut self) -> Result<()> {
        self.session.current_chat_id = None;
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.session = StoredSession::default();
        self.cleared = true;
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_config_returns_defaults() {
        let adapter = StubConfigAdapter;
        let config = adapter.load().expect("stub config must load");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn in_memory_store_clear_resets_session() {
        let mut store = InMemorySessionStore::default();
        store
            .save_current_chat_id("c1")
            .expect("in-memory write must succeed");

        store.clear().expect("in-memory clear must succeed");

        assert!(store.cleared);
        assert_eq!(store.load().expect("load"), StoredSession::default());
    }
}
