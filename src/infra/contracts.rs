use anyhow::Result;

use crate::{
    domain::{thread::ThreadIndex, user::UserProfile},
    infra::config::AppConfig,
};

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig>;
}

/// Everything persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoredSession {
    pub user: Option<UserProfile>,
    pub threads: ThreadIndex,
    pub current_chat_id: Option<String>,
}

/// Durable key-value storage for the signed-in user and their threads.
pub trait SessionStore {
    fn load(&self) -> Result<StoredSession>;
    fn save_user(&mut self, user: &UserProfile) -> Result<()>;
    fn save_threads(&mut self, threads: &ThreadIndex) -> Result<()>;
    fn save_current_chat_id(&mut self, chat_id: &str) -> Result<()>;
    fn remove_current_chat_id(&mut self) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

pub trait ExternalOpener {
    fn open(&self, target: &str) -> Result<()>;
}
