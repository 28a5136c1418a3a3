use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::infra::error::AppError;

const APP_DIR_NAME: &str = "chatline";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub config_dir: PathBuf,
    pub state_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl StorageLayout {
    /// Resolves under `$XDG_CONFIG_HOME`, falling back to the platform config dir.
    pub fn resolve() -> Result<Self, AppError> {
        let config_base = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(dirs::config_dir)
            .ok_or_else(|| AppError::StoragePathResolution {
                details: "unable to resolve config base directory (XDG_CONFIG_HOME/HOME)".into(),
            })?;

        Ok(Self::under(&config_base))
    }

    pub fn under(base: &Path) -> Self {
        let config_dir = base.join(APP_DIR_NAME);
        let state_dir = config_dir.join("state");
        let log_dir = config_dir.join("logs");

        Self {
            config_dir,
            state_dir,
            log_dir,
        }
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        for dir in [&self.config_dir, &self.state_dir, &self.log_dir] {
            fs::create_dir_all(dir).map_err(|source| AppError::StorageDirCreate {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(())
    }

    pub fn user_file(&self) -> PathBuf {
        self.state_dir.join("user.json")
    }

    pub fn threads_file(&self) -> PathBuf {
        self.state_dir.join("threads.json")
    }

    pub fn current_chat_file(&self) -> PathBuf {
        self.state_dir.join("current_chat_id")
    }

    pub fn lock_file(&self) -> PathBuf {
        self.state_dir.join("state.lock")
    }

    /// Files removed on logout. The lock file is not part of the session.
    pub fn session_files(&self) -> [PathBuf; 3] {
        [
            self.user_file(),
            self.threads_file(),
            self.current_chat_file(),
        ]
    }
}
