//! File-backed session store: one small file per key under the state directory.

use std::{
    fs::{self, File, OpenOptions},
    io::ErrorKind,
    path::Path,
};

use anyhow::Result;
use fs2::FileExt;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    domain::{thread::ThreadIndex, user::UserProfile},
    infra::{
        contracts::{SessionStore, StoredSession},
        error::AppError,
        storage_layout::StorageLayout,
    },
};

const STATE_FILE_CORRUPT: &str = "STATE_FILE_CORRUPT";

/// Holds an exclusive lock on the state directory for its whole lifetime.
#[derive(Debug)]
pub struct FileSessionStore {
    layout: StorageLayout,
    lock: File,
}

impl FileSessionStore {
    pub fn open(layout: StorageLayout) -> Result<Self, AppError> {
        layout.ensure_dirs()?;

        let lock_path = layout.lock_file();
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|source| AppError::StateLock {
                path: lock_path.clone(),
                source,
            })?;

        match FileExt::try_lock_exclusive(&lock) {
            Ok(()) => {}
            Err(source) if source.kind() == fs2::lock_contended_error().kind() => {
                return Err(AppError::StateStoreBusy { path: lock_path });
            }
            Err(source) => {
                return Err(AppError::StateLock {
                    path: lock_path,
                    source,
                })
            }
        }

        Ok(Self { layout, lock })
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }
}

impl Drop for FileSessionStore {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.lock);
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<StoredSession> {
        let user = read_json::<UserProfile>(&self.layout.user_file())?;
        let threads = read_json::<ThreadIndex>(&self.layout.threads_file())?.unwrap_or_default();
        let current_chat_id = read_text(&self.layout.current_chat_file())?
            .map(|raw| raw.trim().to_owned())
            .filter(|id| !id.is_empty());

        Ok(StoredSession {
            user,
            threads,
            current_chat_id,
        })
    }

    fn save_user(&mut self, user: &UserProfile) -> Result<()> {
        write_json(&self.layout.user_file(), user)?;
        Ok(())
    }

    fn save_threads(&mut self, threads: &ThreadIndex) -> Result<()> {
        write_json(&self.layout.threads_file(), threads)?;
        Ok(())
    }

    fn save_current_chat_id(&mut self, chat_id: &str) -> Result<()> {
        write_atomic(&self.layout.current_chat_file(), chat_id.as_bytes())?;
        Ok(())
    }

    fn remove_current_chat_id(&mut self) -> Result<()> {
        remove_if_exists(&self.layout.current_chat_file())?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        for path in self.layout.session_files() {
            remove_if_exists(&path)?;
        }
        Ok(())
    }
}

/// Removes persisted session files without taking the store lock.
pub fn clear_session_files(layout: &StorageLayout) -> Result<usize, AppError> {
    let mut removed = 0;
    for path in layout.session_files() {
        if remove_if_exists(&path)? {
            removed += 1;
        }
    }
    Ok(removed)
}

fn read_text(path: &Path) -> Result<Option<String>, AppError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(source) if source.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(AppError::StateRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Unparsable content is treated as absent so a damaged file never blocks startup.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, AppError> {
    let Some(raw) = read_text(path)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(error) => {
            tracing::warn!(
                code = STATE_FILE_CORRUPT,
                path = %path.display(),
                error = %error,
                "ignoring unreadable state file"
            );
            Ok(None)
        }
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), AppError> {
    let encoded = serde_json::to_vec_pretty(value).map_err(|source| AppError::StateEncode {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomic(path, &encoded)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, bytes)
        .and_then(|()| fs::rename(&tmp_path, path))
        .map_err(|source| AppError::StateWrite {
            path: path.to_path_buf(),
            source,
        })
}

fn remove_if_exists(path: &Path) -> Result<bool, AppError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(source) if source.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(AppError::StateWrite {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{message::ChatMessage, thread::Thread},
        test_support::sample_user,
    };

    fn open_store(dir: &tempfile::TempDir) -> FileSessionStore {
        FileSessionStore::open(StorageLayout::under(dir.path())).expect("store should open")
    }

    #[test]
    fn empty_store_loads_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = open_store(&dir);

        assert_eq!(store.load().expect("load"), StoredSession::default());
    }

    #[test]
    fn persists_user_threads_and_current_chat() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut threads = ThreadIndex::default();
        threads.upsert(
            "c1",
            Thread::new("Hello", vec![ChatMessage::user("hi", "2024-05-01T10:00:00.000Z")]),
        );

        {
            let mut store = open_store(&dir);
            store.save_user(&sample_user()).expect("save user");
            store.save_threads(&threads).expect("save threads");
            store.save_current_chat_id("c1").expect("save chat id");
        }

        let loaded = open_store(&dir).load().expect("load");
        assert_eq!(loaded.user, Some(sample_user()));
        assert_eq!(loaded.threads, threads);
        assert_eq!(loaded.current_chat_id.as_deref(), Some("c1"));
    }

    #[test]
    fn remove_current_chat_id_is_idempotent() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = open_store(&dir);
        store.save_current_chat_id("c1").expect("save chat id");

        store.remove_current_chat_id().expect("first remove");
        store.remove_current_chat_id().expect("second remove");

        assert_eq!(store.load().expect("load").current_chat_id, None);
    }

    #[test]
    fn clear_removes_every_session_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = open_store(&dir);
        store.save_user(&sample_user()).expect("save user");
        store.save_current_chat_id("c1").expect("save chat id");

        store.clear().expect("clear");

        assert_eq!(store.load().expect("load"), StoredSession::default());
        assert!(store.layout().lock_file().exists());
    }

    #[test]
    fn corrupt_threads_file_loads_as_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = open_store(&dir);
        fs::write(store.layout().threads_file(), b"{not json").expect("write garbage");

        let loaded = store.load().expect("load should tolerate corruption");

        assert!(loaded.threads.is_empty());
    }

    #[test]
    fn second_store_on_same_directory_is_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let _first = open_store(&dir);

        let second = FileSessionStore::open(StorageLayout::under(dir.path()));

        assert!(matches!(second, Err(AppError::StateStoreBusy { .. })));
    }

    #[test]
    fn clear_session_files_counts_removed_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let layout = StorageLayout::under(dir.path());
        {
            let mut store = FileSessionStore::open(layout.clone()).expect("store should open");
            store.save_user(&sample_user()).expect("save user");
        }

        assert_eq!(clear_session_files(&layout).expect("clear"), 1);
        assert_eq!(clear_session_files(&layout).expect("clear again"), 0);
    }
}
