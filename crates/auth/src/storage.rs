//! Local persistence of the current session between runs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::session::Session;

/// Where a backend client keeps the session it was issued.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn load(&self) -> Result<Option<Session>, StorageError>;
    async fn save(&self, session: &Session) -> Result<(), StorageError>;
    /// Remove the stored session. Clearing an empty storage is not an error.
    async fn clear(&self) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// FileSessionStorage
// ---------------------------------------------------------------------------

/// Stores the session as a JSON file.
///
/// Writes go to a sibling temp file first and are renamed into place. On
/// Unix the file is readable by its owner only.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> Result<Option<Session>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn save(&self, session: &Session) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(session)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&temp, std::fs::Permissions::from_mode(0o600)).await?;
        }

        tokio::fs::rename(&temp, &self.path).await?;
        tracing::debug!(path = %self.path.display(), "Session persisted");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Stored session removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// MemorySessionStorage
// ---------------------------------------------------------------------------

/// Keeps the session in memory only; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `session` already stored.
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn load(&self) -> Result<Option<Session>, StorageError> {
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, session: &Session) -> Result<(), StorageError> {
        *self.slot.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.slot.lock().await.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::session::User;

    fn sample_session() -> Session {
        Session {
            access_token: "access".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 3600,
            expires_at: Some(1_900_000_000),
            refresh_token: "refresh".to_string(),
            user: User {
                id: uuid::Uuid::new_v4(),
                aud: "authenticated".to_string(),
                role: Some("authenticated".to_string()),
                email: Some("grace@example.com".to_string()),
                email_confirmed_at: None,
                created_at: None,
                user_metadata: serde_json::Value::Null,
                app_metadata: serde_json::Value::Null,
            },
        }
    }

    #[tokio::test]
    async fn file_storage_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("nested/session.json"));

        assert!(storage.load().await.unwrap().is_none());

        let session = sample_session();
        storage.save(&session).await.unwrap();
        assert_eq!(storage.load().await.unwrap(), Some(session));
        assert!(!dir.path().join("nested/session.json.tmp").exists());

        storage.clear().await.unwrap();
        assert!(storage.load().await.unwrap().is_none());
        // Clearing twice is fine.
        storage.clear().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn file_storage_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("session.json"));
        storage.save(&sample_session()).await.unwrap();

        let mode = std::fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not json").unwrap();

        let storage = FileSessionStorage::new(path);
        assert_matches!(storage.load().await, Err(StorageError::Corrupt(_)));
    }

    #[tokio::test]
    async fn memory_storage_round_trips() {
        let storage = MemorySessionStorage::new();
        let session = sample_session();

        storage.save(&session).await.unwrap();
        assert_eq!(storage.load().await.unwrap(), Some(session));

        storage.clear().await.unwrap();
        assert!(storage.load().await.unwrap().is_none());
    }
}
