//! Credential persistence
//!
//! The access/refresh pair survives process restarts. The session layer is the
//! only writer; the HTTP client only ever reads, through [`CredentialSource`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mams_types::CredentialPair;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Credential store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("credential file I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode credentials: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Read access to persisted credentials.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Load the stored pair, if any.
    async fn load(&self) -> Result<Option<CredentialPair>, StoreError>;

    /// Current access token, if any.
    async fn access_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.load().await?.map(|pair| pair.access_token))
    }
}

/// Read/write access to persisted credentials.
#[async_trait]
pub trait CredentialStore: CredentialSource {
    /// Replace the stored pair.
    async fn save(&self, pair: &CredentialPair) -> Result<(), StoreError>;

    /// Remove any stored pair. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<(), StoreError>;
}

/// In-process credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    pair: RwLock<Option<CredentialPair>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `pair`.
    pub fn with_pair(pair: CredentialPair) -> Self {
        Self {
            pair: RwLock::new(Some(pair)),
        }
    }
}

#[async_trait]
impl CredentialSource for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<CredentialPair>, StoreError> {
        Ok(self.pair.read().await.clone())
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn save(&self, pair: &CredentialPair) -> Result<(), StoreError> {
        *self.pair.write().await = Some(pair.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.pair.write().await = None;
        Ok(())
    }
}

/// JSON file holding `{"accessToken": ..., "refreshToken": ...}`.
///
/// Writes go to a sibling temp file and are renamed into place. On unix the
/// file is owner read/write only.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store backed by `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Sibling of the backing file, unique per save
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        self.path.with_file_name(name)
    }

    async fn write_temp(&self, tmp: &Path, body: &[u8]) -> std::io::Result<()> {
        let mut file = create_private(tmp).await?;
        file.write_all(body).await?;
        file.sync_all().await
    }
}

/// Create a new file readable by the owner only from the start.
async fn create_private(path: &Path) -> std::io::Result<tokio::fs::File> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);
    options.open(path).await
}

#[async_trait]
impl CredentialSource for FileCredentialStore {
    async fn load(&self) -> Result<Option<CredentialPair>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored credentials");
                return Ok(None);
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to read credentials");
                return Err(self.io_error(e));
            }
        };

        match serde_json::from_slice::<CredentialPair>(&bytes) {
            Ok(pair) => Ok(Some(pair)),
            Err(e) => {
                // Unreadable contents are treated like no credentials at all
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt credential file");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn save(&self, pair: &CredentialPair) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let body = serde_json::to_vec_pretty(pair)?;
        let tmp = self.temp_path();
        if let Err(e) = self.write_temp(&tmp, &body).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(self.io_error(e));
        }

        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            error!(path = %self.path.display(), error = %e, "failed to persist credentials");
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(self.io_error(e));
        }

        debug!(path = %self.path.display(), "credentials saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "credentials cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to clear credentials");
                Err(self.io_error(e))
            }
        }
    }
}
