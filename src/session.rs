// src/session.rs

//! Authentication session.
//!
//! The bearer token lives in a [`Session`] that is created once, shared with
//! the API client through an `Arc`, and torn down with [`Session::close`].
//! Persistence is delegated to a [`TokenStore`].

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};

use crate::error::{AppError, Result};
use crate::models::SessionConfig;

/// Trait for bearer token persistence backends.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the persisted token, if any.
    async fn load(&self) -> Result<Option<String>>;

    /// Persist a token, replacing any previous one.
    async fn save(&self, token: &str) -> Result<()>;

    /// Remove the persisted token. Removing a missing token is not an error.
    async fn clear(&self) -> Result<()>;
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.token.lock().await.clone())
    }

    async fn save(&self, token: &str) -> Result<()> {
        *self.token.lock().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.token.lock().await.take();
        Ok(())
    }
}

/// Token store backed by a single file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write atomically (write to temp, then rename).
    async fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(token.as_bytes()).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

/// The client-side authentication session.
pub struct Session {
    store: Box<dyn TokenStore>,
    token: RwLock<Option<String>>,
}

impl Session {
    /// Initialize a session, loading any persisted token from `store`.
    pub async fn init(store: impl TokenStore + 'static) -> Result<Self> {
        let token = store.load().await?;
        if token.is_some() {
            log::debug!("Restored persisted session token");
        }
        Ok(Self {
            store: Box::new(store),
            token: RwLock::new(token),
        })
    }

    /// Initialize from configuration: file-backed when a token file is set.
    pub async fn from_config(config: &SessionConfig) -> Result<Self> {
        match config.token_path() {
            Some(path) => Self::init(FileTokenStore::new(path)).await,
            None => Self::init(MemoryTokenStore::new()).await,
        }
    }

    /// Anonymous session that persists nothing.
    pub fn anonymous() -> Self {
        Self {
            store: Box::new(MemoryTokenStore::new()),
            token: RwLock::new(None),
        }
    }

    /// Current bearer token.
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Value for the `Authorization` header, if logged in.
    pub async fn authorization(&self) -> Option<String> {
        self.token().await.map(|t| format!("Bearer {t}"))
    }

    /// Store a freshly issued token.
    pub async fn login(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AppError::validation("login returned an empty access token"));
        }
        self.store.save(&token).await?;
        *self.token.write().await = Some(token);
        log::info!("Session started");
        Ok(())
    }

    /// Drop the credential from memory and from the store.
    ///
    /// The in-memory token is removed even when the store fails.
    pub async fn clear(&self) -> Result<()> {
        self.token.write().await.take();
        log::info!("Session cleared");
        self.store.clear().await
    }

    /// Clear only if the session still holds `expected`.
    ///
    /// Returns false, leaving the session alone, when the token was replaced
    /// in the meantime (e.g. by a login racing a rejected request).
    pub async fn clear_if(&self, expected: Option<&str>) -> Result<bool> {
        {
            let mut token = self.token.write().await;
            if token.as_deref() != expected {
                return Ok(false);
            }
            token.take();
        }
        log::info!("Session cleared");
        self.store.clear().await?;
        Ok(true)
    }

    /// Tear down the session. The persisted token is left in place.
    pub async fn close(self) {
        self.token.write().await.take();
        log::debug!("Session closed");
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
