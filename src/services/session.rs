// src/services/session.rs

//! Process-wide session store.
//!
//! The single source of truth for the bearer token and signed-in user. It is
//! hydrated once from the persisted session file, updated only through
//! `login`, `refresh` and `logout`, and shared as `Arc<SessionStore>`.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{SessionState, UserProfile};

/// Session store, optionally backed by a JSON file.
#[derive(Debug, Default)]
pub struct SessionStore {
    path: Option<PathBuf>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the persisted session at `path`.
    ///
    /// A missing or unreadable file yields an empty session; later writes
    /// still go to `path`.
    pub async fn hydrate(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match read_state(&path).await {
            Ok(Some(state)) => {
                log::debug!("Session restored from {}", path.display());
                state
            }
            Ok(None) => SessionState::default(),
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable session file {}: {}",
                    path.display(),
                    e
                );
                SessionState::default()
            }
        };

        Self {
            path: Some(path),
            state: RwLock::new(state),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Token for the `Authorization` header, if signed in.
    pub fn bearer_token(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.snapshot().user
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }

    /// Start a session and persist it.
    pub async fn login(&self, token: impl Into<String>, user: Option<UserProfile>) -> Result<()> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AppError::validation("Token cannot be empty"));
        }

        let state = SessionState {
            token: Some(token),
            user,
        };
        self.replace(state).await?;
        log::info!("Signed in");
        Ok(())
    }

    /// Swap in a new token, keeping the user.
    pub async fn refresh(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AppError::validation("Token cannot be empty"));
        }
        if !self.is_authenticated() {
            return Err(AppError::session("Cannot refresh without an active session"));
        }

        let mut state = self.snapshot();
        state.token = Some(token);
        self.replace(state).await
    }

    /// Clear the session and remove the persisted file.
    pub async fn logout(&self) -> Result<()> {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = SessionState::default();

        if let Some(path) = &self.path {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(AppError::Io(e)),
            }
        }
        log::info!("Signed out");
        Ok(())
    }

    async fn replace(&self, state: SessionState) -> Result<()> {
        if let Some(path) = &self.path {
            write_state(path, &state).await?;
        }
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
        Ok(())
    }
}

/// Read the session file, `None` if it does not exist.
async fn read_state(path: &Path) -> Result<Option<SessionState>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::Io(e)),
    }
}

/// Write atomically (write to temp, then rename).
async fn write_state(path: &Path, state: &SessionState) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let bytes = serde_json::to_vec_pretty(state)?;
    let tmp = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(&bytes).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
