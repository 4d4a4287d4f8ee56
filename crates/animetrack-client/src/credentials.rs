use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::error::ClientResult;

/// Default token file location.
pub fn default_token_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("animetrack")
        .join("token")
}

/// Holds the bearer token, optionally persisted to a file.
#[derive(Debug, Default)]
pub struct TokenStore {
    path: Option<PathBuf>,
    cached: RwLock<Option<String>>,
}

impl TokenStore {
    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// A store backed by `path`, loading any token already saved there.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Credentials` if the file exists but cannot be read.
    pub fn at(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();
        let token = match fs::read_to_string(&path) {
            Ok(contents) => Some(contents.trim().to_string()).filter(|t| !t.is_empty()),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), loaded = token.is_some(), "token store opened");
        Ok(Self {
            path: Some(path),
            cached: RwLock::new(token),
        })
    }

    /// The backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self) -> Option<String> {
        self.cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stores `token`, writing it to the backing file.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Credentials` if the file cannot be written.
    pub fn set(&self, token: impl Into<String>) -> ClientResult<()> {
        let token = token.into();
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &token)?;
        }
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        Ok(())
    }

    /// Forgets the token and deletes the backing file.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Credentials` if the file exists but cannot be removed.
    pub fn clear(&self) -> ClientResult<()> {
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = None;
        if let Some(path) = &self.path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}
