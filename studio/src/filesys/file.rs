//! JSON files on disk

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::errors::BuilderError;

/// A file addressed by path
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
}

impl File {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    pub async fn read_string(&self) -> Result<String, BuilderError> {
        Ok(fs::read_to_string(&self.path).await?)
    }

    /// Read and deserialize the file
    pub async fn read_json<T: DeserializeOwned>(&self) -> Result<T, BuilderError> {
        let text = self.read_string().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Serialize `value` as pretty JSON and replace the file with it
    pub async fn write_json<T: Serialize>(&self, value: &T) -> Result<(), BuilderError> {
        let text = serde_json::to_string_pretty(value)?;
        self.replace(text.as_bytes(), Access::Default).await
    }

    /// Like [`File::write_json`], but the file is readable by its owner only
    /// (0600 on Unix) from the moment it is created
    pub async fn write_json_private<T: Serialize>(&self, value: &T) -> Result<(), BuilderError> {
        let text = serde_json::to_string_pretty(value)?;
        self.replace(text.as_bytes(), Access::OwnerOnly).await
    }

    /// Write through a sibling `.tmp` file and rename it over the target,
    /// creating missing parent directories first
    async fn replace(&self, contents: &[u8], access: Access) -> Result<(), BuilderError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let staging = self.path.with_extension("tmp");
        if fs::try_exists(&staging).await.unwrap_or(false) {
            fs::remove_file(&staging).await?;
        }
        {
            let mut options = fs::OpenOptions::new();
            options.write(true).create_new(true);
            #[cfg(unix)]
            {
                if access == Access::OwnerOnly {
                    options.mode(0o600);
                }
            }
            #[cfg(not(unix))]
            let _ = access;
            let mut out = options.open(&staging).await?;
            out.write_all(contents).await?;
            out.sync_all().await?;
        }
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Default,
    OwnerOnly,
}
