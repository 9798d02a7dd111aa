//! services/client/src/adapters/visitor_file.rs
//!
//! Durable storage for the anonymous visitor id: a single small file under
//! the user's state directory, playing the role browser local storage plays
//! for the web client of the same service.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use meeting_comic_core::ports::{PortError, PortResult, VisitorStore};

/// A visitor store backed by one plain-text file.
pub struct FileVisitorStore {
    path: PathBuf,
}

impl FileVisitorStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl VisitorStore for FileVisitorStore {
    async fn load(&self) -> PortResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let id = contents.trim();
                Ok((!id.is_empty()).then(|| id.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(e)),
        }
    }

    async fn save(&self, visitor_id: &str) -> PortResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(storage_error)?;
            }
        }
        tokio::fs::write(&self.path, visitor_id)
            .await
            .map_err(storage_error)
    }
}

fn storage_error(err: std::io::Error) -> PortError {
    PortError::Storage(err.to_string())
}
