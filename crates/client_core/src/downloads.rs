use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::{fs, task::JoinHandle};
use tracing::{debug, info};

pub const DEFAULT_REVOKE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("object url {0} is not registered")]
    UnknownUrl(String),
    #[error("failed to save '{filename}': {source}")]
    Save { filename: String, source: io::Error },
}

/// Where a synthesized download ends up.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn save(&self, filename: &str, payload: &[u8]) -> io::Result<PathBuf>;
}

pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn save(&self, filename: &str, payload: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(filename);
        fs::write(&path, payload).await?;
        Ok(path)
    }
}

/// Temporary in-memory URLs for binary payloads, released explicitly.
#[derive(Default)]
pub struct ObjectUrlRegistry {
    next_id: AtomicU64,
    entries: Mutex<HashMap<String, Bytes>>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Bytes>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create(&self, payload: Bytes) -> String {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let url = format!("blob:converter/{id}");
        self.entries().insert(url.clone(), payload);
        url
    }

    pub fn resolve(&self, url: &str) -> Option<Bytes> {
        self.entries().get(url).cloned()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.entries().contains_key(url)
    }

    pub fn live_count(&self) -> usize {
        self.entries().len()
    }

    /// Returns whether the url was still registered.
    pub fn revoke(&self, url: &str) -> bool {
        self.entries().remove(url).is_some()
    }

    pub async fn trigger_download(
        &self,
        url: &str,
        filename: &str,
        sink: &dyn DownloadSink,
    ) -> Result<PathBuf, DownloadError> {
        let payload = self
            .resolve(url)
            .ok_or_else(|| DownloadError::UnknownUrl(url.to_string()))?;
        let saved = sink
            .save(filename, &payload)
            .await
            .map_err(|source| DownloadError::Save {
                filename: filename.to_string(),
                source,
            })?;
        info!(path = %saved.display(), bytes = payload.len(), "download saved");
        Ok(saved)
    }

    /// Releases the url after `delay`. Only call once the download has been triggered.
    pub fn revoke_after(self: &Arc<Self>, url: String, delay: Duration) -> JoinHandle<bool> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let revoked = registry.revoke(&url);
            debug!(url = %url, revoked, "object url released");
            revoked
        })
    }
}
