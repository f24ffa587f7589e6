//! Application state.
//!
//! The download center and the conversion history are process-local
//! in-memory stores. Converted outputs are ephemeral temporary files with no
//! persistence, so a capped `RwLock`ed list per concern is the whole
//! "database".

use std::collections::VecDeque;
use std::sync::Arc;

use omniconvert_core::{Config, ConversionRecord, ConvertedFile};
use omniconvert_processing::ConversionService;
use omniconvert_storage::Storage;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub converter: ConversionService,
    pub spool: Arc<dyn Storage>,
    pub downloads: DownloadCenter,
    pub history: HistoryStore,
}

/// Converted files currently available for download, newest first.
#[derive(Default)]
pub struct DownloadCenter {
    entries: RwLock<Vec<ConvertedFile>>,
}

impl DownloadCenter {
    pub async fn insert(&self, file: ConvertedFile) {
        self.entries.write().await.insert(0, file);
    }

    pub async fn list(&self) -> Vec<ConvertedFile> {
        self.entries.read().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<ConvertedFile> {
        self.entries
            .read()
            .await
            .iter()
            .find(|f| f.id == id)
            .cloned()
    }

    pub async fn remove(&self, id: Uuid) -> Option<ConvertedFile> {
        let mut entries = self.entries.write().await;
        let pos = entries.iter().position(|f| f.id == id)?;
        Some(entries.remove(pos))
    }

    /// Empty the download center, returning everything it held.
    pub async fn drain(&self) -> Vec<ConvertedFile> {
        std::mem::take(&mut *self.entries.write().await)
    }

    /// Drop entries created before `cutoff` (expired by the cleanup task).
    pub async fn remove_older_than(&self, cutoff: chrono::DateTime<chrono::Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|f| f.created_at >= cutoff);
        before - entries.len()
    }
}

/// Capped conversion history, newest first.
pub struct HistoryStore {
    records: RwLock<VecDeque<ConversionRecord>>,
    limit: usize,
}

impl HistoryStore {
    pub fn new(limit: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::new()),
            limit,
        }
    }

    pub async fn record(&self, record: ConversionRecord) {
        let mut records = self.records.write().await;
        records.push_front(record);
        while records.len() > self.limit {
            records.pop_back();
        }
    }

    pub async fn list(&self) -> Vec<ConversionRecord> {
        self.records.read().await.iter().cloned().collect()
    }
}
