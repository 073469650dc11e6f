//! Journal-backed durable store.

use crate::error::StoreError;
use crate::index::LedgerIndex;
use crate::traits::LedgerStore;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use stockledger_canonical::{IdempotencyKey, TenantId};
use stockledger_core::LedgerEvent;
use stockledger_journal::{JournalError, JournalReader, JournalWriter, ReadMode, WriteOptions};
use tracing::{debug, info, warn};

/// Durable [`LedgerStore`] over an `SLJ1` journal file.
///
/// Opening replays the whole journal into memory, rebuilding the idempotency
/// index and per-tenant sequence maxima. A journal whose records break the
/// uniqueness or density constraints fails to open. The store holds the
/// journal's exclusive file lock for its whole lifetime, so a second store on
/// the same path fails with [`StoreError::Locked`]. Appends hold the writer
/// mutex across check, write and index update, and write the frame before
/// touching the index, so a failed write leaves the store unchanged. Reads
/// take the index read lock only.
pub struct JournalStore {
    path: PathBuf,
    writer: Mutex<JournalWriter>,
    index: RwLock<LedgerIndex>,
}

impl JournalStore {
    /// Opens (or creates) the journal at `path` and takes its exclusive lock.
    ///
    /// `mode` controls how a torn final frame is handled during replay. In
    /// [`ReadMode::Permissive`] the torn bytes are cut off before the first
    /// append. `sync` makes every append fsync before returning.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode, sync: bool) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        // Lock first so replay and truncation never race another writer.
        let mut writer = match JournalWriter::open(&path, WriteOptions { sync, create: true }) {
            Ok(writer) => writer,
            Err(JournalError::Locked(_)) => return Err(StoreError::Locked(path)),
            Err(err) => return Err(err.into()),
        };

        let mut index = LedgerIndex::default();
        let mut reader = JournalReader::open(&path, mode)?;
        while let Some(event) = reader.read_record::<LedgerEvent>()? {
            index.check(&event)?;
            index.insert(event);
        }
        let valid_len = reader.position();
        if writer.len() > valid_len {
            // Only reachable in permissive mode: drop the torn frame so
            // new appends do not land behind it.
            warn!(
                path = %path.display(),
                dropped_bytes = writer.len() - valid_len,
                "truncating torn journal tail"
            );
            writer.truncate(valid_len)?;
        }

        info!(
            path = %path.display(),
            events = index.events().len(),
            "journal store opened"
        );
        Ok(Self {
            path,
            writer: Mutex::new(writer),
            index: RwLock::new(index),
        })
    }

    /// Path of the backing journal.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for JournalStore {
    fn append(&self, event: LedgerEvent) -> Result<LedgerEvent, StoreError> {
        let mut writer = self.writer.lock().map_err(|_| StoreError::Poisoned)?;
        self.index
            .read()
            .map_err(|_| StoreError::Poisoned)?
            .check(&event)?;
        let offset = writer.append_record(&event)?;
        debug!(
            tenant_id = %event.tenant_id,
            sequence = event.sequence,
            offset,
            "journal append"
        );
        self.index
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(event.clone());
        Ok(event)
    }

    fn lookup_by_idempotency_key(
        &self,
        tenant: &TenantId,
        key: &IdempotencyKey,
    ) -> Result<Option<LedgerEvent>, StoreError> {
        let index = self.index.read().map_err(|_| StoreError::Poisoned)?;
        Ok(index.lookup(tenant, key).cloned())
    }

    fn list_all(&self) -> Result<Vec<LedgerEvent>, StoreError> {
        let index = self.index.read().map_err(|_| StoreError::Poisoned)?;
        Ok(index.events().to_vec())
    }

    fn max_sequence(&self, tenant: &TenantId) -> Result<u64, StoreError> {
        let index = self.index.read().map_err(|_| StoreError::Poisoned)?;
        Ok(index.max_sequence(tenant))
    }
}
