//! Durable, file-backed implementation of `AuditLedger`.
//!
//! On-disk format is JSON Lines: one `LedgerEntry` object per line, in
//! index order. Appends go to the end of the file and are synced before
//! they are acknowledged. If a write fails part-way, the file is truncated
//! back to its previous length so no partial entry survives.
//!
//! `read_all` and `verify_chain` always re-read the file, so edits made to
//! the persisted ledger behind the engine's back are detected.

use std::{
    fs::{self, File, OpenOptions},
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use serde_json::Value;
use tracing::{debug, info, warn};

use custody_contracts::{
    error::{CustodyError, CustodyResult},
    ledger::{ChainReport, EventType, LedgerEntry},
};
use custody_core::traits::AuditLedger;

use crate::chain::{next_entry, verify_chain};

/// Writer state, guarded by the ledger's single mutex.
struct Tail {
    file: File,
    /// Length of the file in bytes after the last acknowledged append.
    len: u64,
    next_index: u64,
    last_hash: String,
}

/// Result of scanning the ledger file.
struct Scan {
    entries: Vec<LedgerEntry>,
    /// Position and parse error of the first line that is not an entry.
    malformed: Option<(u64, String)>,
}

/// A JSON Lines ledger file with a single writer.
pub struct FileLedger {
    path: PathBuf,
    tail: Mutex<Tail>,
}

impl FileLedger {
    /// Open (or create) the ledger at `path` and recover its tail.
    ///
    /// # Errors
    ///
    /// `ChainCorruption` if a line cannot be parsed as an entry: appending
    /// after unreadable data would hide it, so the operator has to decide.
    pub fn open(path: impl AsRef<Path>) -> CustodyResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| persist_err("create ledger directory", &path, e))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .map_err(|e| persist_err("open ledger", &path, e))?;
        let len = file
            .metadata()
            .map_err(|e| persist_err("stat ledger", &path, e))?
            .len();

        let scan = scan(&path)?;
        if let Some((index, reason)) = scan.malformed {
            return Err(CustodyError::ChainCorruption { index, reason });
        }

        let (next_index, last_hash) = match scan.entries.last() {
            Some(last) => (last.index + 1, last.entry_hash.clone()),
            None => (0, LedgerEntry::GENESIS_HASH.to_string()),
        };

        info!(path = %path.display(), entries = next_index, "audit ledger opened");

        Ok(Self {
            path,
            tail: Mutex::new(Tail { file, len, next_index, last_hash }),
        })
    }

    /// Open the ledger and refuse it unless the whole chain verifies.
    pub fn open_verified(path: impl AsRef<Path>) -> CustodyResult<Self> {
        let ledger = Self::open(path)?;
        ledger.verify_chain()?.into_result()?;
        Ok(ledger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> CustodyResult<MutexGuard<'_, Tail>> {
        self.tail.lock().map_err(|e| CustodyError::PersistenceFailed {
            reason: format!("ledger writer lock poisoned: {}", e),
        })
    }
}

impl AuditLedger for FileLedger {
    fn append(&self, event_type: EventType, payload: Value) -> CustodyResult<LedgerEntry> {
        let mut tail = self.lock()?;

        let entry = next_entry(tail.next_index, &tail.last_hash, event_type, payload);
        let mut line = serde_json::to_string(&entry).map_err(|e| CustodyError::PersistenceFailed {
            reason: format!("failed to encode ledger entry {}: {}", entry.index, e),
        })?;
        line.push('\n');

        if let Err(e) = write_synced(&mut tail.file, line.as_bytes()) {
            let keep = tail.len;
            if let Err(truncate_err) = tail.file.set_len(keep) {
                warn!(
                    path = %self.path.display(),
                    error = %truncate_err,
                    "failed to roll back partial ledger write"
                );
            }
            return Err(persist_err("append to ledger", &self.path, e));
        }

        tail.len += line.len() as u64;
        tail.next_index += 1;
        tail.last_hash = entry.entry_hash.clone();

        debug!(index = entry.index, event_type = %event_type, "ledger entry persisted");
        Ok(entry)
    }

    fn verify_chain(&self) -> CustodyResult<ChainReport> {
        let _tail = self.lock()?;
        let scan = scan(&self.path)?;

        let report = verify_chain(&scan.entries);
        let report = match scan.malformed {
            // Everything before the unreadable line checks out, so the break
            // is the unreadable line itself.
            Some((index, _)) if report.valid => ChainReport::broken_at(index),
            _ => report,
        };

        if let Some(index) = report.broken_at_index {
            warn!(path = %self.path.display(), broken_at_index = index, "audit ledger chain broken");
        }
        Ok(report)
    }

    fn read_all(&self) -> CustodyResult<Vec<LedgerEntry>> {
        let _tail = self.lock()?;
        let scan = scan(&self.path)?;

        match scan.malformed {
            Some((index, reason)) => Err(CustodyError::ChainCorruption { index, reason }),
            None => Ok(scan.entries),
        }
    }
}

/// Parse the ledger file up to the first line that is not an entry.
fn scan(path: &Path) -> CustodyResult<Scan> {
    let file = File::open(path).map_err(|e| persist_err("read ledger", path, e))?;
    let mut entries = Vec::new();

    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| persist_err("read ledger", path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<LedgerEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                let position = entries.len() as u64;
                return Ok(Scan {
                    entries,
                    malformed: Some((position, format!("unreadable ledger line: {}", e))),
                });
            }
        }
    }

    Ok(Scan { entries, malformed: None })
}

fn write_synced(file: &mut File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes)?;
    file.flush()?;
    file.sync_data()
}

fn persist_err(action: &str, path: &Path, e: std::io::Error) -> CustodyError {
    CustodyError::PersistenceFailed {
        reason: format!("failed to {} '{}': {}", action, path.display(), e),
    }
}
