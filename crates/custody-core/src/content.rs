//! Content stores for uploaded document bytes.
//!
//! `FsContentStore` keeps each upload as one file under a root directory.
//! `MemoryContentStore` keeps bytes in a map and is used by tests and
//! ephemeral setups.

use std::{
    collections::HashMap,
    fs::{self, File},
    io::{self, BufReader, Cursor, Read},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::debug;
use uuid::Uuid;

use custody_contracts::error::{CustodyError, CustodyResult};

use crate::traits::ContentStore;

/// Keep only the final path component and replace anything outside
/// `[A-Za-z0-9._-]` so an untrusted name can never escape the root.
pub fn sanitize_filename(name: &str) -> String {
    let last = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

fn check_location(location: &str) -> CustodyResult<()> {
    if location.is_empty()
        || location.contains('/')
        || location.contains('\\')
        || location.contains("..")
    {
        return Err(CustodyError::InvalidInput {
            reason: format!("storage location '{}' is not a plain file name", location),
        });
    }
    Ok(())
}

// ── Filesystem store ─────────────────────────────────────────────────────────

/// Stores each document as `<unix-millis>-<random>-<sanitized name>` under
/// `root`. Files are written to a temporary file first and renamed into
/// place, so a location is never visible with partial content.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> CustodyResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| CustodyError::Io {
            reason: format!("failed to create content directory '{}': {}", root.display(), e),
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path behind a storage location.
    pub fn path_of(&self, location: &str) -> CustodyResult<PathBuf> {
        check_location(location)?;
        Ok(self.root.join(location))
    }
}

impl ContentStore for FsContentStore {
    fn put(&self, filename: &str, content: &mut dyn Read) -> CustodyResult<String> {
        let suffix = Uuid::new_v4().simple().to_string();
        let location = format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            &suffix[..8],
            sanitize_filename(filename)
        );

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        let written = io::copy(content, &mut tmp).map_err(|e| CustodyError::Io {
            reason: format!("failed to store '{}': {}", filename, e),
        })?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.root.join(&location))
            .map_err(|e| CustodyError::Io {
                reason: format!("failed to place '{}': {}", location, e.error),
            })?;

        debug!(location = %location, bytes = written, "content stored");
        Ok(location)
    }

    fn open(&self, location: &str) -> CustodyResult<Box<dyn Read + Send>> {
        let path = self.path_of(location)?;
        let file = File::open(&path).map_err(|e| CustodyError::Io {
            reason: format!("cannot open '{}': {}", location, e),
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

// ── In-memory store ──────────────────────────────────────────────────────────

/// A `ContentStore` backed by a `HashMap`. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the bytes at an existing or new location.
    pub fn overwrite(&self, location: &str, bytes: impl Into<Vec<u8>>) {
        let mut blobs = self.blobs.lock().unwrap_or_else(|e| e.into_inner());
        blobs.insert(location.to_string(), bytes.into());
    }

    /// Drop the bytes at `location`. Returns whether anything was there.
    pub fn remove(&self, location: &str) -> bool {
        let mut blobs = self.blobs.lock().unwrap_or_else(|e| e.into_inner());
        blobs.remove(location).is_some()
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().map(|b| b.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContentStore for MemoryContentStore {
    fn put(&self, filename: &str, content: &mut dyn Read) -> CustodyResult<String> {
        let mut bytes = Vec::new();
        content.read_to_end(&mut bytes)?;

        let location = format!("{}-{}", Uuid::new_v4().simple(), sanitize_filename(filename));
        self.overwrite(&location, bytes);
        Ok(location)
    }

    fn open(&self, location: &str) -> CustodyResult<Box<dyn Read + Send>> {
        let blobs = self.blobs.lock().map_err(|e| CustodyError::Io {
            reason: format!("content map lock poisoned: {}", e),
        })?;
        let bytes = blobs.get(location).cloned().ok_or_else(|| CustodyError::Io {
            reason: format!("no content at '{}'", location),
        })?;
        Ok(Box::new(Cursor::new(bytes)))
    }
}
