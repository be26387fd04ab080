//! File-backed [`LayoutStore`]: one JSON file per layout id.
//!
//! # Atomic Writes
//!
//! Writes use a temp-file-then-rename pattern so a crash mid-write leaves the
//! previous snapshot intact.
//!
//! # Key mapping
//!
//! Layout ids are percent-encoded into file names. Lowercase ASCII letters,
//! digits, `-` and `_` are kept; every other byte becomes `%XX`. The mapping
//! is injective even on case-insensitive filesystems, and no key can escape
//! the storage directory. The empty key maps to `%`.

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use dock_layout::{LayoutStore, StoreError};

const FILE_SUFFIX: &str = ".layout.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on the first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the snapshot for `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{FILE_SUFFIX}", encode_key(key)))
    }
}

fn encode_key(key: &str) -> String {
    if key.is_empty() {
        return "%".to_owned();
    }
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-' || byte == b'_' {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

fn store_error(key: &str, bytes: usize, err: &io::Error) -> StoreError {
    if err.kind() == io::ErrorKind::StorageFull {
        StoreError::QuotaExceeded {
            key: key.to_owned(),
            bytes,
        }
    } else {
        StoreError::Backend {
            key: key.to_owned(),
            message: err.to_string(),
        }
    }
}

impl LayoutStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(store_error(key, 0, &err)),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let temp = path.with_extension("json.tmp");
        std::fs::create_dir_all(&self.dir)
            .and_then(|()| std::fs::write(&temp, value))
            .and_then(|()| std::fs::rename(&temp, &path))
            .map_err(|err| store_error(key, value.len(), &err))
    }
}
