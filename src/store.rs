// src/store.rs
//
// One pretty-printed JSON array per resource kind under the data directory.
// Reads parse the whole file; writes replace it (temp file + rename).

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::StoreError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Events,
    Fighters,
    Fights,
    /// Fight pages that were still busy when a run gave up on them.
    PendingFights,
}

impl ResourceKind {
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Events => "events",
            ResourceKind::Fighters => "fighters",
            ResourceKind::Fights => "fights",
            ResourceKind::PendingFights => "pending_fights",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.json", self.name())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, kind: ResourceKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    pub fn exists(&self, kind: ResourceKind) -> bool {
        self.path(kind).is_file()
    }

    /// Whole collection for `kind`. A missing file is an empty collection (first run);
    /// an unreadable or malformed one is an error.
    pub fn load<T: DeserializeOwned>(&self, kind: ResourceKind) -> Result<Vec<T>, StoreError> {
        let path = self.path(kind);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&path)
            .map_err(|source| StoreError::Io { path: path.clone(), source })?;
        serde_json::from_str(&text).map_err(|source| StoreError::Corrupt { path, source })
    }

    /// Replace the collection for `kind`. Returns the path written.
    pub fn save<T: Serialize>(&self, kind: ResourceKind, records: &[T]) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir)
            .map_err(|source| StoreError::Io { path: self.dir.clone(), source })?;

        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        records
            .serialize(&mut ser)
            .map_err(|source| StoreError::Encode { kind, source })?;

        let path = self.path(kind);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &buf).map_err(|source| StoreError::Io { path: tmp.clone(), source })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path: path.clone(), source })?;
        Ok(path)
    }
}
