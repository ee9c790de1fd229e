//! Durable storage for result artifacts.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("invalid artifact key '{0}'")]
    InvalidKey(String),
    #[error("artifact already exists: {0}")]
    AlreadyExists(String),
    #[error("artifact not found: {0}")]
    NotFound(String),
    #[error("I/O error on '{location}': {source}")]
    Io {
        location: String,
        #[source]
        source: io::Error,
    },
}

/// Where a validated artifact lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactHandle {
    pub key: String,
    pub location: PathBuf,
    pub rows: usize,
}

pub trait ArtifactSink: Send + Sync {
    /// A key no earlier or concurrent invocation will have used.
    fn unique_key(&self, stem: &str, extension: &str) -> String {
        format!("{stem}_{}.{extension}", Uuid::new_v4().simple())
    }

    fn put_artifact(&self, key: &str, bytes: &[u8]) -> Result<(), SinkError>;
    fn get_artifact(&self, key: &str) -> Result<Vec<u8>, SinkError>;
    fn delete_artifact(&self, key: &str) -> Result<(), SinkError>;
    fn locate(&self, key: &str) -> PathBuf;
}

/// Artifacts stored as files directly under one directory.
#[derive(Debug, Clone)]
pub struct LocalDirSink {
    root: PathBuf,
}

impl LocalDirSink {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| SinkError::Io {
            location: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, SinkError> {
        let is_plain_name = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\'])
            && Path::new(key).file_name().is_some_and(|name| name == key);
        if is_plain_name {
            Ok(self.root.join(key))
        } else {
            Err(SinkError::InvalidKey(key.to_string()))
        }
    }
}

impl ArtifactSink for LocalDirSink {
    fn put_artifact(&self, key: &str, bytes: &[u8]) -> Result<(), SinkError> {
        let path = self.path_for(key)?;
        let io_error = |source: io::Error| SinkError::Io {
            location: path.display().to_string(),
            source,
        };

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| match source.kind() {
                io::ErrorKind::AlreadyExists => SinkError::AlreadyExists(key.to_string()),
                _ => io_error(source),
            })?;
        file.write_all(bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)
    }

    fn get_artifact(&self, key: &str) -> Result<Vec<u8>, SinkError> {
        let path = self.path_for(key)?;
        fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => SinkError::NotFound(key.to_string()),
            _ => SinkError::Io {
                location: path.display().to_string(),
                source,
            },
        })
    }

    fn delete_artifact(&self, key: &str) -> Result<(), SinkError> {
        let path = self.path_for(key)?;
        fs::remove_file(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => SinkError::NotFound(key.to_string()),
            _ => SinkError::Io {
                location: path.display().to_string(),
                source,
            },
        })
    }

    fn locate(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

/// In-process artifact store.
#[derive(Debug, Default)]
pub struct MemorySink {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl ArtifactSink for MemorySink {
    fn put_artifact(&self, key: &str, bytes: &[u8]) -> Result<(), SinkError> {
        let mut objects = self.objects.lock().unwrap_or_else(PoisonError::into_inner);
        if objects.contains_key(key) {
            return Err(SinkError::AlreadyExists(key.to_string()));
        }
        objects.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get_artifact(&self, key: &str) -> Result<Vec<u8>, SinkError> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .ok_or_else(|| SinkError::NotFound(key.to_string()))
    }

    fn delete_artifact(&self, key: &str) -> Result<(), SinkError> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| SinkError::NotFound(key.to_string()))
    }

    fn locate(&self, key: &str) -> PathBuf {
        PathBuf::from(key)
    }
}
