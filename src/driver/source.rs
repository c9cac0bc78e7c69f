//! Source text lookup for the driver.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::base::FileKey;
use crate::error::{PbtsError, Result};

/// Supplies source text by file key.
pub trait SourceProvider {
    fn read(&self, file: &FileKey) -> Result<Arc<str>>;
}

impl<S: SourceProvider + ?Sized> SourceProvider for &S {
    fn read(&self, file: &FileKey) -> Result<Arc<str>> {
        (**self).read(file)
    }
}

impl<S: SourceProvider + ?Sized> SourceProvider for Arc<S> {
    fn read(&self, file: &FileKey) -> Result<Arc<str>> {
        (**self).read(file)
    }
}

/// In-memory sources keyed by path relative to the input root.
///
/// Internally locked so one set can be filled from worker threads and
/// shared between sessions.
#[derive(Debug, Default)]
pub struct SourceSet {
    files: RwLock<IndexMap<FileKey, Arc<str>>>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&self, file: impl Into<FileKey>, contents: impl Into<Arc<str>>) {
        self.files.write().insert(file.into(), contents.into());
    }

    pub fn get(&self, file: &FileKey) -> Option<Arc<str>> {
        self.files.read().get(file).cloned()
    }

    pub fn remove(&self, file: &FileKey) -> Option<Arc<str>> {
        self.files.write().shift_remove(file)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<FileKey> {
        self.files.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SourceProvider for SourceSet {
    fn read(&self, file: &FileKey) -> Result<Arc<str>> {
        self.get(file)
            .ok_or_else(|| PbtsError::SourceNotFound { path: file.clone() })
    }
}
