//! Per-run completion state of each file.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::base::FileKey;

/// State of a file that has been requested. Files never requested are
/// absent from the cache (`NotStarted`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Compilation started and has not finished; reached again only through
    /// an import cycle.
    InProgress,
    /// Final generated text.
    Done(Arc<str>),
}

/// What a compile request yields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileOutput {
    Complete(Arc<str>),
    /// The file is further up the current import chain. Its output is not
    /// available yet.
    Pending,
}

impl FileOutput {
    pub fn text(&self) -> Option<&str> {
        match self {
            FileOutput::Complete(text) => Some(text),
            FileOutput::Pending => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FileOutput::Pending)
    }
}

#[derive(Debug, Default)]
pub struct CompletionCache {
    entries: FxHashMap<FileKey, Completion>,
}

impl CompletionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file: &FileKey) -> Option<&Completion> {
        self.entries.get(file)
    }

    pub fn mark_in_progress(&mut self, file: FileKey) {
        self.entries.insert(file, Completion::InProgress);
    }

    pub fn finish(&mut self, file: FileKey, text: Arc<str>) {
        self.entries.insert(file, Completion::Done(text));
    }

    pub fn is_done(&self, file: &FileKey) -> bool {
        matches!(self.entries.get(file), Some(Completion::Done(_)))
    }

    /// Number of files requested so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
