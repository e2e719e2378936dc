//! In-memory text store keyed by sanitized filename

use dashmap::DashMap;

/// Mapping from filename to extracted document text
///
/// Implementations must tolerate concurrent use; uploads of the same
/// filename race and the last write wins.
pub trait TextStore: Send + Sync {
    /// Store text under a filename, replacing any previous entry
    fn insert(&self, filename: String, text: String);

    /// Get the text stored under a filename
    fn get(&self, filename: &str) -> Option<String>;

    /// Every filename currently stored, in no particular order
    fn filenames(&self) -> Vec<String>;

    /// Number of stored documents
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, filename: &str) -> bool {
        self.get(filename).is_some()
    }
}

/// Process-lifetime store backed by a concurrent map
#[derive(Debug, Default)]
pub struct InMemoryTextStore {
    documents: DashMap<String, String>,
}

impl InMemoryTextStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextStore for InMemoryTextStore {
    fn insert(&self, filename: String, text: String) {
        self.documents.insert(filename, text);
    }

    fn get(&self, filename: &str) -> Option<String> {
        self.documents.get(filename).map(|entry| entry.value().clone())
    }

    fn filenames(&self) -> Vec<String> {
        self.documents
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.documents.len()
    }

    fn contains(&self, filename: &str) -> bool {
        self.documents.contains_key(filename)
    }
}
