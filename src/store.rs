use crate::models::{Entry, EntryDocument};

/// In-memory entry collection for the session. Grows only at the front, by
/// import; nothing is edited or removed.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Vec<Entry>,
}

impl EntryStore {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Flattens documents in the order given, keeping each file's own order.
    pub fn from_documents(documents: Vec<EntryDocument>) -> Self {
        Self::new(documents.into_iter().flat_map(|doc| doc.entries).collect())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Places `batch` ahead of everything already stored. No deduplication.
    pub fn prepend(&mut self, batch: Vec<Entry>) {
        let existing = std::mem::take(&mut self.entries);
        self.entries = batch;
        self.entries.extend(existing);
    }
}
