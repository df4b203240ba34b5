//! Snapshot-based undo/redo.

use crate::store::ElementStore;

/// Default number of snapshots to keep.
pub const MAX_HISTORY: usize = 50;

/// An immutable copy of the element collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    elements: ElementStore,
}

impl Snapshot {
    pub fn elements(&self) -> &ElementStore {
        &self.elements
    }
}

/// Linear history with a cursor.
///
/// `current_index` is `None` before the first commit. Committing after an
/// undo discards the redo branch.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    snapshots: Vec<Snapshot>,
    current_index: Option<usize>,
    limit: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::with_limit(MAX_HISTORY)
    }

    /// Create a history keeping at most `limit` snapshots (at least one).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            current_index: None,
            limit: limit.max(1),
        }
    }

    /// Record a copy of `elements` as the newest state.
    pub fn commit(&mut self, elements: &ElementStore) {
        let keep = self.current_index.map_or(0, |i| i + 1);
        self.snapshots.truncate(keep);
        self.snapshots.push(Snapshot {
            elements: elements.clone(),
        });

        // Limit history size
        while self.snapshots.len() > self.limit {
            self.snapshots.remove(0);
        }
        self.current_index = Some(self.snapshots.len() - 1);
        log::debug!(
            "History commit ({} snapshots, index {})",
            self.snapshots.len(),
            self.snapshots.len() - 1
        );
    }

    /// Step back. Returns the state to restore, or `None` if there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Option<&ElementStore> {
        match self.current_index {
            Some(index) if index > 0 => {
                self.current_index = Some(index - 1);
                self.snapshots.get(index - 1).map(Snapshot::elements)
            }
            _ => None,
        }
    }

    /// Step forward. Returns the state to restore, or `None` if there is
    /// nothing to redo.
    pub fn redo(&mut self) -> Option<&ElementStore> {
        let next = self.current_index.map_or(0, |i| i + 1);
        if self.current_index.is_none() || next >= self.snapshots.len() {
            return None;
        }
        self.current_index = Some(next);
        self.snapshots.get(next).map(Snapshot::elements)
    }

    pub fn can_undo(&self) -> bool {
        self.current_index.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.current_index
            .is_some_and(|i| i + 1 < self.snapshots.len())
    }

    /// The snapshot under the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.current_index.and_then(|i| self.snapshots.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Forget all snapshots.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.current_index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementDefaults, ElementType};

    fn grow(store: &mut ElementStore) {
        store.add_element(&ElementDefaults::builtin(), ElementType::Text, None);
    }

    #[test]
    fn test_new_history_is_empty() {
        let mut history = HistoryManager::new();
        assert_eq!(history.current_index(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_undo_redo() {
        let mut store = ElementStore::new();
        let mut history = HistoryManager::new();
        history.commit(&store);
        grow(&mut store);
        history.commit(&store);

        assert!(history.can_undo());
        assert!(history.undo().unwrap().is_empty());
        assert!(!history.can_undo());
        assert!(history.undo().is_none());

        assert!(history.can_redo());
        assert_eq!(history.redo().unwrap(), &store);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_commit_after_undo_truncates() {
        let mut store = ElementStore::new();
        let mut history = HistoryManager::new();
        for _ in 0..4 {
            history.commit(&store);
            grow(&mut store);
        }
        history.undo();
        history.undo();
        history.commit(&store);

        assert_eq!(history.len(), history.current_index().unwrap() + 1);
        assert_eq!(history.len(), 3);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut store = ElementStore::new();
        let mut history = HistoryManager::with_limit(3);
        for _ in 0..5 {
            grow(&mut store);
            history.commit(&store);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.current_index(), Some(2));

        history.undo();
        let oldest = history.undo().unwrap();
        assert_eq!(oldest.len(), 3);
    }

    #[test]
    fn test_snapshots_are_independent() {
        let mut store = ElementStore::new();
        let mut history = HistoryManager::new();
        history.commit(&store);
        grow(&mut store);
        assert!(history.current().unwrap().elements().is_empty());
    }
}
