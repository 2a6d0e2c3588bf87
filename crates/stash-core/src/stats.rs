//! Dashboard statistics
//!
//! Summaries computed by linear scans over the current user's collections.

use serde::Serialize;

use crate::models::{Document, Folder, Note, Todo, Website};
use crate::record_store::RecordStore;
use crate::session::Session;
use crate::storage::Substrate;

/// Todo completion summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Percentage of completed todos, 0 when there are none
    pub completion_rate: f64,
    /// Count per category, in first-seen order
    pub by_category: Vec<(String, usize)>,
}

impl TodoStats {
    pub fn from_todos(todos: &[Todo]) -> Self {
        let total = todos.len();
        let completed = todos.iter().filter(|t| t.completed).count();
        let completion_rate = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total,
            completed,
            pending: total - completed,
            completion_rate,
            by_category: count_by(todos.iter().map(|t| t.category.as_str())),
        }
    }
}

/// Document summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentStats {
    pub total: usize,
    /// Sum of file sizes in bytes
    pub total_size: u64,
    /// Count per file type, in first-seen order
    pub by_type: Vec<(String, usize)>,
}

impl DocumentStats {
    pub fn from_documents(documents: &[Document]) -> Self {
        Self {
            total: documents.len(),
            total_size: documents.iter().map(|d| d.size).sum(),
            by_type: count_by(documents.iter().map(|d| d.kind.as_str())),
        }
    }
}

/// Everything shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub todos: TodoStats,
    pub documents: DocumentStats,
    pub notes: usize,
    pub folders: usize,
    pub websites: usize,
}

impl Statistics {
    /// Gather statistics for the session's user
    pub fn collect(substrate: &dyn Substrate, session: &Session) -> Self {
        let todos = RecordStore::<Todo>::new(substrate, session).get_all();
        let documents = RecordStore::<Document>::new(substrate, session).get_all();

        Self {
            todos: TodoStats::from_todos(&todos),
            documents: DocumentStats::from_documents(&documents),
            notes: RecordStore::<Note>::new(substrate, session).count(),
            folders: RecordStore::<Folder>::new(substrate, session).count(),
            websites: RecordStore::<Website>::new(substrate, session).count(),
        }
    }
}

fn count_by<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| k.as_str() == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key.to_string(), 1)),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentDraft, NoteDraft, TodoDraft, TodoPatch};
    use crate::session::SessionManager;
    use crate::storage::MemorySubstrate;

    #[test]
    fn test_empty_stats() {
        let stats = TodoStats::from_todos(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completion_rate, 0.0);
        assert!(stats.by_category.is_empty());
    }

    #[test]
    fn test_collect() {
        let substrate = MemorySubstrate::new();
        let sessions = SessionManager::new(&substrate);
        sessions.register("alice", "a@example.com", "pw").unwrap();
        let session = sessions.login("alice", "pw").unwrap();

        let todos = RecordStore::<Todo>::new(&substrate, &session);
        let first = todos.add(TodoDraft::new("a", "work")).unwrap();
        todos.add(TodoDraft::new("b", "home")).unwrap();
        todos.add(TodoDraft::new("c", "work")).unwrap();
        todos.add(TodoDraft::new("d", "work")).unwrap();
        todos.update(&first.id, TodoPatch::completed(true)).unwrap();

        let documents = RecordStore::<Document>::new(&substrate, &session);
        documents.add(DocumentDraft::for_file("a.pdf", 100)).unwrap();
        documents.add(DocumentDraft::for_file("b.pdf", 50)).unwrap();
        documents.add(DocumentDraft::for_file("c.txt", 5)).unwrap();

        RecordStore::<Note>::new(&substrate, &session)
            .add(NoteDraft::new("n", "", "misc"))
            .unwrap();

        let stats = Statistics::collect(&substrate, &session);
        assert_eq!(stats.todos.total, 4);
        assert_eq!(stats.todos.completed, 1);
        assert_eq!(stats.todos.pending, 3);
        assert_eq!(stats.todos.completion_rate, 25.0);
        assert_eq!(
            stats.todos.by_category,
            vec![("work".to_string(), 3), ("home".to_string(), 1)]
        );
        assert_eq!(stats.documents.total, 3);
        assert_eq!(stats.documents.total_size, 155);
        assert_eq!(
            stats.documents.by_type,
            vec![("PDF".to_string(), 2), ("Text".to_string(), 1)]
        );
        assert_eq!(stats.notes, 1);
        assert_eq!(stats.folders, 0);
        assert_eq!(stats.websites, 0);
    }
}
