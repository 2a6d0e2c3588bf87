//! Documents filed in folders
//!
//! [`DocumentLibrary`] composes the document and folder collections of one
//! user. References between them are plain ids and are never validated:
//! a document may point at a folder that does not exist, and a folder at a
//! missing parent. Both are resolved at read time (the document simply
//! matches that folder id, the folder drops out of the tree).
//!
//! Deleting a folder cascades exactly one level: its direct subfolders go
//! with it, deeper descendants are left behind with a dangling parent, and
//! only documents filed directly in the deleted folder move to the root.

use tracing::{debug, info};

use crate::folder_tree::{build_tree, descendant_ids, FolderNode};
use crate::models::{Document, DocumentDraft, DocumentPatch, Folder, FolderDraft, FolderPatch};
use crate::record_store::RecordStore;
use crate::session::Session;
use crate::storage::{StorageError, StorageResult, Substrate};

/// Document and folder operations for one user
pub struct DocumentLibrary<'a> {
    documents: RecordStore<'a, Document>,
    folders: RecordStore<'a, Folder>,
}

impl<'a> DocumentLibrary<'a> {
    pub fn new(substrate: &'a dyn Substrate, session: &'a Session) -> Self {
        Self {
            documents: RecordStore::new(substrate, session),
            folders: RecordStore::new(substrate, session),
        }
    }

    /// The underlying document collection
    pub fn documents(&self) -> &RecordStore<'a, Document> {
        &self.documents
    }

    /// The underlying folder collection
    pub fn folders(&self) -> &RecordStore<'a, Folder> {
        &self.folders
    }

    // ==================== Documents ====================

    /// Add a document, filed under `draft.folder_id` (root when `None`)
    pub fn add_document(&self, draft: DocumentDraft) -> StorageResult<Document> {
        self.documents.add(draft)
    }

    /// Documents whose folder id equals `folder_id` exactly
    ///
    /// `None` selects root-level documents only.
    pub fn documents_in(&self, folder_id: Option<&str>) -> Vec<Document> {
        self.documents
            .get_all()
            .into_iter()
            .filter(|doc| doc.folder_id.as_deref() == folder_id)
            .collect()
    }

    /// Re-file a document; the target folder is not checked for existence
    pub fn move_document(&self, document_id: &str, folder_id: Option<String>) -> StorageResult<bool> {
        let moved = self
            .documents
            .update(document_id, DocumentPatch::folder(folder_id))?;
        Ok(moved.is_some())
    }

    /// Delete a document
    pub fn delete_document(&self, document_id: &str) -> StorageResult<bool> {
        self.documents.delete(document_id)
    }

    /// Documents whose name contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<Document> {
        let needle = query.to_lowercase();
        self.documents
            .get_all()
            .into_iter()
            .filter(|doc| doc.name.to_lowercase().contains(&needle))
            .collect()
    }

    // ==================== Folders ====================

    /// Create a folder under `parent_id` (root when `None`)
    pub fn create_folder(&self, name: &str, parent_id: Option<String>) -> StorageResult<Folder> {
        self.folders.add(FolderDraft::new(name, parent_id))
    }

    /// Rename a folder; `None` if it does not exist
    pub fn rename_folder(&self, folder_id: &str, name: &str) -> StorageResult<Option<Folder>> {
        self.folders.update(
            folder_id,
            FolderPatch {
                name: Some(name.to_string()),
            },
        )
    }

    /// The user's folders as a forest
    pub fn folder_tree(&self) -> Vec<FolderNode> {
        build_tree(&self.folders.get_all())
    }

    /// Give a folder a new parent (root when `None`)
    ///
    /// Returns `None` if the folder does not exist. Fails with
    /// `FolderCycle` if the new parent is the folder itself or lies below
    /// it. A parent id naming no folder is accepted.
    pub fn move_folder(
        &self,
        folder_id: &str,
        parent_id: Option<String>,
    ) -> StorageResult<Option<Folder>> {
        let mut folders = self.folders.get_all();
        let Some(index) = folders.iter().position(|f| f.id == folder_id) else {
            return Ok(None);
        };

        if let Some(parent) = parent_id.as_deref() {
            if parent == folder_id || descendant_ids(&folders, folder_id).contains(parent) {
                return Err(StorageError::FolderCycle {
                    folder_id: folder_id.to_string(),
                    parent_id: parent.to_string(),
                });
            }
        }

        folders[index].parent_id = parent_id;
        let moved = folders[index].clone();

        self.folders.save_all(&folders)?;
        debug!(folder_id, parent_id = ?moved.parent_id, "moved folder");
        Ok(Some(moved))
    }

    /// Delete a folder and its direct subfolders
    ///
    /// Returns `false`, changing nothing, if no folder has `folder_id`.
    /// Otherwise the folder and every folder whose parent is `folder_id`
    /// are removed in one rewrite, then every document filed directly in
    /// `folder_id` is moved to the root. Grandchildren keep their now
    /// dangling parent id and are not reattached.
    pub fn delete_folder(&self, folder_id: &str) -> StorageResult<bool> {
        let folders = self.folders.get_all();
        if !folders.iter().any(|f| f.id == folder_id) {
            return Ok(false);
        }

        let remaining: Vec<Folder> = folders
            .into_iter()
            .filter(|f| f.id != folder_id && f.parent_id.as_deref() != Some(folder_id))
            .collect();
        self.folders.save_all(&remaining)?;

        let mut documents = self.documents.get_all();
        let mut released = 0usize;
        for doc in documents
            .iter_mut()
            .filter(|doc| doc.folder_id.as_deref() == Some(folder_id))
        {
            doc.folder_id = None;
            released += 1;
        }
        if released > 0 {
            self.documents.save_all(&documents)?;
        }

        info!(folder_id, released, "deleted folder");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionManager;
    use crate::storage::MemorySubstrate;

    fn login(substrate: &MemorySubstrate) -> Session {
        let sessions = SessionManager::new(substrate);
        sessions.register("alice", "a@example.com", "pw").unwrap();
        sessions.login("alice", "pw").unwrap()
    }

    /// Folders 1 <- 2 <- 3, plus 4 pointing at a missing parent
    fn seed_tree(library: &DocumentLibrary) -> (Folder, Folder, Folder, Folder) {
        let f1 = library.create_folder("one", None).unwrap();
        let f2 = library.create_folder("two", Some(f1.id.clone())).unwrap();
        let f3 = library.create_folder("three", Some(f2.id.clone())).unwrap();
        let f4 = library
            .create_folder("four", Some("99".to_string()))
            .unwrap();
        (f1, f2, f3, f4)
    }

    #[test]
    fn test_documents_in_root_and_folder() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate);
        let library = DocumentLibrary::new(&substrate, &session);
        let folder = library.create_folder("Work", None).unwrap();

        let root_doc = library
            .add_document(DocumentDraft::for_file("a.pdf", 10))
            .unwrap();
        let filed = library
            .add_document(DocumentDraft::for_file("b.pdf", 10).in_folder(Some(folder.id.clone())))
            .unwrap();

        assert_eq!(library.documents_in(None), vec![root_doc]);
        assert_eq!(library.documents_in(Some(&folder.id)), vec![filed]);
    }

    #[test]
    fn test_move_document_to_unknown_folder() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate);
        let library = DocumentLibrary::new(&substrate, &session);
        let doc = library
            .add_document(DocumentDraft::for_file("a.txt", 3))
            .unwrap();

        assert!(library
            .move_document(&doc.id, Some("ghost".to_string()))
            .unwrap());

        let in_ghost = library.documents_in(Some("ghost"));
        assert_eq!(in_ghost.len(), 1);
        assert_eq!(in_ghost[0].id, doc.id);
        assert!(library.documents_in(None).is_empty());

        // And back to the root
        assert!(library.move_document(&doc.id, None).unwrap());
        assert_eq!(library.documents_in(None).len(), 1);
    }

    #[test]
    fn test_move_missing_document() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate);
        let library = DocumentLibrary::new(&substrate, &session);

        assert!(!library.move_document("nope", None).unwrap());
    }

    #[test]
    fn test_delete_folder_is_shallow() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate);
        let library = DocumentLibrary::new(&substrate, &session);
        let (f1, f2, f3, f4) = seed_tree(&library);

        assert!(library.delete_folder(&f2.id).unwrap());

        let remaining = library.folders().get_all();
        let ids: Vec<&str> = remaining.iter().map(|f| f.id.as_str()).collect();
        // 3 was a direct child of 2: removed with it
        assert_eq!(ids, vec![f1.id.as_str(), f4.id.as_str()]);
        assert!(library.folders().get(&f3.id).is_none());
    }

    #[test]
    fn test_delete_folder_leaves_grandchildren_dangling() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate);
        let library = DocumentLibrary::new(&substrate, &session);
        let (f1, f2, f3, _f4) = seed_tree(&library);

        // Deleting 1 removes 1 and its child 2; grandchild 3 stays
        assert!(library.delete_folder(&f1.id).unwrap());

        let orphan = library.folders().get(&f3.id).unwrap();
        assert_eq!(orphan.parent_id.as_deref(), Some(f2.id.as_str()));
        assert!(library.folders().get(&f2.id).is_none());

        // Not reattached anywhere in the tree
        let forest = library.folder_tree();
        assert!(forest.iter().all(|n| n.find(&f3.id).is_none()));
    }

    #[test]
    fn test_delete_folder_releases_documents() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate);
        let library = DocumentLibrary::new(&substrate, &session);
        let (_f1, f2, f3, _f4) = seed_tree(&library);

        let in_f2 = library
            .add_document(DocumentDraft::for_file("a.pdf", 1).in_folder(Some(f2.id.clone())))
            .unwrap();
        let in_f3 = library
            .add_document(DocumentDraft::for_file("b.pdf", 1).in_folder(Some(f3.id.clone())))
            .unwrap();

        assert!(library.delete_folder(&f2.id).unwrap());

        let released = library.documents().get(&in_f2.id).unwrap();
        assert!(released.folder_id.is_none());

        // Documents in the removed subfolder keep their dangling folder id
        let stranded = library.documents().get(&in_f3.id).unwrap();
        assert_eq!(stranded.folder_id.as_deref(), Some(f3.id.as_str()));
    }

    #[test]
    fn test_delete_missing_folder() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate);
        let library = DocumentLibrary::new(&substrate, &session);
        let (_f1, _f2, _f3, f4) = seed_tree(&library);

        // "99" only exists as f4's dangling parent
        assert!(!library.delete_folder("99").unwrap());
        assert!(library.folders().get(&f4.id).is_some());
        assert_eq!(library.folders().count(), 4);
    }

    #[test]
    fn test_folder_tree_matches_flat_list() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate);
        let library = DocumentLibrary::new(&substrate, &session);
        let (f1, f2, f3, f4) = seed_tree(&library);

        let forest = library.folder_tree();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].folder.id, f1.id);
        assert_eq!(forest[0].children[0].folder.id, f2.id);
        assert_eq!(forest[0].children[0].children[0].folder.id, f3.id);
        assert!(forest[0].find(&f4.id).is_none());
    }

    #[test]
    fn test_move_folder_rejects_cycles() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate);
        let library = DocumentLibrary::new(&substrate, &session);
        let (f1, _f2, f3, _f4) = seed_tree(&library);

        let err = library
            .move_folder(&f1.id, Some(f3.id.clone()))
            .unwrap_err();
        assert!(matches!(err, StorageError::FolderCycle { .. }));

        let err = library
            .move_folder(&f1.id, Some(f1.id.clone()))
            .unwrap_err();
        assert!(matches!(err, StorageError::FolderCycle { .. }));

        // Unchanged
        assert!(library.folders().get(&f1.id).unwrap().parent_id.is_none());
    }

    #[test]
    fn test_move_folder() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate);
        let library = DocumentLibrary::new(&substrate, &session);
        let (f1, _f2, f3, f4) = seed_tree(&library);

        // Up to the root
        let moved = library.move_folder(&f3.id, None).unwrap().unwrap();
        assert!(moved.parent_id.is_none());
        assert_eq!(library.folder_tree().len(), 2);

        // Dangling parent accepted; the folder leaves the tree
        let moved = library
            .move_folder(&f3.id, Some("ghost".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(moved.parent_id.as_deref(), Some("ghost"));

        // Rescue the orphan
        library.move_folder(&f4.id, Some(f1.id.clone())).unwrap();
        assert_eq!(library.folder_tree()[0].children.len(), 2);

        assert!(library.move_folder("nope", None).unwrap().is_none());
    }

    #[test]
    fn test_move_missing_folder_under_itself_is_not_found() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate);
        let library = DocumentLibrary::new(&substrate, &session);
        let (f1, ..) = seed_tree(&library);
        let before = library.folders().get_all();

        let moved = library
            .move_folder("missing", Some("missing".to_string()))
            .unwrap();
        assert!(moved.is_none());

        let moved = library
            .move_folder("missing", Some(f1.id.clone()))
            .unwrap();
        assert!(moved.is_none());
        assert_eq!(library.folders().get_all(), before);
    }

    #[test]
    fn test_rename_folder() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate);
        let library = DocumentLibrary::new(&substrate, &session);
        let folder = library.create_folder("Old", None).unwrap();

        let renamed = library.rename_folder(&folder.id, "New").unwrap().unwrap();
        assert_eq!(renamed.name, "New");
        assert_eq!(renamed.parent_id, folder.parent_id);
        assert!(library.rename_folder("nope", "x").unwrap().is_none());
    }

    #[test]
    fn test_search() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate);
        let library = DocumentLibrary::new(&substrate, &session);
        library
            .add_document(DocumentDraft::for_file("Quarterly Report.pdf", 1))
            .unwrap();
        library
            .add_document(DocumentDraft::for_file("notes.txt", 1))
            .unwrap();

        assert_eq!(library.search("report").len(), 1);
        assert_eq!(library.search("").len(), 2);
        assert!(library.search("budget").is_empty());
    }

    #[test]
    fn test_anonymous_cannot_create_folder() {
        let substrate = MemorySubstrate::new();
        let session = Session::Anonymous;
        let library = DocumentLibrary::new(&substrate, &session);

        assert!(matches!(
            library.create_folder("x", None),
            Err(StorageError::Unauthenticated)
        ));
    }
}
