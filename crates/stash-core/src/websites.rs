//! Bookmarked websites
//!
//! Websites are displayed by `position`. Reordering rewrites every
//! position so they form a dense `0..n` sequence afterwards.

use std::collections::HashSet;

use tracing::debug;

use crate::models::{Website, WebsiteDraft, WebsitePatch};
use crate::namespace::Namespace;
use crate::record_store::{Record, RecordStore};
use crate::session::Session;
use crate::storage::{read_json, StorageResult, Substrate};

/// Position-ordered access to one user's websites
pub struct WebsiteDirectory<'a> {
    substrate: &'a dyn Substrate,
    websites: RecordStore<'a, Website>,
}

impl<'a> WebsiteDirectory<'a> {
    pub fn new(substrate: &'a dyn Substrate, session: &'a Session) -> Self {
        Self {
            substrate,
            websites: RecordStore::new(substrate, session),
        }
    }

    /// The underlying collection
    pub fn store(&self) -> &RecordStore<'a, Website> {
        &self.websites
    }

    /// All websites sorted by position; ties keep insertion order
    pub fn list(&self) -> Vec<Website> {
        sorted(self.websites.get_all())
    }

    /// Websites of an arbitrary user, sorted by position
    pub fn for_user(&self, user_id: &str) -> Vec<Website> {
        let key = Namespace::for_user(user_id).resolve(Website::COLLECTION);
        sorted(read_json(self.substrate, &key).unwrap_or_default())
    }

    /// Add a website, at the end of the list unless the draft says otherwise
    pub fn add(&self, draft: WebsiteDraft) -> StorageResult<Website> {
        self.websites.add(draft)
    }

    pub fn update(&self, id: &str, patch: WebsitePatch) -> StorageResult<Option<Website>> {
        self.websites.update(id, patch)
    }

    pub fn delete(&self, id: &str) -> StorageResult<bool> {
        self.websites.delete(id)
    }

    /// Apply a new display order
    ///
    /// Websites named in `ordered_ids` come first, in that order; the rest
    /// follow in their previous order. Unknown ids are ignored.
    pub fn reorder(&self, ordered_ids: &[String]) -> StorageResult<Vec<Website>> {
        let mut current = self.list();
        let mut seen = HashSet::new();
        let mut reordered = Vec::with_capacity(current.len());

        for id in ordered_ids {
            if !seen.insert(id.as_str()) {
                continue;
            }
            if let Some(pos) = current.iter().position(|w| &w.id == id) {
                reordered.push(current.remove(pos));
            }
        }
        reordered.extend(current);

        self.renumber_and_save(reordered)
    }

    /// Move one website to `index` (clamped to the end), shifting the others
    ///
    /// Returns `false` if there is no such website.
    pub fn move_to(&self, id: &str, index: usize) -> StorageResult<bool> {
        let mut websites = self.list();
        let Some(from) = websites.iter().position(|w| w.id == id) else {
            return Ok(false);
        };

        let website = websites.remove(from);
        let to = index.min(websites.len());
        websites.insert(to, website);

        self.renumber_and_save(websites)?;
        Ok(true)
    }

    fn renumber_and_save(&self, mut websites: Vec<Website>) -> StorageResult<Vec<Website>> {
        for (position, website) in websites.iter_mut().enumerate() {
            website.position = u32::try_from(position).unwrap_or(u32::MAX);
        }
        self.websites.save_all(&websites)?;
        debug!(count = websites.len(), "renumbered websites");
        Ok(websites)
    }
}

fn sorted(mut websites: Vec<Website>) -> Vec<Website> {
    websites.sort_by_key(|w| w.position);
    websites
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionManager;
    use crate::storage::MemorySubstrate;

    fn login(substrate: &MemorySubstrate, name: &str) -> Session {
        let sessions = SessionManager::new(substrate);
        sessions.register(name, "x@example.com", "pw").unwrap();
        sessions.login(name, "pw").unwrap()
    }

    fn seed(directory: &WebsiteDirectory) -> Vec<Website> {
        ["a", "b", "c", "d"]
            .iter()
            .map(|name| {
                directory
                    .add(WebsiteDraft::new(*name, format!("https://{}.example", name), "misc"))
                    .unwrap()
            })
            .collect()
    }

    fn names(websites: &[Website]) -> Vec<&str> {
        websites.iter().map(|w| w.name.as_str()).collect()
    }

    fn positions(websites: &[Website]) -> Vec<u32> {
        websites.iter().map(|w| w.position).collect()
    }

    #[test]
    fn test_add_appends() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate, "alice");
        let directory = WebsiteDirectory::new(&substrate, &session);

        let sites = seed(&directory);
        assert_eq!(positions(&sites), vec![0, 1, 2, 3]);
        assert_eq!(names(&directory.list()), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_reorder_is_dense() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate, "alice");
        let directory = WebsiteDirectory::new(&substrate, &session);
        let sites = seed(&directory);

        // Leave a gap first
        directory.delete(&sites[1].id).unwrap();
        assert_eq!(positions(&directory.list()), vec![0, 2, 3]);

        let result = directory
            .reorder(&[sites[3].id.clone(), "unknown".to_string(), sites[0].id.clone()])
            .unwrap();
        assert_eq!(names(&result), vec!["d", "a", "c"]);
        assert_eq!(positions(&result), vec![0, 1, 2]);
        assert_eq!(directory.list(), result);
    }

    #[test]
    fn test_move_to() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate, "alice");
        let directory = WebsiteDirectory::new(&substrate, &session);
        let sites = seed(&directory);

        assert!(directory.move_to(&sites[0].id, 2).unwrap());
        assert_eq!(names(&directory.list()), vec!["b", "c", "a", "d"]);

        // Clamped to the end
        assert!(directory.move_to(&sites[1].id, 100).unwrap());
        let list = directory.list();
        assert_eq!(names(&list), vec!["c", "a", "d", "b"]);
        assert_eq!(positions(&list), vec![0, 1, 2, 3]);

        assert!(!directory.move_to("missing", 0).unwrap());
    }

    #[test]
    fn test_for_user_reads_other_namespace() {
        let substrate = MemorySubstrate::new();
        let alice = login(&substrate, "alice");
        let bob = login(&substrate, "bob");

        let alice_dir = WebsiteDirectory::new(&substrate, &alice);
        seed(&alice_dir);

        let bob_dir = WebsiteDirectory::new(&substrate, &bob);
        assert!(bob_dir.list().is_empty());
        assert_eq!(bob_dir.for_user(alice.user_id().unwrap()).len(), 4);
    }

    #[test]
    fn test_update_position_directly() {
        let substrate = MemorySubstrate::new();
        let session = login(&substrate, "alice");
        let directory = WebsiteDirectory::new(&substrate, &session);
        let sites = seed(&directory);

        directory
            .update(&sites[0].id, WebsitePatch::position(10))
            .unwrap();
        assert_eq!(names(&directory.list()), vec!["b", "c", "d", "a"]);
    }
}
