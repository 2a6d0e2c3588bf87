//! Generic per-user record collections
//!
//! A [`RecordStore`] manages one kind of record for the session's user.
//! The whole collection is stored as a single JSON array under
//! `<scope>_<collection>` and every mutation is a full read-modify-write:
//! read the array, change it in memory, write the array back.
//!
//! ## Usage
//!
//! ```ignore
//! let todos = RecordStore::<Todo>::new(&substrate, &session);
//! let todo = todos.add(TodoDraft::new("Buy milk", "home"))?;
//! todos.update(&todo.id, TodoPatch::completed(true))?;
//! assert!(todos.delete(&todo.id)?);
//! ```

use std::collections::HashSet;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::id::next_id;
use crate::namespace::Namespace;
use crate::session::Session;
use crate::storage::{read_json, remove_key, write_json, StorageError, StorageResult, Substrate};

/// Values stamped onto a record when it is created
#[derive(Debug, Clone)]
pub struct Stamp {
    /// Fresh record id
    pub id: String,
    /// Owner of the new record
    pub user_id: String,
    /// Creation time
    pub now: DateTime<Utc>,
    /// Number of records already in the collection
    pub index: usize,
}

/// A kind of record kept in a per-user collection
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Collection name, the suffix of the storage key
    const COLLECTION: &'static str;

    /// Caller-supplied fields for `add`
    type Draft;

    /// Partial update for `update`
    type Patch;

    fn id(&self) -> &str;

    fn user_id(&self) -> &str;

    /// Build a new record from a draft and its stamp
    fn create(draft: Self::Draft, stamp: Stamp) -> Self;

    /// Merge a patch into this record; fields absent from the patch stay put
    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>);
}

/// Records that carry a free-form category
pub trait Categorized {
    fn category(&self) -> &str;
}

/// CRUD over one user's collection of `T`
pub struct RecordStore<'a, T> {
    substrate: &'a dyn Substrate,
    session: &'a Session,
    key: String,
    _kind: PhantomData<T>,
}

impl<'a, T: Record> RecordStore<'a, T> {
    /// Bind a store to the session's namespace
    pub fn new(substrate: &'a dyn Substrate, session: &'a Session) -> Self {
        let key = Namespace::for_session(session).resolve(T::COLLECTION);
        Self {
            substrate,
            session,
            key,
            _kind: PhantomData,
        }
    }

    /// Storage key of this collection
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Every record in the collection, in insertion order
    ///
    /// Never fails: a missing or unreadable collection is empty.
    pub fn get_all(&self) -> Vec<T> {
        read_json(self.substrate, &self.key).unwrap_or_default()
    }

    /// Look up a single record
    pub fn get(&self, id: &str) -> Option<T> {
        self.get_all().into_iter().find(|r| r.id() == id)
    }

    /// Number of records
    pub fn count(&self) -> usize {
        self.get_all().len()
    }

    /// Replace the whole collection
    pub fn save_all(&self, records: &[T]) -> StorageResult<()> {
        debug!(key = %self.key, count = records.len(), "saving collection");
        write_json(self.substrate, &self.key, records)
    }

    /// Create a record owned by the signed-in user
    pub fn add(&self, draft: T::Draft) -> StorageResult<T> {
        let user = self.session.user().ok_or(StorageError::Unauthenticated)?;

        let mut records = self.get_all();
        let record = T::create(
            draft,
            Stamp {
                id: next_id(),
                user_id: user.id.clone(),
                now: Utc::now(),
                index: records.len(),
            },
        );
        records.push(record.clone());
        self.save_all(&records)?;

        debug!(key = %self.key, id = record.id(), "added record");
        Ok(record)
    }

    /// Merge `patch` into the record with `id`
    ///
    /// Returns `None`, writing nothing, if there is no such record.
    pub fn update(&self, id: &str, patch: T::Patch) -> StorageResult<Option<T>> {
        let mut records = self.get_all();
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            debug!(key = %self.key, id, "update of missing record");
            return Ok(None);
        };

        record.apply(patch, Utc::now());
        let updated = record.clone();
        self.save_all(&records)?;
        Ok(Some(updated))
    }

    /// Remove the record with `id`; `false` if there was none
    pub fn delete(&self, id: &str) -> StorageResult<bool> {
        let mut records = self.get_all();
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }

        self.save_all(&records)?;
        debug!(key = %self.key, id, "deleted record");
        Ok(true)
    }

    /// Drop the whole collection
    pub fn clear(&self) -> StorageResult<()> {
        remove_key(self.substrate, &self.key)
    }
}

impl<'a, T: Record + Categorized> RecordStore<'a, T> {
    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.get_all()
            .iter()
            .map(|r| r.category())
            .filter(|c| seen.insert(c.to_string()))
            .map(str::to_string)
            .collect()
    }

    /// Records in `category`, or all records for `None`
    pub fn by_category(&self, category: Option<&str>) -> Vec<T> {
        let records = self.get_all();
        match category {
            None => records,
            Some(category) => records
                .into_iter()
                .filter(|r| r.category() == category)
                .collect(),
        }
    }
}
