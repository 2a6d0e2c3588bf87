//! Data models for Stash
//!
//! Defines the persisted records (User, Todo, Note, Folder, Document,
//! Website) together with the draft and patch types used to create and
//! update them through a [`RecordStore`](crate::record_store::RecordStore).
//!
//! Records serialize with camelCase field names and RFC 3339 timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record_store::{Categorized, Record, Stamp};

/// Maximum length, in characters, of a document's preview text
pub const PREVIEW_LIMIT: usize = 1000;

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Unique across all users
    pub username: String,
    pub email: String,
    /// Stored and compared as plaintext
    pub password: String,
    pub created_at: DateTime<Utc>,
}

// ==================== Todo ====================

/// A task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

/// Fields supplied when creating a todo
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub completed: bool,
}

impl TodoDraft {
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update of a todo; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Patch that only sets the completion flag
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}

impl Record for Todo {
    const COLLECTION: &'static str = "todos";
    type Draft = TodoDraft;
    type Patch = TodoPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn create(draft: TodoDraft, stamp: Stamp) -> Self {
        Self {
            id: stamp.id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            completed: draft.completed,
            created_at: stamp.now,
            user_id: stamp.user_id,
        }
    }

    fn apply(&mut self, patch: TodoPatch, _now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

impl Categorized for Todo {
    fn category(&self) -> &str {
        &self.category
    }
}

// ==================== Note ====================

/// A markdown note
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    /// Markdown body
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every update
    pub updated_at: DateTime<Utc>,
    pub user_id: String,
}

/// Fields supplied when creating a note
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl NoteDraft {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: category.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Partial update of a note
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Record for Note {
    const COLLECTION: &'static str = "notes";
    type Draft = NoteDraft;
    type Patch = NotePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn create(draft: NoteDraft, stamp: Stamp) -> Self {
        Self {
            id: stamp.id,
            title: draft.title,
            content: draft.content,
            category: draft.category,
            tags: draft.tags,
            created_at: stamp.now,
            updated_at: stamp.now,
            user_id: stamp.user_id,
        }
    }

    fn apply(&mut self, patch: NotePatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        // Even an empty patch counts as an edit
        self.updated_at = now.max(self.created_at);
    }
}

impl Categorized for Note {
    fn category(&self) -> &str {
        &self.category
    }
}

// ==================== Folder ====================

/// A document folder; `parent_id == None` means the folder is a root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

/// Fields supplied when creating a folder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderDraft {
    pub name: String,
    pub parent_id: Option<String>,
}

impl FolderDraft {
    pub fn new(name: impl Into<String>, parent_id: Option<String>) -> Self {
        Self {
            name: name.into(),
            parent_id,
        }
    }
}

/// Partial update of a folder
///
/// Re-parenting is not part of the patch; it goes through
/// [`DocumentLibrary::move_folder`](crate::library::DocumentLibrary::move_folder),
/// which rejects cycles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderPatch {
    pub name: Option<String>,
}

impl Record for Folder {
    const COLLECTION: &'static str = "folders";
    type Draft = FolderDraft;
    type Patch = FolderPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn create(draft: FolderDraft, stamp: Stamp) -> Self {
        Self {
            id: stamp.id,
            name: draft.name,
            parent_id: draft.parent_id,
            created_at: stamp.now,
            user_id: stamp.user_id,
        }
    }

    fn apply(&mut self, patch: FolderPatch, _now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
    }
}

// ==================== Document ====================

/// An uploaded file; `folder_id == None` means it sits at the root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    /// File type tag (PDF, Word, Excel, Text, Other)
    #[serde(rename = "type")]
    pub kind: String,
    /// Size of the original file in bytes
    pub size: u64,
    pub category: String,
    /// Preview text, at most [`PREVIEW_LIMIT`] characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Base64-encoded file payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,
    pub upload_time: DateTime<Utc>,
    pub user_id: String,
    #[serde(default)]
    pub folder_id: Option<String>,
}

/// Fields supplied when adding a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentDraft {
    pub name: String,
    pub kind: String,
    pub size: u64,
    pub category: String,
    pub content: Option<String>,
    pub file_data: Option<String>,
    pub folder_id: Option<String>,
}

impl DocumentDraft {
    /// Draft for a file name, with type and category derived from its extension
    pub fn for_file(name: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        let kind = file_type(&name).to_string();
        Self {
            category: kind.clone(),
            kind,
            name,
            size,
            ..Self::default()
        }
    }

    pub fn in_folder(mut self, folder_id: Option<String>) -> Self {
        self.folder_id = folder_id;
        self
    }
}

/// Partial update of a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPatch {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub size: Option<u64>,
    pub category: Option<String>,
    pub content: Option<Option<String>>,
    pub file_data: Option<Option<String>>,
    pub folder_id: Option<Option<String>>,
}

impl DocumentPatch {
    /// Patch that only re-files the document
    pub fn folder(folder_id: Option<String>) -> Self {
        Self {
            folder_id: Some(folder_id),
            ..Self::default()
        }
    }
}

impl Record for Document {
    const COLLECTION: &'static str = "documents";
    type Draft = DocumentDraft;
    type Patch = DocumentPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn create(draft: DocumentDraft, stamp: Stamp) -> Self {
        Self {
            id: stamp.id,
            name: draft.name,
            kind: draft.kind,
            size: draft.size,
            category: draft.category,
            content: draft.content.map(|c| truncate_preview(&c)),
            file_data: draft.file_data,
            upload_time: stamp.now,
            user_id: stamp.user_id,
            folder_id: draft.folder_id,
        }
    }

    fn apply(&mut self, patch: DocumentPatch, _now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(content) = patch.content {
            self.content = content.map(|c| truncate_preview(&c));
        }
        if let Some(file_data) = patch.file_data {
            self.file_data = file_data;
        }
        if let Some(folder_id) = patch.folder_id {
            self.folder_id = folder_id;
        }
    }
}

impl Categorized for Document {
    fn category(&self) -> &str {
        &self.category
    }
}

/// Classify a file name by its extension
pub fn file_type(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "PDF",
        "doc" | "docx" => "Word",
        "xls" | "xlsx" => "Excel",
        "txt" => "Text",
        _ => "Other",
    }
}

/// Cut preview text down to [`PREVIEW_LIMIT`] characters
pub fn truncate_preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_LIMIT) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

// ==================== Website ====================

/// A bookmarked website
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    pub id: String,
    pub name: String,
    pub url: String,
    /// Image reference (URL or data URI)
    pub icon: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Rank among the user's websites
    pub position: u32,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

/// Fields supplied when adding a website
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebsiteDraft {
    pub name: String,
    pub url: String,
    pub icon: String,
    pub category: String,
    pub description: Option<String>,
    /// Defaults to the end of the list
    pub position: Option<u32>,
}

impl WebsiteDraft {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let url = url.into();
        Self {
            icon: favicon_url(&url),
            name: name.into(),
            url,
            category: category.into(),
            ..Self::default()
        }
    }
}

/// Partial update of a website
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebsitePatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub category: Option<String>,
    pub description: Option<Option<String>>,
    pub position: Option<u32>,
}

impl WebsitePatch {
    pub fn position(position: u32) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }
}

impl Record for Website {
    const COLLECTION: &'static str = "websites";
    type Draft = WebsiteDraft;
    type Patch = WebsitePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn create(draft: WebsiteDraft, stamp: Stamp) -> Self {
        Self {
            id: stamp.id,
            name: draft.name,
            url: draft.url,
            icon: draft.icon,
            category: draft.category,
            description: draft.description,
            position: draft
                .position
                .unwrap_or_else(|| u32::try_from(stamp.index).unwrap_or(u32::MAX)),
            created_at: stamp.now,
            user_id: stamp.user_id,
        }
    }

    fn apply(&mut self, patch: WebsitePatch, _now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
    }
}

impl Categorized for Website {
    fn category(&self) -> &str {
        &self.category
    }
}

/// Default icon for a site: its `/favicon.ico`
pub fn favicon_url(url: &str) -> String {
    let (scheme, rest) = match url.split_once("://") {
        Some((scheme, rest)) => (scheme, rest),
        None => ("https", url),
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    format!("{}://{}/favicon.ico", scheme, host)
}
