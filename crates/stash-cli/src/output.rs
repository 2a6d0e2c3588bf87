//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag), printing ids only

use serde::Serialize;

use stash_core::{Document, Folder, FolderNode, Note, Statistics, Todo, User, Website};

/// Number of trailing id digits shown in listings
const SHORT_ID_LEN: usize = 6;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    // ==================== Users ====================

    /// Print one account; the password is never shown
    pub fn print_user(&self, user: &User) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", user.id);
                println!("Username: {}", user.username);
                println!("Email:    {}", user.email);
                println!("Joined:   {}", user.created_at.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => print_json(&user_json(user)),
            OutputFormat::Quiet => println!("{}", user.id),
        }
    }

    pub fn print_users(&self, users: &[User], current: Option<&User>) {
        match self.format {
            OutputFormat::Human => {
                if users.is_empty() {
                    println!("No users registered.");
                    return;
                }
                for user in users {
                    let marker = if current.map(|c| c.id == user.id).unwrap_or(false) {
                        "*"
                    } else {
                        " "
                    };
                    println!(
                        "{} {} | {} | {}",
                        marker,
                        short_id(&user.id),
                        user.username,
                        user.email
                    );
                }
                println!("\n{} user(s)", users.len());
            }
            OutputFormat::Json => {
                let users: Vec<_> = users.iter().map(user_json).collect();
                print_json(&users);
            }
            OutputFormat::Quiet => {
                for user in users {
                    println!("{}", user.username);
                }
            }
        }
    }

    // ==================== Todos ====================

    pub fn print_todo(&self, todo: &Todo) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", todo.id);
                println!("Title:       {}", todo.title);
                if let Some(ref desc) = todo.description {
                    println!("Description: {}", desc);
                }
                println!("Category:    {}", todo.category);
                println!("Status:      {}", if todo.completed { "done" } else { "pending" });
                println!("Created:     {}", todo.created_at.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => print_json(todo),
            OutputFormat::Quiet => println!("{}", todo.id),
        }
    }

    pub fn print_todos(&self, todos: &[Todo]) {
        match self.format {
            OutputFormat::Human => {
                if todos.is_empty() {
                    println!("No todos found.");
                    return;
                }
                for todo in todos {
                    println!(
                        "{} [{}] {} | {}",
                        short_id(&todo.id),
                        if todo.completed { "x" } else { " " },
                        truncate(&todo.title, 45),
                        todo.category
                    );
                }
                let done = todos.iter().filter(|t| t.completed).count();
                println!("\n{} todo(s), {} done", todos.len(), done);
            }
            OutputFormat::Json => print_json(todos),
            OutputFormat::Quiet => {
                for todo in todos {
                    println!("{}", todo.id);
                }
            }
        }
    }

    // ==================== Notes ====================

    pub fn print_note(&self, note: &Note) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", note.id);
                println!("Title:    {}", note.title);
                println!("Category: {}", note.category);
                if !note.tags.is_empty() {
                    println!("Tags:     {}", note.tags.join(", "));
                }
                println!("Created:  {}", note.created_at.format("%Y-%m-%d %H:%M"));
                println!("Updated:  {}", note.updated_at.format("%Y-%m-%d %H:%M"));
                if !note.content.is_empty() {
                    println!();
                    println!("{}", note.content);
                }
            }
            OutputFormat::Json => print_json(note),
            OutputFormat::Quiet => println!("{}", note.id),
        }
    }

    pub fn print_notes(&self, notes: &[Note]) {
        match self.format {
            OutputFormat::Human => {
                if notes.is_empty() {
                    println!("No notes found.");
                    return;
                }
                for note in notes {
                    let tags = if note.tags.is_empty() {
                        String::new()
                    } else {
                        format!(" #{}", note.tags.join(" #"))
                    };
                    println!(
                        "{} | {} | {}{} | {}",
                        short_id(&note.id),
                        truncate(&note.title, 30),
                        note.category,
                        tags,
                        truncate_line(&note.content, 40)
                    );
                }
                println!("\n{} note(s)", notes.len());
            }
            OutputFormat::Json => print_json(notes),
            OutputFormat::Quiet => {
                for note in notes {
                    println!("{}", note.id);
                }
            }
        }
    }

    // ==================== Documents ====================

    /// Print one document with its preview; the payload is left out
    pub fn print_document(&self, document: &Document) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", document.id);
                println!("Name:     {}", document.name);
                println!("Type:     {}", document.kind);
                println!("Size:     {}", format_size(document.size));
                println!("Category: {}", document.category);
                println!(
                    "Folder:   {}",
                    document.folder_id.as_deref().unwrap_or("(root)")
                );
                println!("Uploaded: {}", document.upload_time.format("%Y-%m-%d %H:%M"));
                if let Some(ref preview) = document.content {
                    println!();
                    println!("── Preview ──");
                    println!("{}", preview);
                }
            }
            OutputFormat::Json => print_json(&without_payload(document)),
            OutputFormat::Quiet => println!("{}", document.id),
        }
    }

    pub fn print_documents(&self, documents: &[Document]) {
        match self.format {
            OutputFormat::Human => {
                if documents.is_empty() {
                    println!("No documents found.");
                    return;
                }
                for doc in documents {
                    println!(
                        "{} | {} | {:<5} | {:>10}",
                        short_id(&doc.id),
                        truncate(&doc.name, 40),
                        doc.kind,
                        format_size(doc.size)
                    );
                }
                let total: u64 = documents.iter().map(|d| d.size).sum();
                println!("\n{} document(s), {}", documents.len(), format_size(total));
            }
            OutputFormat::Json => {
                let documents: Vec<_> = documents.iter().map(without_payload).collect();
                print_json(&documents);
            }
            OutputFormat::Quiet => {
                for doc in documents {
                    println!("{}", doc.id);
                }
            }
        }
    }

    // ==================== Folders ====================

    pub fn print_folder(&self, folder: &Folder) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:     {}", folder.id);
                println!("Name:   {}", folder.name);
                println!("Parent: {}", folder.parent_id.as_deref().unwrap_or("(root)"));
            }
            OutputFormat::Json => print_json(folder),
            OutputFormat::Quiet => println!("{}", folder.id),
        }
    }

    /// Print the folder forest, with the number of documents filed directly
    /// in each folder
    pub fn print_folder_tree(&self, roots: &[FolderNode], documents: &[Document]) {
        match self.format {
            OutputFormat::Human => {
                let unfiled = count_in(documents, None);
                println!("/ ({} document(s))", unfiled);
                for node in roots {
                    print_node(node, documents, 1);
                }
                let folders: usize = roots.iter().map(FolderNode::folder_count).sum();
                println!("{} folder(s)", folders);
            }
            OutputFormat::Json => print_json(roots),
            OutputFormat::Quiet => {
                fn ids(nodes: &[FolderNode]) {
                    for node in nodes {
                        println!("{}", node.folder.id);
                        ids(&node.children);
                    }
                }
                ids(roots);
            }
        }
    }

    // ==================== Websites ====================

    pub fn print_website(&self, website: &Website) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", website.id);
                println!("Name:        {}", website.name);
                println!("URL:         {}", website.url);
                println!("Category:    {}", website.category);
                if let Some(ref desc) = website.description {
                    println!("Description: {}", desc);
                }
                println!("Icon:        {}", website.icon);
                println!("Position:    {}", website.position);
            }
            OutputFormat::Json => print_json(website),
            OutputFormat::Quiet => println!("{}", website.id),
        }
    }

    pub fn print_websites(&self, websites: &[Website]) {
        match self.format {
            OutputFormat::Human => {
                if websites.is_empty() {
                    println!("No websites found.");
                    return;
                }
                for site in websites {
                    println!(
                        "{:>3}. {} | {} | {} | {}",
                        site.position,
                        short_id(&site.id),
                        truncate(&site.name, 25),
                        site.category,
                        truncate(&site.url, 45)
                    );
                }
                println!("\n{} website(s)", websites.len());
            }
            OutputFormat::Json => print_json(websites),
            OutputFormat::Quiet => {
                for site in websites {
                    println!("{}", site.id);
                }
            }
        }
    }

    // ==================== Misc ====================

    /// Print distinct categories
    pub fn print_categories(&self, categories: &[String]) {
        match self.format {
            OutputFormat::Human => {
                if categories.is_empty() {
                    println!("No categories found.");
                    return;
                }
                for category in categories {
                    println!("{}", category);
                }
            }
            OutputFormat::Json => print_json(categories),
            OutputFormat::Quiet => {
                for category in categories {
                    println!("{}", category);
                }
            }
        }
    }

    pub fn print_stats(&self, stats: &Statistics) {
        match self.format {
            OutputFormat::Human => {
                println!(
                    "Todos:     {} ({} done, {} pending, {:.0}% complete)",
                    stats.todos.total,
                    stats.todos.completed,
                    stats.todos.pending,
                    stats.todos.completion_rate
                );
                for (category, count) in &stats.todos.by_category {
                    println!("  {:<12} {}", category, count);
                }
                println!(
                    "Documents: {} ({})",
                    stats.documents.total,
                    format_size(stats.documents.total_size)
                );
                for (kind, count) in &stats.documents.by_type {
                    println!("  {:<12} {}", kind, count);
                }
                println!("Folders:   {}", stats.folders);
                println!("Notes:     {}", stats.notes);
                println!("Websites:  {}", stats.websites);
            }
            OutputFormat::Json => print_json(stats),
            OutputFormat::Quiet => println!("{}", stats.todos.pending),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to render JSON: {}", e),
    }
}

fn user_json(user: &User) -> serde_json::Value {
    serde_json::json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "createdAt": user.created_at,
    })
}

fn without_payload(document: &Document) -> Document {
    Document {
        file_data: None,
        ..document.clone()
    }
}

fn count_in(documents: &[Document], folder_id: Option<&str>) -> usize {
    documents
        .iter()
        .filter(|d| d.folder_id.as_deref() == folder_id)
        .count()
}

fn print_node(node: &FolderNode, documents: &[Document], depth: usize) {
    let count = count_in(documents, Some(&node.folder.id));
    println!(
        "{}{} {} ({} document(s))",
        "  ".repeat(depth),
        short_id(&node.folder.id),
        node.folder.name,
        count
    );
    for child in &node.children {
        print_node(child, documents, depth + 1);
    }
}

/// Last digits of an id; these are what tell timestamp ids apart
fn short_id(id: &str) -> &str {
    let start = id
        .char_indices()
        .rev()
        .nth(SHORT_ID_LEN - 1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    &id[start..]
}

/// Human-readable byte count
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f < KB {
        format!("{} B", bytes)
    } else if bytes_f < KB * KB {
        format!("{:.2} KB", bytes_f / KB)
    } else {
        format!("{:.2} MB", bytes_f / (KB * KB))
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("ééééééééééé", 5), "éé...");
    }

    #[test]
    fn test_truncate_line() {
        assert_eq!(truncate_line("single line", 20), "single line");
        assert_eq!(truncate_line("line one\nline two", 20), "line one");
        assert_eq!(truncate_line("", 20), "");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("1700000000123"), "000123");
        assert_eq!(short_id("42"), "42");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }
}
