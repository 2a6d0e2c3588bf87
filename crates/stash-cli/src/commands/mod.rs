//! Command handlers

use std::io::{self, Write};

use anyhow::{bail, Result};

use stash_core::Record;

pub mod config;
pub mod doc;
pub mod folder;
pub mod note;
pub mod site;
pub mod stats;
pub mod todo;
pub mod user;

/// Resolve a record id given in full or as a unique suffix
///
/// Ids are millisecond timestamps, so their leading digits are shared and
/// the trailing digits are what tells records apart.
pub fn resolve_id<T: Record>(records: &[T], id: &str, kind: &str) -> Result<String> {
    if id.trim().is_empty() {
        bail!("Empty {} id", kind);
    }

    if records.iter().any(|r| r.id() == id) {
        return Ok(id.to_string());
    }

    let matches: Vec<&T> = records.iter().filter(|r| r.id().ends_with(id)).collect();

    match matches.len() {
        0 => bail!("No {} found matching: {}", kind, id),
        1 => Ok(matches[0].id().to_string()),
        _ => {
            eprintln!("Multiple {}s match '{}':", kind, id);
            for record in &matches {
                eprintln!("  {}", record.id());
            }
            bail!("Ambiguous ID. Please provide more digits.");
        }
    }
}

/// Prompt for a line of input; `None` if left empty
pub fn prompt_optional(prompt: &str) -> Result<Option<String>> {
    print!("{}: ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        Ok(None)
    } else {
        Ok(Some(input.to_string()))
    }
}

/// Split a comma-separated list, dropping empty entries
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash_core::{RecordStore, Session, SessionManager, Todo, TodoDraft};
    use stash_core::MemorySubstrate;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b,,c "), vec!["a", "b", "c"]);
        assert!(split_list(" , ").is_empty());
    }

    fn todo(id: &str) -> Todo {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": "t",
            "category": "general",
            "completed": false,
            "createdAt": "2024-01-01T00:00:00Z",
            "userId": "1"
        }))
        .unwrap()
    }

    #[test]
    fn test_resolve_id() {
        let all = vec![todo("1700000000101"), todo("1700000000201")];

        assert_eq!(
            resolve_id(&all, "1700000000101", "todo").unwrap(),
            "1700000000101"
        );
        assert_eq!(resolve_id(&all, "201", "todo").unwrap(), "1700000000201");
        assert!(resolve_id(&all, "x", "todo").is_err());
        // Leading digits are not a suffix
        assert!(resolve_id(&all, "1700", "todo").is_err());
        // Shared trailing digits are ambiguous
        assert!(resolve_id(&all, "01", "todo").is_err());
    }

    #[test]
    fn test_resolve_id_rejects_empty_id() {
        let substrate = MemorySubstrate::new();
        let sessions = SessionManager::new(&substrate);
        sessions.register("alice", "a@example.com", "pw").unwrap();
        let session: Session = sessions.login("alice", "pw").unwrap();
        let todos = RecordStore::<Todo>::new(&substrate, &session);
        todos.add(TodoDraft::new("only", "x")).unwrap();

        let all = todos.get_all();
        assert_eq!(all.len(), 1);
        assert!(resolve_id(&all, "", "todo").is_err());
        assert!(resolve_id(&all, "  ", "todo").is_err());
    }
}
