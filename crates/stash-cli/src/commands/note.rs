//! Note command handlers

use anyhow::{Context, Result};

use stash_core::{NoteDraft, NotePatch, Store};

use super::{resolve_id, split_list};
use crate::editor::{confirm, edit_markdown};
use crate::output::Output;

/// Create a note, opening the editor when no content is given
pub fn add(
    store: &Store,
    title: String,
    content: Option<String>,
    category: String,
    tags: Option<String>,
    output: &Output,
) -> Result<()> {
    let content = match content {
        Some(content) => content,
        None => edit_markdown(
            &format!("New note: {}. Write markdown below; this line is removed.", title),
            &format!("# {}\n\n", title),
        )?,
    };

    let draft = NoteDraft::new(title, content, category)
        .with_tags(tags.as_deref().map(split_list).unwrap_or_default());

    let note = store.notes().add(draft).context("Failed to add note")?;

    output.success(&format!("Added note: {}", note.id));
    show_by_id(store, &note.id, output)
}

/// List notes, optionally by category or tag
pub fn list(
    store: &Store,
    category: Option<String>,
    tag: Option<String>,
    output: &Output,
) -> Result<()> {
    let notes: Vec<_> = store
        .notes()
        .by_category(category.as_deref())
        .into_iter()
        .filter(|n| tag.as_ref().map(|t| n.tags.contains(t)).unwrap_or(true))
        .collect();

    output.print_notes(&notes);
    Ok(())
}

/// Show a single note
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let id = resolve_id(&store.notes().get_all(), &id, "note")?;
    show_by_id(store, &id, output)
}

fn show_by_id(store: &Store, id: &str, output: &Output) -> Result<()> {
    let note = store
        .notes()
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Note not found: {}", id))?;
    output.print_note(&note);
    Ok(())
}

/// Edit a note from flags, or its body in the editor when no flag is given
pub fn edit(
    store: &Store,
    id: String,
    title: Option<String>,
    content: Option<String>,
    category: Option<String>,
    tags: Option<String>,
    output: &Output,
) -> Result<()> {
    let notes = store.notes();
    let id = resolve_id(&notes.get_all(), &id, "note")?;

    let mut patch = NotePatch {
        title,
        content,
        category,
        tags: tags.as_deref().map(split_list),
    };

    if patch == NotePatch::default() {
        let note = notes
            .get(&id)
            .ok_or_else(|| anyhow::anyhow!("Note not found: {}", id))?;
        let edited = edit_markdown(
            &format!("Editing: {}. This line is removed.", note.title),
            &note.content,
        )?;
        if edited == note.content {
            output.message("No changes.");
            return Ok(());
        }
        patch.content = Some(edited);
    }

    notes
        .update(&id, patch)
        .context("Failed to update note")?
        .ok_or_else(|| anyhow::anyhow!("Note not found: {}", id))?;

    output.success("Note updated");
    show_by_id(store, &id, output)
}

/// Delete a note
pub fn delete(store: &Store, id: String, output: &Output) -> Result<()> {
    let notes = store.notes();
    let id = resolve_id(&notes.get_all(), &id, "note")?;

    if output.should_prompt() {
        if let Some(note) = notes.get(&id) {
            println!("Delete note: {}", note.title);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if notes.delete(&id).context("Failed to delete note")? {
        output.success(&format!("Deleted note: {}", id));
    } else {
        output.message(&format!("Note already gone: {}", id));
    }
    Ok(())
}

/// List note categories
pub fn categories(store: &Store, output: &Output) -> Result<()> {
    output.print_categories(&store.notes().categories());
    Ok(())
}
