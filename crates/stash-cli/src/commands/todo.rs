//! Todo command handlers

use anyhow::{Context, Result};

use stash_core::{Store, TodoDraft, TodoPatch};

use super::{prompt_optional, resolve_id};
use crate::editor::confirm;
use crate::output::Output;

/// Create a todo
pub fn add(
    store: &Store,
    title: String,
    category: String,
    description: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut draft = TodoDraft::new(title, category);
    if let Some(description) = description {
        draft = draft.with_description(description);
    }

    let todo = store.todos().add(draft).context("Failed to add todo")?;

    output.success(&format!("Added todo: {}", todo.id));
    show_by_id(store, &todo.id, output)
}

/// List todos, optionally narrowed by category and status
pub fn list(
    store: &Store,
    category: Option<String>,
    pending: bool,
    done: bool,
    output: &Output,
) -> Result<()> {
    let todos: Vec<_> = store
        .todos()
        .by_category(category.as_deref())
        .into_iter()
        .filter(|t| !(pending && t.completed) && !(done && !t.completed))
        .collect();

    output.print_todos(&todos);
    Ok(())
}

/// Show a single todo
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let id = resolve_id(&store.todos().get_all(), &id, "todo")?;
    show_by_id(store, &id, output)
}

fn show_by_id(store: &Store, id: &str, output: &Output) -> Result<()> {
    let todo = store
        .todos()
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Todo not found: {}", id))?;
    output.print_todo(&todo);
    Ok(())
}

/// Edit a todo from flags, or interactively when no flag is given
pub fn edit(
    store: &Store,
    id: String,
    title: Option<String>,
    category: Option<String>,
    description: Option<String>,
    output: &Output,
) -> Result<()> {
    let todos = store.todos();
    let id = resolve_id(&todos.get_all(), &id, "todo")?;

    let mut patch = TodoPatch {
        title,
        category,
        description: description.map(|d| if d.is_empty() { None } else { Some(d) }),
        ..TodoPatch::default()
    };

    if patch == TodoPatch::default() {
        let todo = todos
            .get(&id)
            .ok_or_else(|| anyhow::anyhow!("Todo not found: {}", id))?;

        println!("Editing todo: {}", todo.id);
        println!("Press Enter to keep current value, or type new value.\n");

        patch.title = prompt_optional(&format!("Title [{}]", todo.title))?;
        patch.category = prompt_optional(&format!("Category [{}]", todo.category))?;
        patch.description = prompt_optional(&format!(
            "Description [{}] (\"-\" clears)",
            todo.description.as_deref().unwrap_or("")
        ))?
        .map(|d| if d == "-" { None } else { Some(d) });
    }

    todos
        .update(&id, patch)
        .context("Failed to update todo")?
        .ok_or_else(|| anyhow::anyhow!("Todo not found: {}", id))?;

    output.success("Todo updated");
    show_by_id(store, &id, output)
}

/// Mark a todo done or not done
pub fn set_completed(store: &Store, id: String, completed: bool, output: &Output) -> Result<()> {
    let todos = store.todos();
    let id = resolve_id(&todos.get_all(), &id, "todo")?;

    let todo = todos
        .update(&id, TodoPatch::completed(completed))
        .context("Failed to update todo")?
        .ok_or_else(|| anyhow::anyhow!("Todo not found: {}", id))?;

    let state = if completed { "done" } else { "pending" };
    output.success(&format!("Marked {} as {}", todo.title, state));
    Ok(())
}

/// Delete a todo
pub fn delete(store: &Store, id: String, output: &Output) -> Result<()> {
    let todos = store.todos();
    let id = resolve_id(&todos.get_all(), &id, "todo")?;

    if output.should_prompt() {
        if let Some(todo) = todos.get(&id) {
            println!("Delete todo: {}", todo.title);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if todos.delete(&id).context("Failed to delete todo")? {
        output.success(&format!("Deleted todo: {}", id));
    } else {
        output.message(&format!("Todo already gone: {}", id));
    }
    Ok(())
}

/// List todo categories
pub fn categories(store: &Store, output: &Output) -> Result<()> {
    output.print_categories(&store.todos().categories());
    Ok(())
}
