//! Website command handlers

use anyhow::{bail, Context, Result};

use stash_core::{Store, WebsiteDraft, WebsitePatch};

use super::{resolve_id, split_list};
use crate::editor::confirm;
use crate::output::Output;

/// Bookmark a website
pub fn add(
    store: &Store,
    name: String,
    url: String,
    category: String,
    description: Option<String>,
    icon: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut draft = WebsiteDraft::new(name, url, category);
    draft.description = description;
    if let Some(icon) = icon {
        draft.icon = icon;
    }

    let website = store.websites().add(draft).context("Failed to add website")?;

    output.success(&format!("Added website: {}", website.id));
    output.print_website(&website);
    Ok(())
}

/// List websites in display order
pub fn list(store: &Store, category: Option<String>, output: &Output) -> Result<()> {
    let websites: Vec<_> = store
        .websites()
        .list()
        .into_iter()
        .filter(|w| category.as_ref().map(|c| &w.category == c).unwrap_or(true))
        .collect();

    output.print_websites(&websites);
    Ok(())
}

/// Edit a website's fields
pub fn edit(store: &Store, id: String, patch: WebsitePatch, output: &Output) -> Result<()> {
    if patch == WebsitePatch::default() {
        bail!("Nothing to change. Pass at least one of --name, --url, --category, --description, --icon.");
    }

    let directory = store.websites();
    let id = resolve_id(&directory.list(), &id, "website")?;

    let website = directory
        .update(&id, patch)
        .context("Failed to update website")?
        .ok_or_else(|| anyhow::anyhow!("Website not found: {}", id))?;

    output.success("Website updated");
    output.print_website(&website);
    Ok(())
}

/// Move one website to a new position
pub fn move_to(store: &Store, id: String, position: usize, output: &Output) -> Result<()> {
    let directory = store.websites();
    let id = resolve_id(&directory.list(), &id, "website")?;

    if !directory.move_to(&id, position).context("Failed to reorder websites")? {
        bail!("Website not found: {}", id);
    }

    output.print_websites(&directory.list());
    Ok(())
}

/// Put websites in the given order; unnamed ones follow
pub fn reorder(store: &Store, ids: String, output: &Output) -> Result<()> {
    let directory = store.websites();
    let websites = directory.list();
    let ordered = split_list(&ids)
        .iter()
        .map(|id| resolve_id(&websites, id, "website"))
        .collect::<Result<Vec<_>>>()?;

    let reordered = directory
        .reorder(&ordered)
        .context("Failed to reorder websites")?;

    output.print_websites(&reordered);
    Ok(())
}

/// Delete a website
pub fn delete(store: &Store, id: String, output: &Output) -> Result<()> {
    let directory = store.websites();
    let websites = directory.list();
    let id = resolve_id(&websites, &id, "website")?;

    if output.should_prompt() {
        if let Some(website) = websites.iter().find(|w| w.id == id) {
            println!("Delete website: {} ({})", website.name, website.url);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if directory.delete(&id).context("Failed to delete website")? {
        output.success(&format!("Deleted website: {}", id));
    } else {
        output.message(&format!("Website already gone: {}", id));
    }
    Ok(())
}

/// Open a website in the default browser
pub fn open(store: &Store, id: String, output: &Output) -> Result<()> {
    let websites = store.websites().list();
    let id = resolve_id(&websites, &id, "website")?;
    let website = websites
        .into_iter()
        .find(|w| w.id == id)
        .ok_or_else(|| anyhow::anyhow!("Website not found: {}", id))?;

    open::that(&website.url).with_context(|| format!("Failed to open {}", website.url))?;

    output.message(&format!("Opened {}", website.url));
    Ok(())
}

/// List website categories
pub fn categories(store: &Store, output: &Output) -> Result<()> {
    output.print_categories(&store.websites().store().categories());
    Ok(())
}
