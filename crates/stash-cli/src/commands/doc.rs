//! Document command handlers

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use stash_core::{DocumentDraft, Store};

use super::folder::resolve_folder;
use super::resolve_id;
use crate::editor::confirm;
use crate::output::{format_size, Output};

/// Preview stored with a document: the text itself for text files,
/// a one-line summary otherwise
fn preview(kind: &str, bytes: &[u8]) -> String {
    if kind == "Text" {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        format!("{} file - {:.2} KB", kind, bytes.len() as f64 / 1024.0)
    }
}

/// Upload a file from disk
pub fn upload(
    store: &Store,
    path: PathBuf,
    folder: Option<String>,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    let bytes = fs::read(&path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow::anyhow!("Not a file: {:?}", path))?;

    let library = store.library();
    let folder_id = resolve_folder(&library.folders().get_all(), folder.as_deref())?;

    let mut draft = DocumentDraft::for_file(name, bytes.len() as u64).in_folder(folder_id);
    if let Some(category) = category {
        draft.category = category;
    }
    draft.content = Some(preview(&draft.kind, &bytes));
    draft.file_data = Some(STANDARD.encode(&bytes));

    let document = library
        .add_document(draft)
        .context("Failed to upload document")?;

    output.success(&format!(
        "Uploaded {} ({})",
        document.name,
        format_size(document.size)
    ));
    output.print_document(&document);
    Ok(())
}

/// List documents: all, only the root level, or one folder's
pub fn list(store: &Store, folder: Option<String>, root: bool, output: &Output) -> Result<()> {
    let library = store.library();

    let documents = if root {
        library.documents_in(None)
    } else if let Some(folder) = folder {
        let folder_id = resolve_id(&library.folders().get_all(), &folder, "folder")?;
        library.documents_in(Some(&folder_id))
    } else {
        library.documents().get_all()
    };

    output.print_documents(&documents);
    Ok(())
}

/// Show a document and its preview
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let documents = store.documents();
    let id = resolve_id(&documents.get_all(), &id, "document")?;

    let document = documents
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Document not found: {}", id))?;
    output.print_document(&document);
    Ok(())
}

/// File a document in a folder, or at the root
pub fn move_to(store: &Store, id: String, folder: Option<String>, output: &Output) -> Result<()> {
    let library = store.library();
    let id = resolve_id(&library.documents().get_all(), &id, "document")?;
    let folder_id = resolve_folder(&library.folders().get_all(), folder.as_deref())?;

    if !library
        .move_document(&id, folder_id.clone())
        .context("Failed to move document")?
    {
        bail!("Document not found: {}", id);
    }

    match folder_id {
        Some(folder_id) => output.success(&format!("Moved document into folder {}", folder_id)),
        None => output.success("Moved document to the root"),
    }
    Ok(())
}

/// Delete a document
pub fn delete(store: &Store, id: String, output: &Output) -> Result<()> {
    let library = store.library();
    let id = resolve_id(&library.documents().get_all(), &id, "document")?;

    if output.should_prompt() {
        if let Some(document) = library.documents().get(&id) {
            println!("Delete document: {}", document.name);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if library
        .delete_document(&id)
        .context("Failed to delete document")?
    {
        output.success(&format!("Deleted document: {}", id));
    } else {
        output.message(&format!("Document already gone: {}", id));
    }
    Ok(())
}

/// Write a document's payload back to disk
pub fn export(store: &Store, id: String, dest: Option<PathBuf>, output: &Output) -> Result<()> {
    let documents = store.documents();
    let id = resolve_id(&documents.get_all(), &id, "document")?;
    let document = documents
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Document not found: {}", id))?;

    let Some(ref data) = document.file_data else {
        bail!("Document {} has no stored file data", document.name);
    };
    let bytes = STANDARD
        .decode(data)
        .with_context(|| format!("Stored data of {} is not valid base64", document.name))?;

    let dest = dest.unwrap_or_else(|| Path::new(&document.name).to_path_buf());
    if dest.exists() && output.should_prompt() && !confirm(&format!("Overwrite {:?}?", dest))? {
        println!("Cancelled.");
        return Ok(());
    }
    fs::write(&dest, &bytes).with_context(|| format!("Failed to write file: {:?}", dest))?;

    output.success(&format!("Exported {} to {}", document.name, dest.display()));
    Ok(())
}

/// Find documents by name
pub fn search(store: &Store, query: String, output: &Output) -> Result<()> {
    output.print_documents(&store.library().search(&query));
    Ok(())
}
