//! Interactive editing support
//!
//! Opens $EDITOR for writing note bodies and asks for confirmations and
//! passwords on the terminal.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;

/// Lines starting with this marker are instructions, stripped after editing
const COMMENT_MARKER: &str = "<!--";

/// Edit a markdown body, with an instruction header that is removed again
///
/// Returns the trimmed body.
pub fn edit_markdown(header: &str, body: &str) -> Result<String> {
    let initial = format!("{} {} -->\n\n{}", COMMENT_MARKER, header, body);
    let edited = edit_text(&initial)?;
    Ok(strip_comments(&edited))
}

/// Open content in the user's preferred editor
///
/// Uses $EDITOR, $VISUAL, or falls back to common editors.
fn edit_text(initial_content: &str) -> Result<String> {
    let editor = find_editor()?;

    let temp_path = env::temp_dir().join(format!("stash_note_{}.md", std::process::id()));
    fs::write(&temp_path, initial_content)
        .with_context(|| format!("Failed to create temp file: {:?}", temp_path))?;

    let status = Command::new(&editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor));

    let result = match status {
        Ok(status) if status.success() => fs::read_to_string(&temp_path)
            .with_context(|| format!("Failed to read edited file: {:?}", temp_path)),
        Ok(_) => Err(anyhow::anyhow!(
            "Editor '{}' exited with non-zero status. Check that your editor is configured correctly.",
            editor
        )),
        Err(e) => Err(e),
    };

    let _ = fs::remove_file(&temp_path);
    result
}

/// Drop instruction lines and surrounding whitespace
fn strip_comments(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with(COMMENT_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Find the user's preferred editor
fn find_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.is_empty() {
                return Ok(editor);
            }
        }
    }

    let common_editors = ["nano", "vim", "vi", "emacs", "notepad"];
    if let Some(editor) = common_editors.into_iter().find(|e| command_exists(e)) {
        return Ok(editor.to_string());
    }

    bail!(
        "No editor found. Set $EDITOR or pass the content on the command line.\n\
         Example: export EDITOR=nano"
    )
}

/// Check if a command exists in PATH
fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

/// Read a password from stdin
///
/// Input is echoed; passwords are stored as plaintext anyway.
pub fn read_password(prompt: &str) -> Result<String> {
    if atty::is(atty::Stream::Stdin) {
        print!("{}: ", prompt);
        io::stdout().flush()?;
    }

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let password = input.trim_end_matches(['\r', '\n']).to_string();

    if password.is_empty() {
        bail!("Password cannot be empty");
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments() {
        let text = "<!-- Editing: Idea -->\n\n# Idea\n\nBody text\n";
        assert_eq!(strip_comments(text), "# Idea\n\nBody text");
    }

    #[test]
    fn test_strip_comments_keeps_inline_markers() {
        let text = "Use <!-- inline --> comments";
        assert_eq!(strip_comments(text), text);
    }

    #[test]
    fn test_command_exists() {
        #[cfg(unix)]
        assert!(command_exists("ls"));

        assert!(!command_exists("definitely_not_a_real_command_12345"));
    }
}
