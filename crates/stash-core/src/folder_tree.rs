//! Folder hierarchy
//!
//! Folders are stored flat, each pointing at its parent by id. The tree is
//! rebuilt from that list on every read:
//!
//! 1. index every folder by id
//! 2. attach every folder with a parent to that parent, in list order
//!
//! Roots are folders without a parent. A folder whose parent id names no
//! existing folder is attached nowhere and therefore left out of the forest.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::Folder;

/// A folder together with its direct children
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderNode {
    #[serde(flatten)]
    pub folder: Folder,
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Number of folders in this subtree, including this one
    pub fn folder_count(&self) -> usize {
        1 + self.children.iter().map(FolderNode::folder_count).sum::<usize>()
    }

    /// Locate the node with `id` in this subtree (test helper)
    #[cfg(test)]
    pub fn find(&self, id: &str) -> Option<&FolderNode> {
        if self.folder.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Assemble a flat folder list into a forest
pub fn build_tree(folders: &[Folder]) -> Vec<FolderNode> {
    // First pass: id -> position in `folders`, last occurrence wins
    let index: HashMap<&str, usize> = folders
        .iter()
        .enumerate()
        .map(|(i, f)| (f.id.as_str(), i))
        .collect();

    // Second pass: children lists and roots, in input order
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); folders.len()];
    let mut roots = Vec::new();
    for (i, folder) in folders.iter().enumerate() {
        match folder.parent_id.as_deref() {
            None => roots.push(i),
            Some(parent_id) => {
                if let Some(&parent) = index.get(parent_id) {
                    children[parent].push(i);
                }
            }
        }
    }

    let mut visited = HashSet::new();
    roots
        .into_iter()
        .filter_map(|i| assemble(i, folders, &children, &mut visited))
        .collect()
}

/// Materialize the subtree under `i`; each folder is emitted at most once
fn assemble(
    i: usize,
    folders: &[Folder],
    children: &[Vec<usize>],
    visited: &mut HashSet<usize>,
) -> Option<FolderNode> {
    if !visited.insert(i) {
        return None;
    }

    let kids = children[i]
        .iter()
        .filter_map(|&child| assemble(child, folders, children, visited))
        .collect();

    Some(FolderNode {
        folder: folders[i].clone(),
        children: kids,
    })
}

/// Ids of every folder below `id` in the flat list, following parent links
pub fn descendant_ids(folders: &[Folder], id: &str) -> HashSet<String> {
    let mut found: HashSet<String> = HashSet::new();
    let mut frontier = vec![id.to_string()];

    while let Some(current) = frontier.pop() {
        for folder in folders {
            if folder.parent_id.as_deref() == Some(current.as_str())
                && folder.id != id
                && found.insert(folder.id.clone())
            {
                frontier.push(folder.id.clone());
            }
        }
    }

    found
}
