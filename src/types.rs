/*!
 * Core types for the collectfs node tree
 */

use std::path::PathBuf;

/// Represents a directory that survived pruning
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    /// Directory name
    pub name: String,
    /// Relative path from the collection root (empty for the root itself)
    pub path: PathBuf,
    /// Directory contents in traversal order, subdirectories first
    pub contents: Vec<Node>,
}

/// Represents a collected file
#[derive(Debug, Clone)]
pub struct FileNode {
    /// File name
    pub name: String,
    /// Relative path from the collection root
    pub path: PathBuf,
    /// File content, read at scan time
    pub content: String,
}

/// A node in the collected tree
#[derive(Debug, Clone)]
pub enum Node {
    /// Directory node
    Directory(DirectoryNode),
    /// Collected file node
    File(FileNode),
}
