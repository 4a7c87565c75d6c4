/*!
 * Collection engine: one filtered traversal of the target directory
 */

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use walkdir::WalkDir;

use crate::error::Result;
use crate::patterns::PatternSet;
use crate::report::FileReportInfo;
use crate::types::{DirectoryNode, FileNode, Node};

/// Statistics accumulated during a collection pass
#[derive(Debug, Clone, Default)]
pub struct ScanStatistics {
    /// Number of files whose content made it into the report
    pub files_collected: usize,
    /// Number of matched files skipped because their content could not be read
    pub files_skipped: usize,
    /// Total number of lines across collected files
    pub total_lines: usize,
    /// Total number of characters across collected files
    pub total_chars: usize,
    /// Details for each collected file, keyed by relative path
    pub file_details: HashMap<String, FileReportInfo>,
}

/// Scanner for directory contents
pub struct Scanner {
    root: PathBuf,
    patterns: PatternSet,
    progress: ProgressBar,
    statistics: ScanStatistics,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(root: impl Into<PathBuf>, patterns: PatternSet, progress: ProgressBar) -> Self {
        Self {
            root: root.into(),
            patterns,
            progress,
            statistics: ScanStatistics::default(),
        }
    }

    /// Get scanner statistics
    pub fn statistics(&self) -> &ScanStatistics {
        &self.statistics
    }

    /// Scan the target directory and return the collected tree
    pub fn scan(&mut self) -> Result<DirectoryNode> {
        let abs_path = fs::canonicalize(&self.root)?;
        Ok(self.scan_directory(&abs_path, Path::new("")))
    }

    /// Scan one directory level: prune subdirectories before recursing,
    /// then filter and read files. Visit order is filesystem listing
    /// order, directories before files.
    fn scan_directory(&mut self, abs_path: &Path, rel_path: &Path) -> DirectoryNode {
        let entries: Vec<walkdir::DirEntry> = WalkDir::new(abs_path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .collect();

        let (dirs, files): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|e| e.file_type().is_dir());

        let mut contents = Vec::new();

        for entry in dirs {
            let entry_name = entry.file_name().to_string_lossy().to_string();
            if !self.patterns.should_descend(&entry_name) {
                log::debug!("Pruning directory {}", entry.path().display());
                continue;
            }
            let new_rel_path = rel_path.join(&entry_name);
            let dir_node = self.scan_directory(entry.path(), &new_rel_path);
            contents.push(Node::Directory(dir_node));
        }

        for entry in files {
            let entry_name = entry.file_name().to_string_lossy().to_string();
            if !self.patterns.matches_file(&entry_name) {
                continue;
            }
            let new_rel_path = rel_path.join(&entry_name);
            if let Some(file_node) = self.read_file(entry.path(), &new_rel_path, entry_name) {
                contents.push(Node::File(file_node));
            }
        }

        DirectoryNode {
            name: abs_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            path: rel_path.to_path_buf(),
            contents,
        }
    }

    /// Read one matched file. A read failure (permission, deletion
    /// race, non-UTF-8 content) is recorded as a skip and never aborts
    /// the run.
    fn read_file(&mut self, abs_path: &Path, rel_path: &Path, name: String) -> Option<FileNode> {
        self.progress.inc(1);
        self.progress
            .set_message(format!("Current file: {}", rel_path.display()));

        match fs::read_to_string(abs_path) {
            Ok(content) => {
                let lines = content.lines().count();
                let chars = content.chars().count();
                self.statistics.files_collected += 1;
                self.statistics.total_lines += lines;
                self.statistics.total_chars += chars;
                self.statistics.file_details.insert(
                    rel_path.to_string_lossy().to_string(),
                    FileReportInfo { lines, chars },
                );
                Some(FileNode {
                    name,
                    path: rel_path.to_path_buf(),
                    content,
                })
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", rel_path.display(), e);
                self.statistics.files_skipped += 1;
                None
            }
        }
    }
}
