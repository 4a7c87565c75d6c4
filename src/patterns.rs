/*!
 * Include/exclude pattern compilation and matching
 */

use glob::Pattern;

use crate::config::ConfigRecord;
use crate::error::{CollectFsError, Result};

/// Compiled matchers for one collection pass, rebuilt every run from
/// the effective configuration record
#[derive(Debug)]
pub struct PatternSet {
    includes: Vec<Pattern>,
    exclude_files: Vec<Pattern>,
    exclude_dirs: Vec<Pattern>,
    exclude_dir_names: Vec<String>,
}

impl PatternSet {
    /// Compile all four pattern fields. Malformed globs are collected
    /// per-pattern and reported together in a single error.
    pub fn compile(record: &ConfigRecord) -> Result<Self> {
        let mut malformed = Vec::new();
        let includes = compile_patterns(record.include_patterns.iter(), &mut malformed);
        let exclude_files = compile_patterns(record.exclude_files.iter(), &mut malformed);
        let exclude_dirs = compile_patterns(record.exclude_dirs.iter(), &mut malformed);

        if !malformed.is_empty() {
            return Err(CollectFsError::Pattern(format!(
                "invalid glob pattern(s): {}",
                malformed.join(", ")
            )));
        }

        Ok(Self {
            includes,
            exclude_files,
            exclude_dirs,
            exclude_dir_names: record.exclude_dirs.iter().cloned().collect(),
        })
    }

    /// True iff the bare file name matches at least one include pattern
    /// and no exclude-file pattern. An empty include list matches
    /// nothing.
    pub fn matches_file(&self, name: &str) -> bool {
        self.includes.iter().any(|p| p.matches(name))
            && !self.exclude_files.iter().any(|p| p.matches(name))
    }

    /// False iff the directory name equals an exclude-dir entry exactly
    /// or glob-matches one. Pruned directories are never walked.
    pub fn should_descend(&self, name: &str) -> bool {
        if self.exclude_dir_names.iter().any(|n| n == name) {
            return false;
        }
        !self.exclude_dirs.iter().any(|p| p.matches(name))
    }
}

fn compile_patterns<'a>(
    patterns: impl Iterator<Item = &'a String>,
    malformed: &mut Vec<String>,
) -> Vec<Pattern> {
    patterns
        .filter_map(|raw| match Pattern::new(raw) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                malformed.push(format!("'{}' ({})", raw, e.msg));
                None
            }
        })
        .collect()
}
