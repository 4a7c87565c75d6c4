/*!
 * Configuration handling for collectfs
 */

use std::collections::BTreeSet;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

/// Default name of the collection report
pub const DEFAULT_OUTPUT_FILE: &str = "allfiles.txt";

/// Default name of the local configuration file
pub const DEFAULT_IGNORE_FILE: &str = ".gptignore";

/// Fixed filename of the local configuration record at the collection root
pub const LOCAL_CONFIG_FILENAME: &str = ".gptignore";

/// Filename of the global configuration record inside the config directory
pub const GLOBAL_CONFIG_FILENAME: &str = "config.json";

/// Command-line arguments for collectfs
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "collectfs",
    version = env!("CARGO_PKG_VERSION"),
    about = "Collect a directory's source files into a single annotated text report",
    long_about = "Walks a directory tree, filters files through configurable include/exclude \
                  glob patterns, and concatenates the survivors into one text report (tree \
                  section followed by per-file content sections) for use as LLM context."
)]
pub struct Args {
    /// Target directory to collect
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// Operate on the global configuration, ignoring any local one
    #[clap(long = "global-config", visible_alias = "use-global-config", global = true)]
    pub global_config: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

/// Pattern-management subcommands; each performs a collection pass
/// afterwards except the pure listing commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Perform one collection pass with the resolved configuration
    Run,

    /// Add a pattern to the include list (e.g. '*.py')
    Include {
        pattern: String,
        /// Persist the change to the authoritative configuration
        #[clap(long)]
        permanent: bool,
    },

    /// Add a pattern to the exclude-files set (e.g. '*.png')
    Exclude {
        pattern: String,
        /// Persist the change to the authoritative configuration
        #[clap(long)]
        permanent: bool,
    },

    /// Remove a pattern from the include list
    RemoveInclude {
        pattern: String,
        /// Persist the change to the authoritative configuration
        #[clap(long)]
        permanent: bool,
    },

    /// Remove a pattern from the exclude-files set
    RemoveExclude {
        pattern: String,
        /// Persist the change to the authoritative configuration
        #[clap(long)]
        permanent: bool,
    },

    /// List the resolved include patterns
    ListIncludes,

    /// List the resolved exclude-files patterns
    ListExcludes,
}

impl Command {
    /// Whether the subcommand requests a persisted change
    pub fn permanent(&self) -> bool {
        match self {
            Command::Include { permanent, .. }
            | Command::Exclude { permanent, .. }
            | Command::RemoveInclude { permanent, .. }
            | Command::RemoveExclude { permanent, .. } => *permanent,
            _ => false,
        }
    }

    /// The pattern edit this subcommand carries, if any
    pub fn edit(&self) -> Option<PatternEdit> {
        match self {
            Command::Include { pattern, .. } => Some(PatternEdit::AddInclude(pattern.clone())),
            Command::Exclude { pattern, .. } => Some(PatternEdit::AddExclude(pattern.clone())),
            Command::RemoveInclude { pattern, .. } => {
                Some(PatternEdit::RemoveInclude(pattern.clone()))
            }
            Command::RemoveExclude { pattern, .. } => {
                Some(PatternEdit::RemoveExclude(pattern.clone()))
            }
            _ => None,
        }
    }

    /// Listing commands mutate nothing and perform no collection pass
    pub fn is_listing(&self) -> bool {
        matches!(self, Command::ListIncludes | Command::ListExcludes)
    }
}

/// A single CLI-supplied change to the pattern fields of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternEdit {
    AddInclude(String),
    RemoveInclude(String),
    AddExclude(String),
    RemoveExclude(String),
}

/// The persisted or ephemeral configuration settings for one invocation
///
/// Includes keep insertion order for display and reject duplicates on
/// insert; both exclude fields are sets. The record is rebuilt from
/// storage every run and never cached across invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    /// Name of the report file, resolved against the collection root
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Name of the local configuration file, used for self-exclusion
    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,

    /// Glob patterns a file name must match to be collected
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Glob patterns that exclude a matched file
    #[serde(default)]
    pub exclude_files: BTreeSet<String>,

    /// Names or glob patterns of directories that are never descended into
    #[serde(default)]
    pub exclude_dirs: BTreeSet<String>,
}

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

fn default_ignore_file() -> String {
    DEFAULT_IGNORE_FILE.to_string()
}

impl Default for ConfigRecord {
    fn default() -> Self {
        let mut record = Self {
            output_file: default_output_file(),
            ignore_file: default_ignore_file(),
            include_patterns: Vec::new(),
            exclude_files: BTreeSet::new(),
            exclude_dirs: BTreeSet::new(),
        };
        record.normalize();
        record
    }
}

impl ConfigRecord {
    /// Enforce the self-exclusion invariant: the report and the local
    /// configuration file are never collectable, no matter what edits
    /// were applied
    pub fn normalize(&mut self) {
        self.exclude_files.insert(self.output_file.clone());
        self.exclude_files.insert(self.ignore_file.clone());
    }

    /// Apply one pattern edit to the in-memory record
    ///
    /// Adding an include that is already present is a no-op, as is
    /// removing a pattern that does not exist.
    pub fn apply(&mut self, edit: &PatternEdit) {
        match edit {
            PatternEdit::AddInclude(pattern) => {
                if !self.include_patterns.contains(pattern) {
                    self.include_patterns.push(pattern.clone());
                }
            }
            PatternEdit::RemoveInclude(pattern) => {
                self.include_patterns.retain(|p| p != pattern);
            }
            PatternEdit::AddExclude(pattern) => {
                self.exclude_files.insert(pattern.clone());
            }
            PatternEdit::RemoveExclude(pattern) => {
                self.exclude_files.remove(pattern);
            }
        }
        self.normalize();
    }
}
