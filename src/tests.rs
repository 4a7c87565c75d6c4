/*!
 * Tests for collectfs functionality
 */

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use indicatif::ProgressBar;
use tempfile::tempdir;

use crate::config::{ConfigRecord, PatternEdit, DEFAULT_IGNORE_FILE, DEFAULT_OUTPUT_FILE};
use crate::error::{CollectFsError, Result};
use crate::patterns::PatternSet;
use crate::resolver::{self, resolve, Scope};
use crate::scanner::{ScanStatistics, Scanner};
use crate::store::ConfigStore;
use crate::writer::ReportWriter;

// Store whose global configuration lives in its own temp directory
fn test_store(root: &Path, global_dir: &Path) -> ConfigStore {
    ConfigStore::with_global_path(root, global_dir.join("config.json"))
}

fn record_with(includes: &[&str], exclude_dirs: &[&str]) -> ConfigRecord {
    let mut record = ConfigRecord::default();
    for pattern in includes {
        record.include_patterns.push(pattern.to_string());
    }
    for pattern in exclude_dirs {
        record.exclude_dirs.insert(pattern.to_string());
    }
    record.normalize();
    record
}

// One full collection pass: scan, write, read the report back
fn run_collection(root: &Path, record: &ConfigRecord) -> (ScanStatistics, String) {
    let patterns = PatternSet::compile(record).unwrap();
    let mut scanner = Scanner::new(root, patterns, ProgressBar::hidden());
    let tree = scanner.scan().unwrap();

    let output_path = root.join(&record.output_file);
    ReportWriter::new(&output_path).write(&tree).unwrap();

    let content = fs::read_to_string(&output_path).unwrap();
    (scanner.statistics().clone(), content)
}

// Helper to create the a.py / b.png / build/c.py fixture
fn setup_collection_fixture(root: &Path) {
    let mut py_file = File::create(root.join("a.py")).unwrap();
    writeln!(py_file, "print('hello from a')").unwrap();

    let mut png_file = File::create(root.join("b.png")).unwrap();
    png_file.write_all(&[0x89, 0x50, 0x4e, 0x47, 0x00, 0xff]).unwrap();

    fs::create_dir(root.join("build")).unwrap();
    let mut built = File::create(root.join("build").join("c.py")).unwrap();
    writeln!(built, "print('generated')").unwrap();
}

#[test]
fn test_resolution_table() {
    // Every corner of (use_global, permanent, local_exists)
    let cases = [
        (false, false, false, Scope::Global, false),
        (false, false, true, Scope::Local, false),
        (false, true, false, Scope::Local, true),
        (false, true, true, Scope::Local, false),
        (true, false, false, Scope::Global, false),
        (true, false, true, Scope::Global, false),
        (true, true, false, Scope::Global, false),
        (true, true, true, Scope::Global, false),
    ];

    for (use_global, permanent, local_exists, scope, seed_local) in cases {
        let resolution = resolve(use_global, permanent, local_exists);
        assert_eq!(
            resolution.scope, scope,
            "scope mismatch for ({}, {}, {})",
            use_global, permanent, local_exists
        );
        assert_eq!(
            resolution.seed_local, seed_local,
            "seed mismatch for ({}, {}, {})",
            use_global, permanent, local_exists
        );
    }
}

#[test]
fn test_self_exclusion_invariant() {
    let record = ConfigRecord::default();
    assert!(record.exclude_files.contains(DEFAULT_OUTPUT_FILE));
    assert!(record.exclude_files.contains(DEFAULT_IGNORE_FILE));
}

#[test]
fn test_self_exclusion_survives_removal() {
    let mut record = ConfigRecord::default();
    record.apply(&PatternEdit::RemoveExclude(DEFAULT_OUTPUT_FILE.to_string()));
    record.apply(&PatternEdit::RemoveExclude(DEFAULT_IGNORE_FILE.to_string()));

    assert!(record.exclude_files.contains(DEFAULT_OUTPUT_FILE));
    assert!(record.exclude_files.contains(DEFAULT_IGNORE_FILE));
}

#[test]
fn test_remove_nonexistent_pattern_is_noop() {
    let mut record = record_with(&["*.py"], &[]);
    let before = record.clone();

    record.apply(&PatternEdit::RemoveInclude("*.zz".to_string()));
    record.apply(&PatternEdit::RemoveExclude("*.zz".to_string()));

    assert_eq!(record, before);
}

#[test]
fn test_permanent_include_is_idempotent() -> Result<()> {
    let root = tempdir()?;
    let global_dir = tempdir()?;
    let store = test_store(root.path(), global_dir.path());
    store.write_global(&ConfigRecord::default())?;

    let edit = PatternEdit::AddInclude("*.py".to_string());
    resolver::load_effective(&store, false, true, Some(&edit))?;
    resolver::load_effective(&store, false, true, Some(&edit))?;

    let (record, exists) = store.read_local()?;
    assert!(exists);
    let occurrences = record
        .include_patterns
        .iter()
        .filter(|p| p.as_str() == "*.py")
        .count();
    assert_eq!(occurrences, 1);

    Ok(())
}

#[test]
fn test_local_round_trip() -> Result<()> {
    let root = tempdir()?;
    let store = test_store(root.path(), root.path());

    let mut record = ConfigRecord::default();
    record.include_patterns.push("*.rs".to_string());
    record.include_patterns.push("*.toml".to_string());
    record.exclude_files.insert("*.lock".to_string());
    record.exclude_dirs.insert("target".to_string());
    record.normalize();

    store.write_local(&record)?;
    let (loaded, exists) = store.read_local()?;

    assert!(exists);
    assert_eq!(loaded, record);

    Ok(())
}

#[test]
fn test_read_global_absent_degrades_to_defaults() -> Result<()> {
    let root = tempdir()?;
    let global_dir = tempdir()?;
    let store = test_store(root.path(), global_dir.path());

    let record = store.read_global()?;
    assert_eq!(record, ConfigRecord::default());

    Ok(())
}

#[test]
fn test_ephemeral_prefers_local_when_present() -> Result<()> {
    let root = tempdir()?;
    let global_dir = tempdir()?;
    let store = test_store(root.path(), global_dir.path());

    store.write_global(&record_with(&["*.md"], &[]))?;
    store.write_local(&record_with(&["*.py"], &[]))?;

    let record = resolver::load_effective(&store, false, false, None)?;
    assert_eq!(record.include_patterns, vec!["*.py".to_string()]);

    Ok(())
}

#[test]
fn test_ephemeral_falls_back_to_global() -> Result<()> {
    let root = tempdir()?;
    let global_dir = tempdir()?;
    let store = test_store(root.path(), global_dir.path());

    store.write_global(&record_with(&["*.md"], &[]))?;

    let record = resolver::load_effective(&store, false, false, None)?;
    assert_eq!(record.include_patterns, vec!["*.md".to_string()]);
    // An ephemeral run never creates local storage
    assert!(!store.local_exists());

    Ok(())
}

#[test]
fn test_permanent_edit_seeds_local_from_global() -> Result<()> {
    let root = tempdir()?;
    let global_dir = tempdir()?;
    let store = test_store(root.path(), global_dir.path());

    store.write_global(&record_with(&["*.md"], &[]))?;
    assert!(!store.local_exists());

    let edit = PatternEdit::AddInclude("*.py".to_string());
    resolver::load_effective(&store, false, true, Some(&edit))?;

    // Local storage now exists and carries the seeded global content
    // plus the applied edit
    assert!(store.local_exists());
    let (local, _) = store.read_local()?;
    assert!(local.include_patterns.contains(&"*.md".to_string()));
    assert!(local.include_patterns.contains(&"*.py".to_string()));

    // A subsequent plain run resolves to the new local record
    let record = resolver::load_effective(&store, false, false, None)?;
    assert_eq!(record.include_patterns, local.include_patterns);

    Ok(())
}

#[test]
fn test_global_flag_leaves_local_untouched() -> Result<()> {
    let root = tempdir()?;
    let global_dir = tempdir()?;
    let store = test_store(root.path(), global_dir.path());

    store.write_global(&ConfigRecord::default())?;
    store.write_local(&record_with(&["*.html"], &[]))?;
    let local_before = fs::read(store.local_path())?;

    let edit = PatternEdit::AddInclude("*.c".to_string());
    resolver::load_effective(&store, true, true, Some(&edit))?;

    let local_after = fs::read(store.local_path())?;
    assert_eq!(local_before, local_after);

    let global = store.read_global()?;
    assert!(global.include_patterns.contains(&"*.c".to_string()));

    Ok(())
}

#[test]
fn test_seed_without_global_fails() {
    let root = tempdir().unwrap();
    let global_dir = tempdir().unwrap();
    let store = test_store(root.path(), global_dir.path());

    let edit = PatternEdit::AddInclude("*.py".to_string());
    let err = resolver::load_effective(&store, false, true, Some(&edit)).unwrap_err();

    match err {
        CollectFsError::Config(msg) => {
            assert!(msg.contains("cannot seed local config"));
        }
        other => panic!("expected Config error, got {:?}", other),
    }

    // The run aborted before anything was written
    assert!(!store.local_exists());
    assert!(!root.path().join(DEFAULT_OUTPUT_FILE).exists());
}

#[test]
fn test_malformed_globs_reported_together() {
    let mut record = record_with(&["[unclosed", "*.py"], &[]);
    record.exclude_files.insert("[alsobad".to_string());

    let err = PatternSet::compile(&record).unwrap_err();
    match err {
        CollectFsError::Pattern(msg) => {
            assert!(msg.contains("[unclosed"));
            assert!(msg.contains("[alsobad"));
        }
        other => panic!("expected Pattern error, got {:?}", other),
    }
}

#[test]
fn test_matches_file_semantics() {
    let mut record = record_with(&["*.py"], &[]);
    record.exclude_files.insert("test_*".to_string());
    let patterns = PatternSet::compile(&record).unwrap();

    assert!(patterns.matches_file("a.py"));
    assert!(!patterns.matches_file("test_a.py"));
    assert!(!patterns.matches_file("a.txt"));
}

#[test]
fn test_empty_include_list_matches_nothing() {
    let record = ConfigRecord::default();
    let patterns = PatternSet::compile(&record).unwrap();

    assert!(!patterns.matches_file("a.py"));
    assert!(!patterns.matches_file("anything"));
}

#[test]
fn test_should_descend_exact_and_glob() {
    let record = record_with(&["*.py"], &["build", "cache*"]);
    let patterns = PatternSet::compile(&record).unwrap();

    assert!(!patterns.should_descend("build"));
    assert!(!patterns.should_descend("cache_v2"));
    assert!(patterns.should_descend("src"));
}

#[test]
fn test_pruned_directory_contributes_nothing() {
    let temp_dir = tempdir().unwrap();
    setup_collection_fixture(temp_dir.path());

    let record = record_with(&["*.py"], &["build"]);
    let (stats, content) = run_collection(temp_dir.path(), &record);

    assert_eq!(stats.files_collected, 1);
    assert!(content.contains("a.py"));
    assert!(!content.contains("c.py"));
}

#[test]
fn test_collection_scenario() {
    let temp_dir = tempdir().unwrap();
    setup_collection_fixture(temp_dir.path());

    let record = record_with(&["*.py"], &["build"]);
    let (stats, content) = run_collection(temp_dir.path(), &record);

    // Two-part structure: tree section first, then marked contents
    assert!(content.starts_with("File Structure:"));
    assert!(content.contains("----- START OF a.py -----"));
    assert!(content.contains("print('hello from a')"));
    assert!(content.contains("----- END OF a.py -----"));
    assert!(!content.contains("b.png"));
    assert!(!content.contains("c.py"));
    assert_eq!(stats.files_collected, 1);
    assert_eq!(stats.files_skipped, 0);
}

#[test]
fn test_output_and_config_never_collected() {
    let temp_dir = tempdir().unwrap();
    setup_collection_fixture(temp_dir.path());

    // Leftovers from a previous run and a local config file
    fs::write(temp_dir.path().join(DEFAULT_OUTPUT_FILE), "stale report").unwrap();
    fs::write(temp_dir.path().join(DEFAULT_IGNORE_FILE), "{}").unwrap();

    // Even a catch-all include must not collect them
    let record = record_with(&["*"], &["build"]);
    let (_, content) = run_collection(temp_dir.path(), &record);

    assert!(!content.contains(&format!("START OF {}", DEFAULT_OUTPUT_FILE)));
    assert!(!content.contains(&format!("START OF {}", DEFAULT_IGNORE_FILE)));
    assert!(content.contains("----- START OF a.py -----"));
}

#[test]
fn test_unreadable_content_is_skipped_not_fatal() {
    let temp_dir = tempdir().unwrap();
    let mut bin_file = File::create(temp_dir.path().join("blob.bin")).unwrap();
    // Invalid UTF-8, so content reading fails while the name matches
    bin_file.write_all(&[0x00, 0x9f, 0x92, 0x96]).unwrap();

    let record = record_with(&["*.bin"], &[]);
    let (stats, content) = run_collection(temp_dir.path(), &record);

    assert_eq!(stats.files_collected, 0);
    assert_eq!(stats.files_skipped, 1);
    assert!(content.starts_with("File Structure:"));
    assert!(!content.contains("START OF blob.bin"));
}

#[test]
fn test_nested_files_use_relative_paths() {
    let temp_dir = tempdir().unwrap();
    fs::create_dir(temp_dir.path().join("src")).unwrap();
    let mut lib_file = File::create(temp_dir.path().join("src").join("lib.rs")).unwrap();
    writeln!(lib_file, "pub fn answer() -> u32 {{ 42 }}").unwrap();

    let record = record_with(&["*.rs"], &[]);
    let (stats, content) = run_collection(temp_dir.path(), &record);

    assert_eq!(stats.files_collected, 1);
    assert!(content.contains("src/"));
    assert!(content.contains("----- START OF src/lib.rs -----"));
    assert!(content.contains("pub fn answer()"));
}

#[test]
fn test_report_statistics() {
    let temp_dir = tempdir().unwrap();
    let mut py_file = File::create(temp_dir.path().join("a.py")).unwrap();
    writeln!(py_file, "line one").unwrap();
    writeln!(py_file, "line two").unwrap();

    let record = record_with(&["*.py"], &[]);
    let (stats, _) = run_collection(temp_dir.path(), &record);

    assert_eq!(stats.total_lines, 2);
    assert!(stats.total_chars > 0);
    assert!(stats.file_details.contains_key("a.py"));
    assert_eq!(stats.file_details["a.py"].lines, 2);
}

#[test]
fn test_corrupt_local_config_is_storage_error() {
    let root = tempdir().unwrap();
    let global_dir = tempdir().unwrap();
    let store = test_store(root.path(), global_dir.path());

    fs::write(store.local_path(), "not json at all").unwrap();
    let err = store.read_local().unwrap_err();

    assert!(matches!(err, CollectFsError::Storage(_)));
}

#[test]
fn test_write_into_missing_parent_is_storage_error() {
    let root = tempdir().unwrap();
    let store = ConfigStore::with_global_path(
        root.path(),
        root.path().join("no_such_dir").join("config.json"),
    );

    let err = store.write_global(&ConfigRecord::default()).unwrap_err();
    assert!(matches!(err, CollectFsError::Storage(_)));
}
