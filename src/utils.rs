/*!
 * Utility functions for collectfs
 */

use std::path::Path;

use walkdir::WalkDir;

use crate::patterns::PatternSet;

/// Count matched files for progress tracking, applying the same
/// pruning and filtering as the collection pass
pub fn count_files(root: &Path, patterns: &PatternSet) -> u64 {
    let mut count = 0;
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
    {
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_dir() {
            if patterns.should_descend(&name) {
                count += count_files(entry.path(), patterns);
            }
        } else if patterns.matches_file(&name) {
            count += 1;
        }
    }
    count
}
