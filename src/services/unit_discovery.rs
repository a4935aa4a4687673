//! Finds the source files of a project to analyze.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::models::AnalysisUnit;

/// Default extension of analyzable sources.
pub const DEFAULT_EXTENSION: &str = "java";

/// Directories that never contain sources worth analyzing.
const SKIPPED_DIRS: &[&str] = &[".git", "target", "build", "node_modules", ".gradle", ".idea"];

/// Collect every file under `root` with `extension`, sorted by file name.
///
/// Ties on file name are broken by full path so the order is stable.
pub fn discover_units(root: &Path, extension: &str) -> Vec<AnalysisUnit> {
    discover_paths(root, extension)
        .into_iter()
        .map(AnalysisUnit::from_path)
        .collect()
}

pub fn discover_paths(root: &Path, extension: &str) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| SKIPPED_DIRS.contains(&name))
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable path");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .collect();

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
    debug!(root = %root.display(), count = paths.len(), "discovered source files");
    paths
}
