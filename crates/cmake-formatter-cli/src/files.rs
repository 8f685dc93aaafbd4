//! Input path expansion.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use cmake_formatter_core::is_cmake_file;
use ignore::WalkBuilder;

/// Expand the command-line paths into the files to format.
///
/// Directories are walked recursively, honouring `.gitignore` and `.ignore`
/// files, and contribute only CMake files. Files named explicitly are kept
/// as given so that a non-CMake file is reported instead of silently
/// dropped. The result is sorted and free of duplicates.
pub fn collect_files(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();

    for path in paths {
        if path.is_dir() {
            walk_directory(path, &mut files)?;
        } else {
            files.insert(path.clone());
        }
    }

    Ok(files.into_iter().collect())
}

fn walk_directory(root: &Path, files: &mut BTreeSet<PathBuf>) -> anyhow::Result<()> {
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .require_git(false)
        .build();

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_some_and(|t| t.is_file()) && is_cmake_file(entry.path()) {
            files.insert(entry.into_path());
        }
    }
    Ok(())
}
