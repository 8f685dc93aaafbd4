//! CMake file detection.

use std::path::Path;

/// Reserved project file name recognised regardless of extension.
pub const CMAKE_LISTS_FILE_NAME: &str = "CMakeLists.txt";

/// Extension (without the dot) of CMake script and module files.
pub const CMAKE_EXTENSION: &str = "cmake";

/// Glob patterns handed to editors when registering the formatting provider.
///
/// Matching is case-sensitive and restricted to the `file` scheme.
pub const DOCUMENT_PATTERNS: &[&str] = &["**/CMakeLists.txt", "**/*.cmake"];

/// Detected CMake file kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// `CMakeLists.txt` project files
    CMakeLists,
    /// `*.cmake` scripts and modules
    CMakeScript,
    /// Anything else
    Unknown,
}

impl FileType {
    pub fn is_cmake(self) -> bool {
        !matches!(self, FileType::Unknown)
    }
}

/// Detect the file type from the final path segment.
///
/// The comparison is byte-exact: `cmakelists.txt`, `foo.CMake` and
/// `xCMakeLists.txt` are all [`FileType::Unknown`].
pub fn detect_file_type(path: &Path) -> FileType {
    if path.file_name().and_then(|n| n.to_str()) == Some(CMAKE_LISTS_FILE_NAME) {
        return FileType::CMakeLists;
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some(CMAKE_EXTENSION) => FileType::CMakeScript,
        _ => FileType::Unknown,
    }
}

/// Returns true if `path` belongs to the CMake dialect.
pub fn is_cmake_file(path: impl AsRef<Path>) -> bool {
    detect_file_type(path.as_ref()).is_cmake()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cmake_lists_detected() {
        assert_eq!(
            detect_file_type(Path::new("/project/CMakeLists.txt")),
            FileType::CMakeLists
        );
        assert_eq!(
            detect_file_type(Path::new("CMakeLists.txt")),
            FileType::CMakeLists
        );
    }

    #[test]
    fn test_cmake_extension_detected() {
        assert_eq!(
            detect_file_type(Path::new("cmake/FindFoo.cmake")),
            FileType::CMakeScript
        );
        assert_eq!(
            detect_file_type(Path::new("toolchain.arm.cmake")),
            FileType::CMakeScript
        );
    }

    #[test]
    fn test_case_sensitive_rejections() {
        assert!(!is_cmake_file("cmakelists.txt"));
        assert!(!is_cmake_file("CMAKELISTS.TXT"));
        assert!(!is_cmake_file("foo.CMake"));
        assert!(!is_cmake_file("foo.CMAKE"));
    }

    #[test]
    fn test_near_misses_rejected() {
        assert!(!is_cmake_file("xCMakeLists.txt"));
        assert!(!is_cmake_file("CMakeLists.txt.bak"));
        assert!(!is_cmake_file("foo.cmake.in"));
        assert!(!is_cmake_file("cmake"));
        assert!(!is_cmake_file("Makefile"));
    }

    #[test]
    fn test_hidden_file_named_extension_is_not_cmake() {
        // `.cmake` has no extension, only a file stem
        assert!(!is_cmake_file(".cmake"));
        assert!(!is_cmake_file("dir/.cmake"));
    }

    #[test]
    fn test_directory_named_cmake_lists_is_matched_by_name_only() {
        assert!(is_cmake_file("a/b/CMakeLists.txt"));
        assert!(!is_cmake_file("CMakeLists.txt/inner.txt"));
    }

    proptest! {
        #[test]
        fn prop_any_stem_with_cmake_extension_matches(stem in "[A-Za-z0-9_-]{1,16}") {
            let name = format!("{stem}.cmake");
            prop_assert!(is_cmake_file(&name));
        }

        #[test]
        fn prop_other_extensions_never_match(
            stem in "[A-Za-z0-9_-]{1,16}",
            ext in "[a-z]{1,6}",
        ) {
            prop_assume!(ext != CMAKE_EXTENSION);
            let name = format!("{stem}.{ext}");
            prop_assume!(name != CMAKE_LISTS_FILE_NAME);
            prop_assert!(!is_cmake_file(&name));
        }

        #[test]
        fn prop_classification_ignores_directories(dir in "[A-Za-z0-9_]{1,12}") {
            let lists = format!("{dir}/CMakeLists.txt");
            let module = format!("{dir}/Module.cmake");
            let other = format!("{dir}/cmakelists.txt");
            prop_assert!(is_cmake_file(&lists));
            prop_assert!(is_cmake_file(&module));
            prop_assert!(!is_cmake_file(&other));
        }
    }
}
