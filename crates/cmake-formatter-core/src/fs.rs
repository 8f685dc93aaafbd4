//! Filesystem abstraction for dependency injection.
//!
//! The coordinator checks that the configured executable exists before it
//! spawns anything. Production code uses [`RealFileSystem`]. Tests use
//! `MockFileSystem` to simulate an executable on disk without creating one:
//!
//! ```ignore
//! let mock = MockFileSystem::new();
//! mock.add_file("/usr/bin/cmake-format");
//! assert!(mock.exists(Path::new("/usr/bin/cmake-format")));
//! ```

use std::path::Path;

/// Trait abstracting the filesystem queries made by format operations.
pub trait FileSystem: Send + Sync + std::fmt::Debug {
    /// Check if a path exists (file or directory).
    fn exists(&self, path: &Path) -> bool;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
pub mod mock {
    //! In-memory filesystem for coordinator tests.

    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct MockFileSystem {
        paths: Mutex<HashSet<PathBuf>>,
    }

    impl MockFileSystem {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_file(&self, path: impl AsRef<Path>) {
            self.paths
                .lock()
                .unwrap()
                .insert(path.as_ref().to_path_buf());
        }
    }

    impl FileSystem for MockFileSystem {
        fn exists(&self, path: &Path) -> bool {
            self.paths.lock().unwrap().contains(path)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_mock_exists_after_add() {
            let mock = MockFileSystem::new();
            assert!(!mock.exists(Path::new("/bin/cmake-format")));

            mock.add_file("/bin/cmake-format");
            assert!(mock.exists(Path::new("/bin/cmake-format")));
            assert!(!mock.exists(Path::new("/bin/cmake")));
        }
    }
}
