// File System Probe Port
// Read-only existence checks used to detect a development checkout

use std::path::{Path, PathBuf};

/// File system probe interface (allows mocking in tests)
///
/// Probes never fail: a path that cannot be inspected is reported as absent.
pub trait FileSystemProbe: Send + Sync {
    /// True if `path` exists and is a regular file
    fn is_file(&self, path: &Path) -> bool;

    /// True if `path` exists and is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Absolute path with symlinks and `..` resolved, `None` if it does not exist
    fn canonicalize(&self, path: &Path) -> Option<PathBuf>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::{HashMap, HashSet};

    /// In-memory file system
    ///
    /// Paths are canonicalized lexically (`..` pops a component); registered
    /// links map a path prefix to its target.
    #[derive(Default)]
    pub struct MockFileSystem {
        files: HashSet<PathBuf>,
        dirs: HashSet<PathBuf>,
        links: HashMap<PathBuf, PathBuf>,
    }

    impl MockFileSystem {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a file and all of its ancestor directories
        pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
            let path = path.into();
            self.add_ancestors(&path);
            self.files.insert(path);
            self
        }

        /// Register a directory and all of its ancestors
        pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
            let path = path.into();
            self.add_ancestors(&path);
            self.dirs.insert(path);
            self
        }

        /// Make `link` resolve to `target`
        pub fn with_link(mut self, link: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
            self.links.insert(link.into(), target.into());
            self
        }

        fn add_ancestors(&mut self, path: &Path) {
            for ancestor in path.ancestors().skip(1) {
                if !ancestor.as_os_str().is_empty() {
                    self.dirs.insert(ancestor.to_path_buf());
                }
            }
        }

        fn normalize(&self, path: &Path) -> PathBuf {
            let mut out = PathBuf::new();
            for component in path.components() {
                match component {
                    std::path::Component::ParentDir => {
                        out.pop();
                    }
                    std::path::Component::CurDir => {}
                    other => out.push(other.as_os_str()),
                }
                if let Some(target) = self.links.get(&out) {
                    out = target.clone();
                }
            }
            out
        }
    }

    impl FileSystemProbe for MockFileSystem {
        fn is_file(&self, path: &Path) -> bool {
            self.files.contains(&self.normalize(path))
        }

        fn is_dir(&self, path: &Path) -> bool {
            self.dirs.contains(&self.normalize(path))
        }

        fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
            let normalized = self.normalize(path);
            if self.files.contains(&normalized) || self.dirs.contains(&normalized) {
                Some(normalized)
            } else {
                None
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_mock_ancestors_and_links() {
            let fs = MockFileSystem::new()
                .with_file("/src/proj/setup.py")
                .with_link("/link", "/src/proj");

            assert!(fs.is_dir(Path::new("/src")));
            assert!(fs.is_file(Path::new("/link/setup.py")));
            assert_eq!(fs.canonicalize(Path::new("/src/other")), None);
            assert_eq!(
                fs.canonicalize(Path::new("/link/../proj")),
                Some(PathBuf::from("/src/proj"))
            );
        }
    }
}
