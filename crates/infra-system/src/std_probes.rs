// File system and environment probes backed by std
use std::path::{Path, PathBuf};

use dmri_testkit_core::port::{EnvironmentProbe, FileSystemProbe};

/// Probes the real file system
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileSystem;

impl FileSystemProbe for StdFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        std::fs::canonicalize(path).ok()
    }
}

/// Reads the environment of the running process
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl EnvironmentProbe for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn current_dir(&self) -> Option<PathBuf> {
        std::env::current_dir().ok()
    }
}
