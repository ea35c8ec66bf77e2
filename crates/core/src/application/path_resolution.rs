// Development checkout detection
use crate::domain::{ResolvedPaths, RunnerConfig};
use crate::port::{EnvironmentProbe, FileSystemProbe};
use std::path::PathBuf;
use tracing::debug;

/// Resolve both development paths for `config`
pub fn resolve_paths(
    config: &RunnerConfig,
    fs: &dyn FileSystemProbe,
    env: &dyn EnvironmentProbe,
) -> ResolvedPaths {
    let paths = ResolvedPaths {
        local_script_dir: local_script_dir(config, fs),
        local_module_dir: local_module_dir(config, fs, env),
    };

    debug!(
        package_dir = ?config.package_dir,
        module_package_dir = ?config.module_package_dir,
        local_script_dir = ?paths.local_script_dir,
        local_module_dir = ?paths.local_module_dir,
        "Development paths resolved"
    );

    paths
}

/// Script directory of the source checkout the package runs from, if any
///
/// The parent of the package directory (after resolving links) must hold a
/// build marker file and a `script_subdir` directory.
pub fn local_script_dir(config: &RunnerConfig, fs: &dyn FileSystemProbe) -> Option<PathBuf> {
    let package_dir = config.package_dir.as_ref()?;
    let above_us = fs.canonicalize(&package_dir.join(".."))?;

    let has_marker = config
        .build_markers
        .iter()
        .any(|marker| fs.is_file(&above_us.join(marker)));
    let script_dir = above_us.join(&config.script_subdir);

    if has_marker && fs.is_dir(&script_dir) {
        fs.canonicalize(&script_dir)
    } else {
        None
    }
}

/// Directory containing the package, if it is the working directory
///
/// Uses `module_package_dir` when set, otherwise `package_dir`.
pub fn local_module_dir(
    config: &RunnerConfig,
    fs: &dyn FileSystemProbe,
    env: &dyn EnvironmentProbe,
) -> Option<PathBuf> {
    let package_dir = config.module_dir_source()?;
    let containing = fs.canonicalize(package_dir)?.parent()?.to_path_buf();

    let cwd = config
        .working_dir
        .clone()
        .or_else(|| env.current_dir())?;
    let cwd = fs.canonicalize(&cwd)?;

    (containing == cwd).then_some(containing)
}
