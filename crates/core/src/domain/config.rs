// Runner configuration and resolved development paths

use std::path::{Path, PathBuf};

use super::output::OutputProcessor;
use super::platform::HostPlatform;

/// Directory holding scripts in a development checkout
pub const DEFAULT_SCRIPT_SUBDIR: &str = "scripts";

/// Build-configuration file marking the root of an un-installed source tree
pub const DEFAULT_BUILD_MARKER: &str = "setup.py";

/// Module search-path variable extended for local modules
pub const DEFAULT_MODULE_PATH_VAR: &str = "PYTHONPATH";

/// Suffix of the derived debug toggle variable (`{MODULE}_DEBUG_PRINT`)
pub const DEBUG_PRINT_VAR_SUFFIX: &str = "_DEBUG_PRINT";

/// Extension of installed console entry points on Windows
pub const WINDOWS_SHIM_EXTENSION: &str = ".bat";

/// Interpreter used to run development-tree scripts
pub const DEFAULT_INTERPRETER: &str = if cfg!(windows) { "python" } else { "python3" };

/// ScriptRunner configuration
///
/// Locations that a dynamic runtime would discover by introspection
/// (`package_dir`, `working_dir`, `interpreter`) are supplied explicitly.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub script_subdir: String,
    /// Name of the top-level package; also derives the debug toggle name
    pub module_subdir: String,
    /// Explicit debug toggle name; `None` derives `{MODULE_SUBDIR}_DEBUG_PRINT`
    pub debug_print_var: Option<String>,
    pub output_processor: OutputProcessor,
    /// Directory of the loaded top-level package. `None` means nothing is local.
    pub package_dir: Option<PathBuf>,
    /// Directory of the `module_subdir` package when it is not the one at
    /// `package_dir`; `None` reuses `package_dir` for the module search path
    pub module_package_dir: Option<PathBuf>,
    /// Compared against the module's parent directory; `None` uses the process cwd
    pub working_dir: Option<PathBuf>,
    pub interpreter: PathBuf,
    pub build_markers: Vec<String>,
    pub module_path_var: String,
    pub platform: HostPlatform,
}

impl RunnerConfig {
    /// Create a configuration for the package named `module_subdir`
    ///
    /// # Example
    /// ```text
    /// let config = RunnerConfig::new("afq")
    ///     .with_package_dir("/src/pyAFQ/afq")
    ///     .with_output_processor(OutputProcessor::trim());
    /// ```
    pub fn new(module_subdir: impl Into<String>) -> Self {
        Self {
            script_subdir: DEFAULT_SCRIPT_SUBDIR.to_string(),
            module_subdir: module_subdir.into(),
            debug_print_var: None,
            output_processor: OutputProcessor::identity(),
            package_dir: None,
            module_package_dir: None,
            working_dir: None,
            interpreter: PathBuf::from(DEFAULT_INTERPRETER),
            build_markers: vec![DEFAULT_BUILD_MARKER.to_string()],
            module_path_var: DEFAULT_MODULE_PATH_VAR.to_string(),
            platform: HostPlatform::current(),
        }
    }

    pub fn with_script_subdir(mut self, script_subdir: impl Into<String>) -> Self {
        self.script_subdir = script_subdir.into();
        self
    }

    pub fn with_debug_print_var(mut self, var: impl Into<String>) -> Self {
        self.debug_print_var = Some(var.into());
        self
    }

    pub fn with_output_processor(mut self, processor: OutputProcessor) -> Self {
        self.output_processor = processor;
        self
    }

    pub fn with_package_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.package_dir = Some(dir.into());
        self
    }

    pub fn with_module_package_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.module_package_dir = Some(dir.into());
        self
    }

    /// Directory whose parent may go on the module search path
    pub fn module_dir_source(&self) -> Option<&Path> {
        self.module_package_dir
            .as_deref()
            .or(self.package_dir.as_deref())
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_interpreter(mut self, interpreter: impl Into<PathBuf>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn with_build_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.build_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_module_path_var(mut self, var: impl Into<String>) -> Self {
        self.module_path_var = var.into();
        self
    }

    pub fn with_platform(mut self, platform: HostPlatform) -> Self {
        self.platform = platform;
        self
    }

    /// Name of the environment variable toggling debug echo
    pub fn debug_print_var_name(&self) -> String {
        match &self.debug_print_var {
            Some(var) => var.clone(),
            None => format!(
                "{}{}",
                self.module_subdir.to_uppercase(),
                DEBUG_PRINT_VAR_SUFFIX
            ),
        }
    }
}

/// Development-tree locations, resolved once per runner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub local_script_dir: Option<PathBuf>,
    pub local_module_dir: Option<PathBuf>,
}

impl ResolvedPaths {
    pub fn local_script_dir(&self) -> Option<&Path> {
        self.local_script_dir.as_deref()
    }

    pub fn local_module_dir(&self) -> Option<&Path> {
        self.local_module_dir.as_deref()
    }
}
