// Command resolution: development script vs installed entry point
use crate::application::constants::WINDOWS_ARG_QUOTE;
use crate::domain::config::WINDOWS_SHIM_EXTENSION;
use crate::domain::{CommandLine, HostPlatform, ResolvedCommand, ResolvedPaths, RunnerConfig};
use crate::error::{Result, RunnerError};
use std::path::Path;

/// Build the invocation for `cmd`
///
/// `inherited_module_path` is the parent's current value of
/// `config.module_path_var`; it is only read, never written.
///
/// # Errors
/// - RunnerError::InvalidArgument if `cmd` is empty
pub fn resolve_command(
    cmd: &CommandLine,
    config: &RunnerConfig,
    paths: &ResolvedPaths,
    inherited_module_path: Option<&str>,
) -> Result<ResolvedCommand> {
    let argv = resolve_argv(cmd, config, paths.local_script_dir())?;

    let argv = if config.platform.is_windows() {
        quote_windows_args(argv)
    } else {
        argv
    };

    let env_overrides = paths
        .local_module_dir()
        .map(|module_dir| {
            let value = prepend_search_path(module_dir, inherited_module_path, config.platform);
            vec![(config.module_path_var.clone(), value)]
        })
        .unwrap_or_default();

    let mut argv = argv.into_iter();
    let program = argv
        .next()
        .ok_or_else(|| RunnerError::Internal("resolved command is empty".to_string()))?;

    Ok(ResolvedCommand {
        program,
        args: argv.collect(),
        env_overrides,
    })
}

/// Pick the executable: local script via the interpreter, `.bat` shim, or PATH lookup
fn resolve_argv(
    cmd: &CommandLine,
    config: &RunnerConfig,
    local_script_dir: Option<&Path>,
) -> Result<Vec<String>> {
    let (head, rest) = cmd
        .split_first()
        .ok_or_else(|| RunnerError::InvalidArgument("command must not be empty".to_string()))?;

    let mut argv = Vec::with_capacity(rest.len() + 2);

    if let Some(script_dir) = local_script_dir {
        // Development scripts may lack an exec bit, a usable shebang or an
        // extension the OS loader recognizes; run them through the interpreter.
        argv.push(config.interpreter.to_string_lossy().into_owned());
        argv.push(script_dir.join(head).to_string_lossy().into_owned());
    } else if config.platform.is_windows() {
        argv.push(format!("{}{}", head, WINDOWS_SHIM_EXTENSION));
    } else {
        argv.push(head.to_string());
    }

    argv.extend(rest.iter().cloned());
    Ok(argv)
}

/// Wrap every element containing a space in double quotes
pub fn quote_windows_args(argv: Vec<String>) -> Vec<String> {
    argv.into_iter()
        .map(|arg| {
            if arg.contains(' ') {
                format!("{q}{arg}{q}", q = WINDOWS_ARG_QUOTE)
            } else {
                arg
            }
        })
        .collect()
}

/// `module_dir` followed by the previous search path, if one was set
fn prepend_search_path(module_dir: &Path, previous: Option<&str>, platform: HostPlatform) -> String {
    let module_dir = module_dir.to_string_lossy();
    match previous {
        Some(previous) => format!("{}{}{}", module_dir, platform.path_separator(), previous),
        None => module_dir.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn installed() -> ResolvedPaths {
        ResolvedPaths::default()
    }

    fn development() -> ResolvedPaths {
        ResolvedPaths {
            local_script_dir: Some(PathBuf::from("/src/proj/scripts")),
            local_module_dir: Some(PathBuf::from("/src/proj")),
        }
    }

    fn posix() -> RunnerConfig {
        RunnerConfig::new("afq")
            .with_platform(HostPlatform::Posix)
            .with_interpreter("/usr/bin/python3")
    }

    fn windows() -> RunnerConfig {
        RunnerConfig::new("afq")
            .with_platform(HostPlatform::Windows)
            .with_interpreter("C:\\Program Files\\Python\\python.exe")
    }

    #[test]
    fn test_empty_command_is_invalid() {
        let cmd = CommandLine::new(Vec::<String>::new());
        let result = resolve_command(&cmd, &posix(), &installed(), None);

        assert!(matches!(result, Err(RunnerError::InvalidArgument(_))));
    }

    #[test]
    fn test_posix_installed_uses_path_lookup() {
        let cmd = CommandLine::from(["echo", "hi"]);
        let resolved = resolve_command(&cmd, &posix(), &installed(), None).unwrap();

        assert_eq!(resolved.program, "echo");
        assert_eq!(resolved.args, vec!["hi"]);
        assert!(resolved.env_overrides.is_empty());
    }

    #[test]
    fn test_development_script_runs_through_interpreter() {
        let cmd = CommandLine::from(["mytool", "--version"]);
        let resolved = resolve_command(&cmd, &posix(), &development(), None).unwrap();

        assert_eq!(
            resolved.argv(),
            vec!["/usr/bin/python3", "/src/proj/scripts/mytool", "--version"]
        );
    }

    #[test]
    fn test_windows_installed_appends_bat() {
        let cmd = CommandLine::from(["afq_run", "cfg.toml"]);
        let resolved = resolve_command(&cmd, &windows(), &installed(), None).unwrap();

        assert_eq!(resolved.program, "afq_run.bat");
        assert_eq!(resolved.args, vec!["cfg.toml"]);
    }

    #[test]
    fn test_windows_development_skips_bat() {
        let paths = ResolvedPaths {
            local_script_dir: Some(PathBuf::from("C:/src/scripts")),
            local_module_dir: None,
        };
        let cmd = CommandLine::from(["mytool"]);
        let resolved = resolve_command(&cmd, &windows(), &paths, None).unwrap();

        assert_eq!(resolved.program, "\"C:\\Program Files\\Python\\python.exe\"");
        assert!(!resolved.args[0].ends_with(".bat"));
    }

    #[test]
    fn test_windows_quotes_args_with_spaces() {
        let cmd = CommandLine::from(["afq_run", "my file.nii.gz", "plain"]);
        let resolved = resolve_command(&cmd, &windows(), &installed(), None).unwrap();

        assert_eq!(resolved.args, vec!["\"my file.nii.gz\"", "plain"]);
    }

    #[test]
    fn test_posix_leaves_spaces_unquoted() {
        let cmd = CommandLine::from(["afq_run", "my file.nii.gz"]);
        let resolved = resolve_command(&cmd, &posix(), &installed(), None).unwrap();

        assert_eq!(resolved.args, vec!["my file.nii.gz"]);
    }

    #[test]
    fn test_module_dir_sets_search_path() {
        let cmd = CommandLine::from("mytool");
        let resolved = resolve_command(&cmd, &posix(), &development(), None).unwrap();

        assert_eq!(
            resolved.env_overrides,
            vec![("PYTHONPATH".to_string(), "/src/proj".to_string())]
        );
    }

    #[test]
    fn test_module_dir_prepends_to_existing_search_path() {
        let cmd = CommandLine::from("mytool");
        let resolved =
            resolve_command(&cmd, &posix(), &development(), Some("/opt/lib:/usr/lib")).unwrap();

        assert_eq!(resolved.env_overrides[0].1, "/src/proj:/opt/lib:/usr/lib");

        let resolved = resolve_command(&cmd, &windows(), &development(), Some("C:\\lib")).unwrap();
        assert_eq!(resolved.env_overrides[0].1, "/src/proj;C:\\lib");
    }

    #[test]
    fn test_custom_module_path_var() {
        let config = posix().with_module_path_var("AFQ_PATH");
        let cmd = CommandLine::from("mytool");
        let resolved = resolve_command(&cmd, &config, &development(), None).unwrap();

        assert_eq!(resolved.env_overrides[0].0, "AFQ_PATH");
    }
}
