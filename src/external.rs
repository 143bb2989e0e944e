//! PATH resolution and execution of commands that are not builtins.

use crate::env::Environment;
use crate::error::ShellError;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Capability for turning a command name into an executable path.
///
/// Injected into the `type` builtin and consulted by the dispatcher so both
/// always agree on what resolves, and so tests can substitute a fake that
/// never touches the real filesystem.
pub trait PathResolver {
    /// Resolve `name` to an executable path, or `None` when nothing matches.
    ///
    /// Not finding the command is not an error; an unset PATH is.
    fn resolve(&self, env: &Environment, name: &str) -> Result<Option<PathBuf>, ShellError>;
}

/// The real resolver, mirroring conventional shell lookup:
///
/// - Absolute path, or a path with multiple components (`bin/sh`, `./foo`):
///   taken as-is if it exists.
/// - Single component: each directory of the environment's PATH is checked in
///   listed order, first existing entry with that exact name wins.
pub struct PathSearch;

impl PathResolver for PathSearch {
    fn resolve(&self, env: &Environment, name: &str) -> Result<Option<PathBuf>, ShellError> {
        if name.is_empty() {
            return Ok(None);
        }

        let path = Path::new(name);
        if path.is_absolute() || path.components().count() > 1 {
            return Ok(path.exists().then(|| path.to_path_buf()));
        }

        let search_paths = env
            .get_var("PATH")
            .ok_or(ShellError::MissingEnvVar("PATH"))?;
        Ok(find_in_path(OsStr::new(&search_paths), OsStr::new(name)))
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|candidate| candidate.exists())
}

/// Spawn `path` as a foreground child process and block until it exits.
///
/// The child inherits the interpreter's stdin/stdout/stderr, receives the
/// environment's captured variables and runs in its current directory. A
/// termination by signal is reported as `128 + signal`, like most shells.
pub fn run_external(
    path: &Path,
    args: &[String],
    env: &Environment,
) -> Result<ExitCode, ShellError> {
    let mut child = Command::new(path)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .current_dir(&env.current_dir)
        .spawn()
        .map_err(ShellError::SpawnFailed)?;

    let exit_status = child.wait().map_err(ShellError::WaitFailed)?;
    match exit_status.code() {
        Some(code) => Ok(code),
        None => Ok(terminated_by_signal(exit_status)),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExitCode {
    -1
}
