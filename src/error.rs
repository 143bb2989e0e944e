use std::io;
use thiserror::Error;

/// Everything that can go wrong while dispatching a command.
///
/// "Command not found" is deliberately absent: an unresolvable command is an
/// ordinary, reportable outcome of dispatch (see [`crate::Outcome`]), not a
/// failure of the interpreter.
#[derive(Debug, Error)]
pub enum ShellError {
    /// A builtin was invoked with the wrong number of arguments.
    #[error("invalid number of arguments")]
    InvalidArgumentCount,

    /// A builtin argument had the right position but the wrong shape,
    /// e.g. a non-integer exit code.
    #[error("invalid argument: {0}")]
    InvalidArgumentValue(String),

    /// A required environment variable (PATH, HOME) is not set.
    #[error("{0} environment variable not set")]
    MissingEnvVar(&'static str),

    /// The child process could not be started.
    #[error("failed to spawn process: {0}")]
    SpawnFailed(#[source] io::Error),

    /// The child process started but waiting on it failed.
    #[error("failed to wait for process: {0}")]
    WaitFailed(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
