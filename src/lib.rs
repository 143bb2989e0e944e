//! A minimal interactive command interpreter.
//!
//! One line of input at a time is read, resolved either to a small set of
//! built-in commands or to an external executable discovered via PATH,
//! executed to completion, and the prompt loop repeats. Builtins receive
//! their OS-facing capabilities (process termination, path lookup, directory
//! changing) as injected collaborators, so every component can be exercised
//! in tests without touching the real filesystem or environment.
//!
//! The main entry point is [`Interpreter`]; the public modules [`builtin`],
//! [`env`] and [`external`] expose the traits needed to assemble a custom
//! registry.

pub mod builtin;
pub mod env;
pub mod error;
pub mod external;
mod interpreter;
pub mod reader;
pub mod registry;

pub use error::ShellError;
pub use external::ExitCode;
pub use interpreter::{Interpreter, Outcome};
