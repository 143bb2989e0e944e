use crate::builtin::{DeferredExit, ProcessDirChanger};
use crate::env::Environment;
use crate::error::ShellError;
use crate::external::{self, ExitCode, PathResolver, PathSearch};
use crate::reader;
use crate::registry::Registry;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{BufRead, Write};
use std::rc::Rc;

/// What dispatching a single command line amounted to.
#[derive(Debug)]
pub enum Outcome {
    /// A registered builtin ran (successfully or not; failures are reported
    /// to the user before the loop continues).
    Builtin,
    /// An external command ran to completion with the given exit code.
    External(ExitCode),
    /// The name matched neither a builtin nor anything on the search path.
    NotFound,
    /// Dispatch found something to run but running it failed.
    ExecutionFailed(ShellError),
}

/// The read-resolve-execute loop.
///
/// One command per line, synchronously, to completion: a line is read, the
/// name is checked against the builtin [`Registry`], a miss falls through to
/// PATH resolution, and the loop blocks until whatever was found finishes.
///
/// Example
/// ```
/// use minishell::Interpreter;
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// sh.run_line("echo hello", &mut out).unwrap();
/// assert_eq!(out, b"hello\n");
/// ```
pub struct Interpreter {
    env: Environment,
    registry: Registry,
    resolver: Rc<dyn PathResolver>,
    exit: Rc<DeferredExit>,
}

impl Interpreter {
    /// Create an interpreter with an explicit environment, registry and
    /// resolver. The `exit` handle must be the same one wired into the
    /// registry's `exit` builtin for termination requests to be observed.
    pub fn new(
        env: Environment,
        registry: Registry,
        resolver: Rc<dyn PathResolver>,
        exit: Rc<DeferredExit>,
    ) -> Self {
        Self {
            env,
            registry,
            resolver,
            exit,
        }
    }

    /// Resolve one command name and run it.
    ///
    /// Registry hit → builtin. Miss → PATH search; an unresolvable name is
    /// reported to `stdout` as `"<command>: command not found"` and is not an
    /// error. The outer `Err` is reserved for failures writing to `stdout`
    /// itself.
    pub fn dispatch(
        &mut self,
        command: &str,
        args: &[String],
        stdout: &mut dyn Write,
    ) -> Result<Outcome, ShellError> {
        if let Some(builtin) = self.registry.lookup(command) {
            return Ok(match builtin.run(args, stdout, &mut self.env, &self.registry) {
                Ok(()) => Outcome::Builtin,
                Err(e) => Outcome::ExecutionFailed(e),
            });
        }

        let path = match self.resolver.resolve(&self.env, command) {
            Ok(Some(path)) => path,
            Ok(None) => {
                writeln!(stdout, "{}: command not found", command)?;
                return Ok(Outcome::NotFound);
            }
            Err(e) => return Ok(Outcome::ExecutionFailed(e)),
        };

        match external::run_external(&path, args, &self.env) {
            Ok(code) => Ok(Outcome::External(code)),
            Err(e) => Ok(Outcome::ExecutionFailed(e)),
        }
    }

    /// Split one raw input line and dispatch it, reporting any execution
    /// failure to `stdout` so the caller's loop can simply continue.
    ///
    /// Returns `Ok(None)` for lines that carry no command.
    pub fn run_line(
        &mut self,
        line: &str,
        stdout: &mut dyn Write,
    ) -> Result<Option<Outcome>, ShellError> {
        let Some((command, args)) = reader::split_line(line) else {
            return Ok(None);
        };

        let outcome = self.dispatch(&command, &args, stdout)?;
        if let Outcome::ExecutionFailed(cause) = &outcome {
            writeln!(stdout, "{}: {}", command, cause)?;
        }
        Ok(Some(outcome))
    }

    /// The interactive Read-Eval-Print Loop.
    ///
    /// Returns the exit code to terminate the process with: the code supplied
    /// to the `exit` builtin, or 0 when input ends.
    pub fn repl(&mut self) -> anyhow::Result<ExitCode> {
        let mut rl = DefaultEditor::new()?;

        loop {
            match rl.readline("$ ") {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    self.run_line(&line, &mut std::io::stdout())?;
                    if let Some(code) = self.exit.take() {
                        return Ok(code);
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(0),
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Non-interactive variant of [`repl`](Self::repl) driven by any buffered
    /// stream; used when stdin is not a terminal. Prompts are still written so
    /// piped transcripts match the interactive ones.
    pub fn run_batch(
        &mut self,
        input: &mut dyn BufRead,
        stdout: &mut dyn Write,
    ) -> Result<ExitCode, ShellError> {
        loop {
            write!(stdout, "$ ")?;
            stdout.flush()?;

            let Some(line) = reader::read_line(input)? else {
                return Ok(0);
            };
            self.run_line(&line, stdout)?;
            if let Some(code) = self.exit.take() {
                return Ok(code);
            }
        }
    }
}

impl Default for Interpreter {
    /// Wire up the real capabilities: the process environment, the standard
    /// builtin registry, PATH-based resolution and deferred process exit.
    fn default() -> Self {
        let resolver: Rc<dyn PathResolver> = Rc::new(PathSearch);
        let exit = Rc::new(DeferredExit::default());
        let registry = Registry::standard(
            exit.clone(),
            Rc::clone(&resolver),
            Rc::new(ProcessDirChanger),
        );
        Self::new(Environment::new(), registry, resolver, exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{Cd, DirChanger, Echo, Exit, Pwd, Type};
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};

    struct FakeResolver {
        known: HashMap<String, PathBuf>,
    }

    impl FakeResolver {
        fn empty() -> Self {
            Self {
                known: HashMap::new(),
            }
        }
    }

    impl PathResolver for FakeResolver {
        fn resolve(&self, _env: &Environment, name: &str) -> Result<Option<PathBuf>, ShellError> {
            Ok(self.known.get(name).cloned())
        }
    }

    struct NoopChanger;

    impl DirChanger for NoopChanger {
        fn change_dir(&self, _path: &Path) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn test_interpreter(resolver: Rc<dyn PathResolver>) -> (Interpreter, Rc<DeferredExit>) {
        let exit = Rc::new(DeferredExit::default());
        let registry = Registry::new(vec![
            Box::new(Exit::new(exit.clone())),
            Box::new(Echo),
            Box::new(Type::new(Rc::clone(&resolver))),
            Box::new(Pwd),
            Box::new(Cd::new(Rc::new(NoopChanger))),
        ]);
        let env = Environment {
            vars: HashMap::new(),
            current_dir: PathBuf::from("/work"),
        };
        (
            Interpreter::new(env, registry, resolver, exit.clone()),
            exit,
        )
    }

    #[test]
    fn test_line_without_command_is_a_noop() {
        let (mut sh, _) = test_interpreter(Rc::new(FakeResolver::empty()));
        let mut out = Vec::new();

        let outcome = sh.run_line("", &mut out).unwrap();
        assert!(outcome.is_none());
        assert!(out.is_empty());
    }

    #[test]
    fn test_builtin_dispatch_writes_through() {
        let (mut sh, _) = test_interpreter(Rc::new(FakeResolver::empty()));
        let mut out = Vec::new();

        let outcome = sh.run_line("echo a b", &mut out).unwrap().unwrap();
        assert!(matches!(outcome, Outcome::Builtin));
        assert_eq!(String::from_utf8(out).unwrap(), "ab\n");
    }

    #[test]
    fn test_unknown_command_is_reported_not_fatal() {
        let (mut sh, _) = test_interpreter(Rc::new(FakeResolver::empty()));
        let mut out = Vec::new();

        let before = sh.env.clone();
        let outcome = sh.run_line("nonexistent-xyz", &mut out).unwrap().unwrap();

        assert!(matches!(outcome, Outcome::NotFound));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "nonexistent-xyz: command not found\n"
        );
        assert_eq!(sh.env.current_dir, before.current_dir);
        assert_eq!(sh.env.vars, before.vars);
    }

    #[test]
    fn test_builtin_argument_error_is_reported_and_recovered() {
        let (mut sh, exit) = test_interpreter(Rc::new(FakeResolver::empty()));
        let mut out = Vec::new();

        let outcome = sh.run_line("exit", &mut out).unwrap().unwrap();
        assert!(matches!(
            outcome,
            Outcome::ExecutionFailed(ShellError::InvalidArgumentCount)
        ));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "exit: invalid number of arguments\n"
        );
        assert_eq!(exit.take(), None);
    }

    #[test]
    fn test_malformed_exit_code_does_not_terminate() {
        let (mut sh, exit) = test_interpreter(Rc::new(FakeResolver::empty()));
        let mut out = Vec::new();

        sh.run_line("exit abc", &mut out).unwrap();
        assert_eq!(exit.take(), None);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "exit: invalid argument: abc\n"
        );
    }

    #[test]
    fn test_exit_request_is_deferred_to_the_loop() {
        let (mut sh, exit) = test_interpreter(Rc::new(FakeResolver::empty()));
        let mut out = Vec::new();

        sh.run_line("exit 3", &mut out).unwrap();
        assert_eq!(exit.take(), Some(3));
        assert!(out.is_empty());
    }

    #[test]
    fn test_batch_loop_prompts_and_stops_at_end_of_input() {
        let (mut sh, _) = test_interpreter(Rc::new(FakeResolver::empty()));
        let mut input = Cursor::new("echo hi\n");
        let mut out = Vec::new();

        let code = sh.run_batch(&mut input, &mut out).unwrap();
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "$ hi\n$ ");
    }

    #[test]
    fn test_batch_loop_returns_requested_exit_code() {
        let (mut sh, _) = test_interpreter(Rc::new(FakeResolver::empty()));
        let mut input = Cursor::new("echo hi\nexit 5\necho never\n");
        let mut out = Vec::new();

        let code = sh.run_batch(&mut input, &mut out).unwrap();
        assert_eq!(code, 5);
        assert_eq!(String::from_utf8(out).unwrap(), "$ hi\n$ ");
    }

    #[test]
    #[cfg(unix)]
    fn test_dispatch_runs_real_external_command() {
        let (mut sh, _) = test_interpreter(Rc::new(PathSearch));
        sh.env.set_var("PATH", "/bin:/usr/bin");
        sh.env.current_dir = std::env::current_dir().unwrap();
        let mut out = Vec::new();

        let outcome = sh.run_line("sh -c true", &mut out).unwrap().unwrap();
        assert!(matches!(outcome, Outcome::External(0)));
    }

    #[test]
    #[cfg(unix)]
    fn test_external_exit_code_is_surfaced() {
        let (mut sh, _) = test_interpreter(Rc::new(PathSearch));
        sh.env.set_var("PATH", "/bin:/usr/bin");
        sh.env.current_dir = std::env::current_dir().unwrap();
        let mut out = Vec::new();

        let outcome = sh.run_line("false", &mut out).unwrap().unwrap();
        assert!(matches!(outcome, Outcome::External(1)));
    }
}
