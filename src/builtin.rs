//! Commands implemented directly by the interpreter.
//!
//! Each builtin owns only the external capabilities it needs (process
//! termination, path lookup, directory changing), injected at construction so
//! behavior can be substituted in tests without a real OS underneath.

use crate::env::Environment;
use crate::error::ShellError;
use crate::external::PathResolver;
use crate::registry::Registry;
use std::cell::Cell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A command executed in-process instead of being spawned as a child.
///
/// `run` signals failure through [`ShellError`] rather than terminating the
/// interpreter; the dispatch boundary reports the error and the prompt loop
/// continues. The live [`Registry`] is passed in so builtins that reason about
/// other builtins (`type`) stay consistent with whatever is registered.
pub trait Builtin {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name(&self) -> &'static str;

    /// Executes the command against the provided output stream and session state.
    fn run(
        &self,
        args: &[String],
        stdout: &mut dyn Write,
        env: &mut Environment,
        registry: &Registry,
    ) -> Result<(), ShellError>;
}

/// Capability for terminating the interpreter process.
pub trait ProcessControl {
    fn exit(&self, code: i32);
}

/// [`ProcessControl`] implementation that records the requested code instead
/// of tearing the process down mid-dispatch. The prompt loop observes the
/// request after the builtin returns and unwinds normally.
#[derive(Default)]
pub struct DeferredExit {
    code: Cell<Option<i32>>,
}

impl DeferredExit {
    /// Consume a pending exit request, if any.
    pub fn take(&self) -> Option<i32> {
        self.code.take()
    }
}

impl ProcessControl for DeferredExit {
    fn exit(&self, code: i32) {
        self.code.set(Some(code));
    }
}

/// Capability for changing the process-wide working directory.
pub trait DirChanger {
    fn change_dir(&self, path: &Path) -> std::io::Result<()>;
}

/// [`DirChanger`] backed by `std::env::set_current_dir`.
pub struct ProcessDirChanger;

impl DirChanger for ProcessDirChanger {
    fn change_dir(&self, path: &Path) -> std::io::Result<()> {
        std::env::set_current_dir(path)
    }
}

/// `exit <code>`: request process termination with the given code.
pub struct Exit {
    control: Rc<dyn ProcessControl>,
}

impl Exit {
    pub fn new(control: Rc<dyn ProcessControl>) -> Self {
        Self { control }
    }
}

impl Builtin for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn run(
        &self,
        args: &[String],
        _stdout: &mut dyn Write,
        _env: &mut Environment,
        _registry: &Registry,
    ) -> Result<(), ShellError> {
        if args.len() != 1 {
            return Err(ShellError::InvalidArgumentCount);
        }
        let code: i32 = args[0]
            .parse()
            .map_err(|_| ShellError::InvalidArgumentValue(args[0].clone()))?;
        self.control.exit(code);
        Ok(())
    }
}

/// `echo [args...]`: write the arguments concatenated verbatim, then a newline.
///
/// Tokens are joined with no separator; the splitter already preserved any
/// spacing the user typed as part of the token stream.
pub struct Echo;

impl Builtin for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn run(
        &self,
        args: &[String],
        stdout: &mut dyn Write,
        _env: &mut Environment,
        _registry: &Registry,
    ) -> Result<(), ShellError> {
        writeln!(stdout, "{}", args.concat())?;
        Ok(())
    }
}

/// `type <name>`: report whether a name is a builtin, an executable on the
/// search path, or nothing at all.
pub struct Type {
    resolver: Rc<dyn PathResolver>,
}

impl Type {
    pub fn new(resolver: Rc<dyn PathResolver>) -> Self {
        Self { resolver }
    }
}

impl Builtin for Type {
    fn name(&self) -> &'static str {
        "type"
    }

    fn run(
        &self,
        args: &[String],
        stdout: &mut dyn Write,
        env: &mut Environment,
        registry: &Registry,
    ) -> Result<(), ShellError> {
        if args.len() != 1 {
            return Err(ShellError::InvalidArgumentCount);
        }
        let name = &args[0];

        if registry.contains(name) {
            writeln!(stdout, "{} is a shell builtin", name)?;
            return Ok(());
        }

        match self.resolver.resolve(env, name)? {
            Some(path) => writeln!(stdout, "{} is {}", name, path.display())?,
            None => writeln!(stdout, "{}: not found", name)?,
        }
        Ok(())
    }
}

/// `pwd`: print the session's current working directory.
pub struct Pwd;

impl Builtin for Pwd {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn run(
        &self,
        args: &[String],
        stdout: &mut dyn Write,
        env: &mut Environment,
        _registry: &Registry,
    ) -> Result<(), ShellError> {
        if !args.is_empty() {
            return Err(ShellError::InvalidArgumentCount);
        }
        writeln!(stdout, "{}", env.current_dir.display())?;
        Ok(())
    }
}

/// `cd <path>`: change the working directory.
///
/// Every `~` in the argument is replaced with the value of HOME before the
/// change; relative targets are resolved against the session's current
/// directory. A failed change leaves the session untouched.
pub struct Cd {
    changer: Rc<dyn DirChanger>,
}

impl Cd {
    pub fn new(changer: Rc<dyn DirChanger>) -> Self {
        Self { changer }
    }
}

impl Builtin for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn run(
        &self,
        args: &[String],
        _stdout: &mut dyn Write,
        env: &mut Environment,
        _registry: &Registry,
    ) -> Result<(), ShellError> {
        if args.len() != 1 {
            return Err(ShellError::InvalidArgumentCount);
        }

        let arg = &args[0];
        let target = if arg.contains('~') {
            let home = env
                .get_var("HOME")
                .ok_or(ShellError::MissingEnvVar("HOME"))?;
            PathBuf::from(arg.replace('~', &home))
        } else {
            PathBuf::from(arg)
        };

        let target = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        self.changer.change_dir(&target)?;
        env.current_dir = target;
        Ok(())
    }
}
