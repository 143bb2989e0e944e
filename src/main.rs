use anyhow::Result;
use minishell::Interpreter;
use std::io::{self, IsTerminal};

fn main() -> Result<()> {
    let mut shell = Interpreter::default();

    let code = if io::stdin().is_terminal() {
        shell.repl()?
    } else {
        let stdin = io::stdin();
        shell.run_batch(&mut stdin.lock(), &mut io::stdout())?
    };

    std::process::exit(code)
}
