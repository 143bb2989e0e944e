//! Line reading and the naive whitespace splitter.
//!
//! The splitter is intentionally not a shell-grade tokenizer: it splits on the
//! single space character only, with no quoting, escaping or tab handling, and
//! consecutive spaces yield empty argument tokens.

use crate::error::ShellError;
use std::io::BufRead;

/// Split one input line into a command name and its arguments.
///
/// A single trailing newline is stripped first. The first space-delimited
/// token is the command; the remaining tokens are the arguments, verbatim and
/// in order. Returns `None` when the line carries no command (empty line, or
/// a line starting with a space), so a command name is never empty.
pub fn split_line(line: &str) -> Option<(String, Vec<String>)> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let mut tokens = line.split(' ');
    let command = tokens.next()?.to_string();
    if command.is_empty() {
        return None;
    }
    let args = tokens.map(str::to_string).collect();
    Some((command, args))
}

/// Pull one newline-terminated line from `input`.
///
/// Returns `Ok(None)` at end of input so the caller can stop cleanly instead
/// of treating exhaustion as a failure. The returned line keeps its trailing
/// newline, if any; [`split_line`] strips it.
pub fn read_line(input: &mut dyn BufRead) -> Result<Option<String>, ShellError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_split_command_and_args() {
        let (cmd, args) = split_line("echo hello world").unwrap();
        assert_eq!(cmd, "echo");
        assert_eq!(args, vec!["hello", "world"]);
    }

    #[test]
    fn test_split_strips_trailing_newline() {
        let (cmd, args) = split_line("pwd\n").unwrap();
        assert_eq!(cmd, "pwd");
        assert!(args.is_empty());
    }

    #[test]
    fn test_split_keeps_empty_tokens_between_spaces() {
        let (cmd, args) = split_line("echo  a").unwrap();
        assert_eq!(cmd, "echo");
        assert_eq!(args, vec!["", "a"]);
    }

    #[test]
    fn test_split_empty_line_is_no_command() {
        assert!(split_line("").is_none());
        assert!(split_line("\n").is_none());
        assert!(split_line(" echo").is_none());
    }

    #[test]
    fn test_read_line_yields_lines_then_none() {
        let mut input = Cursor::new("first\nsecond\n");

        assert_eq!(read_line(&mut input).unwrap(), Some("first\n".to_string()));
        assert_eq!(read_line(&mut input).unwrap(), Some("second\n".to_string()));
        assert_eq!(read_line(&mut input).unwrap(), None);
    }

    #[test]
    fn test_read_line_final_line_without_newline() {
        let mut input = Cursor::new("pwd");

        assert_eq!(read_line(&mut input).unwrap(), Some("pwd".to_string()));
        assert_eq!(read_line(&mut input).unwrap(), None);
    }
}
