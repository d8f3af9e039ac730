use std::io::{self, IsTerminal, Read};

use console::Term;
use probr_common::target;

const PROMPT: &str = "Targets (separated by spaces): ";

/// Reads targets from stdin: a prompted line on a terminal, all of stdin
/// otherwise.
pub fn read_targets() -> anyhow::Result<Vec<String>> {
    let stdin = io::stdin();

    let line: String = if stdin.is_terminal() {
        let term = Term::stderr();
        term.write_str(PROMPT)?;
        term.read_line()?
    } else {
        let mut buf = String::new();
        stdin.lock().read_to_string(&mut buf)?;
        buf
    };

    Ok(target::split_input(&line))
}
