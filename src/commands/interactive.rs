//! Terminal prompting

use std::io::{self, Write};

use crate::error::Result;

/// Prompt for yes/no confirmation.
///
/// Returns `true` only when the answer is `y` or `Y`.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}? [y/N] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Check if stdin is a TTY (interactive)
pub fn is_stdin_tty() -> bool {
    atty::is(atty::Stream::Stdin)
}
