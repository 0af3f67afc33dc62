//! Operator acknowledgment before exit.

use std::io::{self, BufRead, Write};

pub const PROMPT: &str = "Press Enter to continue . . . ";

/// Prints [`PROMPT`] to `output` and blocks until a line (or EOF) is read
/// from `input`.
pub fn wait_for_acknowledgment<R, W>(mut input: R, mut output: W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    output.write_all(PROMPT.as_bytes())?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}
