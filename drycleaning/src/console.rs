//! Line-oriented console boundary.

use std::io::{self, BufRead, Write};

use crate::error::{DryCleaningError, Result};

/// Read and write whole lines.
pub trait Console {
    /// Next input line without its line ending.
    ///
    /// Fails with [`DryCleaningError::InputClosed`] at end of input.
    fn read_line(&mut self) -> Result<String>;

    /// Write `line` followed by a newline.
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Write `prompt` and read the answer.
    fn prompt(&mut self, prompt: &str) -> Result<String> {
        self.write_line(prompt)?;
        self.read_line()
    }
}

/// Console over any buffered reader and writer.
#[derive(Debug)]
pub struct LineConsole<R, W> {
    reader: R,
    writer: W,
}

/// Console on the process's standard streams.
pub type StdConsole = LineConsole<io::StdinLock<'static>, io::Stdout>;

impl StdConsole {
    /// Console reading stdin and writing stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl LineConsole<io::Cursor<String>, Vec<u8>> {
    /// Console fed from `script` that captures everything written.
    ///
    /// Each line of `script` is one answer.
    pub fn scripted(script: impl Into<String>) -> Self {
        Self::new(io::Cursor::new(script.into()), Vec::new())
    }
}

impl<R, W> LineConsole<R, W> {
    /// Wrap `reader` and `writer`.
    pub const fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R> LineConsole<R, Vec<u8>> {
    /// Everything written so far.
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.writer).into_owned()
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD, so a garbled
    /// answer reads as an invalid one instead of failing the console.
    fn read_line(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        if self.reader.read_until(b'\n', &mut bytes)? == 0 {
            return Err(DryCleaningError::InputClosed);
        }
        let mut line = String::from_utf8_lossy(&bytes).into_owned();
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }
}
