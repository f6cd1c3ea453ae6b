use std::io::{self, Write};

/// Output is used by the CPU for PRN and PRA. It should abstract the
/// implementation details, so a terminal or a test buffer both work.
pub trait Output {
    /// emit a register value as a decimal line
    fn print_number(&mut self, value: u8) -> Result<(), io::Error>;

    /// emit the character whose code point is `value`
    fn print_char(&mut self, value: u8) -> Result<(), io::Error>;
}

/// line-oriented output on STDOUT
pub struct StdoutOutput {
    stdout: io::Stdout,
}

impl StdoutOutput {
    pub fn new() -> Self {
        StdoutOutput {
            stdout: io::stdout(),
        }
    }
}

impl Default for StdoutOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for StdoutOutput {
    fn print_number(&mut self, value: u8) -> Result<(), io::Error> {
        let mut out = self.stdout.lock();
        writeln!(out, "{}", value)?;
        out.flush()
    }

    fn print_char(&mut self, value: u8) -> Result<(), io::Error> {
        let mut out = self.stdout.lock();
        writeln!(out, "{}", char::from(value))?;
        out.flush()
    }
}

/// collects everything printed; useful for testing
#[derive(Debug, Default)]
pub struct BufferOutput {
    text: String,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }
}

impl Output for BufferOutput {
    fn print_number(&mut self, value: u8) -> Result<(), io::Error> {
        self.text.push_str(&format!("{}\n", value));
        Ok(())
    }

    fn print_char(&mut self, value: u8) -> Result<(), io::Error> {
        self.text.push(char::from(value));
        self.text.push('\n');
        Ok(())
    }
}
