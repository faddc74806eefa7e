use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Stdin, Stdout, Write};
use std::thread;
use std::time::Duration;

/// Line-oriented terminal dialog. Generic over the streams so the
/// questionnaire and init flow can be driven from tests.
pub struct Console<R, W> {
    input: R,
    output: W,
    typewriter_delay: Duration,
}

impl Console<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self {
            input: BufReader::new(std::io::stdin()),
            output: std::io::stdout(),
            typewriter_delay: Duration::from_millis(18),
        }
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            typewriter_delay: Duration::ZERO,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text).context("Failed to write output")
    }

    /// Print text one character at a time.
    pub fn typewriter(&mut self, text: &str) -> Result<()> {
        if self.typewriter_delay.is_zero() {
            return self.say(text);
        }
        for c in text.chars() {
            write!(self.output, "{}", c).context("Failed to write output")?;
            self.output.flush().ok();
            thread::sleep(self.typewriter_delay);
        }
        writeln!(self.output).context("Failed to write output")
    }

    /// Show `message` and return the trimmed answer. End of input reads as empty.
    pub fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message).context("Failed to write output")?;
        self.output.flush().context("Failed to flush stdout")?;
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .context("Failed to read input")?;
        Ok(line.trim().to_string())
    }

    pub fn prompt_with_default(&mut self, message: &str, default: &str) -> Result<String> {
        let input = self.prompt(&format!("{} [{}]: ", message, default))?;
        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input)
        }
    }

    pub fn prompt_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let input = self.prompt(&format!("{} [{}]: ", message, hint))?.to_lowercase();
        if input.is_empty() {
            Ok(default_yes)
        } else {
            Ok(input == "y" || input == "yes")
        }
    }
}
