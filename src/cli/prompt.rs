//! Line prompts for the interactive menu

use std::fmt::Display;
use std::io;
use std::str::FromStr;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use super::presenter::Presenter;

/// Reads answers line by line from stdin
pub struct Prompter {
    lines: Lines<BufReader<Stdin>>,
    presenter: Presenter,
}

impl Prompter {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            presenter: Presenter::new(),
        }
    }

    /// Ask a question and return the trimmed answer, `None` on end of input
    pub async fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(format!("{}: ", label).as_bytes()).await?;
        stdout.flush().await?;

        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    /// Ask with a default that is used when the answer is blank
    pub async fn ask_or(&mut self, label: &str, default: &str) -> io::Result<Option<String>> {
        let answer = self.ask(&format!("{} [{}]", label, default)).await?;
        Ok(answer.map(|a| if a.is_empty() { default.to_string() } else { a }))
    }

    /// Ask until the answer parses, `None` on end of input
    pub async fn ask_parsed<T>(&mut self, label: &str, default: Option<T>) -> io::Result<Option<T>>
    where
        T: FromStr + Display,
    {
        loop {
            let answer = match default {
                Some(ref d) => self.ask_or(label, &d.to_string()).await?,
                None => self.ask(label).await?,
            };

            let Some(answer) = answer else {
                return Ok(None);
            };

            match answer.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => self
                    .presenter
                    .error(&format!("'{}' is not a valid value.", answer)),
            }
        }
    }
}

impl Default for Prompter {
    fn default() -> Self {
        Self::new()
    }
}
