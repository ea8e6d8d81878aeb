//! Line-oriented terminal input shared between the driver and the widget.
//!
//! Prompts go to stderr so stdout carries only flow events.

use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::Mutex;

type LineSource = Lines<Box<dyn AsyncBufRead + Send + Unpin>>;

#[derive(Clone)]
pub struct Prompt {
    lines: Arc<Mutex<LineSource>>,
}

impl Prompt {
    pub fn new(input: impl AsyncBufRead + Send + Unpin + 'static) -> Self {
        let input: Box<dyn AsyncBufRead + Send + Unpin> = Box::new(input);
        Self {
            lines: Arc::new(Mutex::new(input.lines())),
        }
    }

    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }

    /// Print `label` and read one trimmed line. `None` at end of input.
    ///
    /// Cancel safe: dropping the future before a line arrives consumes
    /// nothing.
    pub async fn line(&self, label: &str) -> io::Result<Option<String>> {
        let mut lines = self.lines.lock().await;
        let mut stderr = io::stderr();
        write!(stderr, "{label}")?;
        stderr.flush()?;
        Ok(lines.next_line().await?.map(|l| l.trim().to_owned()))
    }

    /// Ask a yes/no question; anything but `y`/`yes` is a no.
    pub async fn confirm(&self, label: &str) -> io::Result<bool> {
        Ok(self
            .line(label)
            .await?
            .is_some_and(|answer| matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lines_are_trimmed_until_end_of_input() {
        let prompt = Prompt::new("  +15551234567 \n\n".as_bytes());
        assert_eq!(
            prompt.line("phone: ").await.unwrap().as_deref(),
            Some("+15551234567")
        );
        assert_eq!(prompt.line("email: ").await.unwrap().as_deref(), Some(""));
        assert_eq!(prompt.line("again: ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn confirm_accepts_only_yes() {
        let prompt = Prompt::new("Y\nyes\nn\nsure\n".as_bytes());
        assert!(prompt.confirm("? ").await.unwrap());
        assert!(prompt.confirm("? ").await.unwrap());
        assert!(!prompt.confirm("? ").await.unwrap());
        assert!(!prompt.confirm("? ").await.unwrap());
        assert!(!prompt.confirm("? ").await.unwrap());
    }
}
