//! Yes/no questions asked while activating required modules.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

#[async_trait]
pub trait Confirm: Send + Sync {
    /// `default` is the answer for empty input and for non-interactive use.
    async fn confirm(&self, question: &str, default: bool) -> bool;
}

/// Asks on stdout and reads one line from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirm;

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&self, question: &str, default: bool) -> bool {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let mut stdout = tokio::io::stdout();
        let prompt = format!("{question} {hint} ");
        if stdout.write_all(prompt.as_bytes()).await.is_err() || stdout.flush().await.is_err() {
            return default;
        }

        let mut line = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        match stdin.read_line(&mut line).await {
            Ok(0) => default,
            Ok(_) => parse_answer(&line).unwrap_or(default),
            Err(e) => {
                warn!(error = %e, "failed to read answer, using default");
                default
            }
        }
    }
}

fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// `--yes`: every question is answered yes.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

#[async_trait]
impl Confirm for AutoConfirm {
    async fn confirm(&self, _question: &str, _default: bool) -> bool {
        true
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AutoDecline;

#[async_trait]
impl Confirm for AutoDecline {
    async fn confirm(&self, _question: &str, _default: bool) -> bool {
        false
    }
}

/// `--no-interaction`: every question takes its default answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptDefaults;

#[async_trait]
impl Confirm for AcceptDefaults {
    async fn confirm(&self, _question: &str, default: bool) -> bool {
        default
    }
}
