//! Checkpoints where the human at the keyboard takes over

use anyhow::Result;
use async_trait::async_trait;
use console::Term;
use std::time::Duration;

const PASSWORD_REVEAL: Duration = Duration::from_secs(3);

#[async_trait(?Send)]
pub trait Operator {
    /// Block until the human presses Enter
    async fn wait_for_enter(&mut self, message: &str) -> Result<()>;

    /// Show the heard password briefly, then replace it with a mask
    async fn reveal_password(&mut self, password: &str) -> Result<()>;
}

pub struct TerminalOperator {
    term: Term,
    reveal_for: Duration,
}

impl TerminalOperator {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            reveal_for: PASSWORD_REVEAL,
        }
    }
}

impl Default for TerminalOperator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Operator for TerminalOperator {
    async fn wait_for_enter(&mut self, message: &str) -> Result<()> {
        self.term.write_line(&format!(">> {}", message))?;
        let term = self.term.clone();
        tokio::task::spawn_blocking(move || term.read_line()).await??;
        Ok(())
    }

    async fn reveal_password(&mut self, password: &str) -> Result<()> {
        self.term.write_line(&format!("Your password is: {}", password))?;
        tokio::time::sleep(self.reveal_for).await;
        self.term.clear_last_lines(1)?;
        self.term
            .write_line(&format!("Your password is: {}", "*".repeat(password.chars().count())))?;
        Ok(())
    }
}
