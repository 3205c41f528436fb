//! Amazon sign-in form

use crate::page::wait_for_presence;
use crate::{Locator, PageDriver, Result};
use std::time::Duration;
use vocart_core::Credentials;

/// How long each form field gets to appear
pub const FORM_TIMEOUT: Duration = Duration::from_secs(15);

/// Result of the automated part of signing in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Both steps of the form were submitted; a human may still need to clear a challenge
    Submitted,
    Failed(String),
}

impl LoginOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, LoginOutcome::Submitted)
    }
}

/// Fill the two-step sign-in form: email, continue, password, submit
pub async fn fill_sign_in<P: PageDriver + ?Sized>(
    page: &P,
    credentials: &Credentials,
    timeout: Duration,
) -> Result<()> {
    let email = Locator::id("ap_email");
    wait_for_presence(page, &email, timeout).await?;
    page.type_text(&email, credentials.email()).await?;
    page.click(&Locator::id("continue")).await?;
    tracing::debug!("email submitted");

    let password = Locator::id("ap_password");
    wait_for_presence(page, &password, timeout).await?;
    page.type_text(&password, credentials.password()).await?;
    page.click(&Locator::id("signInSubmit")).await?;
    tracing::info!("sign-in form submitted");

    Ok(())
}
