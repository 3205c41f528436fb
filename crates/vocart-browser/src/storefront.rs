use crate::login::LoginOutcome;
use crate::{PageDriver, Result};
use async_trait::async_trait;
use vocart_core::{Credentials, Marketplace};

/// Which tab the product is read from after the shopper picks a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabSwitch {
    /// The product opened in a new tab and that tab is now active
    NewTab,
    /// No new tab appeared; the product is read from the current one
    SameTab,
}

/// Browser-level steps of a shopping session
#[async_trait(?Send)]
pub trait Storefront {
    type Page: PageDriver;

    fn marketplace(&self) -> &Marketplace;

    /// Page the product is currently read from
    fn page(&self) -> &Self::Page;

    /// Open the sign-in page and submit the form; never fails the session
    async fn sign_in(&mut self, credentials: &Credentials) -> LoginOutcome;

    async fn search(&mut self, term: &str) -> Result<()>;

    async fn switch_to_product(&mut self) -> Result<TabSwitch>;

    /// Close the product tab if one was opened and go back to the home page
    async fn finish_product(&mut self) -> Result<()>;
}
