//! Add-to-cart executor.
//!
//! Product pages expose the add-to-cart control under several ids, names and
//! labels. Candidates are tried in order; the first one that becomes
//! clickable and takes a click wins. A click is confirmed by the side-sheet
//! or the cart button that Amazon shows afterwards, but a missing
//! confirmation is only a warning.

use crate::page::{wait_for_clickable, wait_for_presence};
use crate::{Locator, PageDriver, Result};
use std::time::Duration;
use vocart_core::FallbackChain;

#[derive(Debug, Clone, Copy)]
pub struct CartTimeouts {
    pub presence: Duration,
    pub clickable: Duration,
    /// Pause between highlighting and clicking
    pub settle: Duration,
    pub added_alert: Duration,
    pub cart_button: Duration,
}

impl Default for CartTimeouts {
    fn default() -> Self {
        Self {
            presence: Duration::from_secs(10),
            clickable: Duration::from_secs(10),
            settle: Duration::from_secs(1),
            added_alert: Duration::from_secs(6),
            cart_button: Duration::from_secs(10),
        }
    }
}

impl CartTimeouts {
    /// No waiting at all; for pages that are fully loaded up front, like snapshots
    pub fn immediate() -> Self {
        Self {
            presence: Duration::ZERO,
            clickable: Duration::ZERO,
            settle: Duration::ZERO,
            added_alert: Duration::ZERO,
            cart_button: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOutcome {
    /// Clicked and the page acknowledged it
    Confirmed { locator: Locator },
    /// Clicked but no confirmation appeared in time
    Unconfirmed { locator: Locator },
    /// No candidate could be clicked
    NotFound,
}

impl CartOutcome {
    pub fn clicked(&self) -> bool {
        !matches!(self, CartOutcome::NotFound)
    }
}

pub struct CartExecutor {
    candidates: FallbackChain<Locator>,
    confirmations: FallbackChain<(Locator, Duration)>,
    timeouts: CartTimeouts,
}

impl CartExecutor {
    pub fn new(timeouts: CartTimeouts) -> Self {
        let candidates = FallbackChain::new("add to cart")
            .then("add-to-cart button", Locator::id("add-to-cart-button"))
            .then("submit.add-to-cart", Locator::id("submit.add-to-cart"))
            .then("submit.add-to-cart-ubb", Locator::id("submit.add-to-cart-ubb"))
            .then("input#add-to-cart-button", Locator::css("input#add-to-cart-button"))
            .then(
                "input named submit.add-to-cart",
                Locator::css("input[name='submit.add-to-cart']"),
            )
            .then(
                "input labelled Add to Cart",
                Locator::xpath("//input[@value='Add to Cart']"),
            )
            .then(
                "button labelled Add to Cart",
                Locator::xpath("//button[contains(text(), 'Add to Cart')]"),
            );

        let confirmations = FallbackChain::new("cart confirmation")
            .then(
                "added-to-cart alert",
                (Locator::id("attachDisplayAddBaseAlert"), timeouts.added_alert),
            )
            .then("go-to-cart button", (Locator::id("sw-gtc"), timeouts.cart_button));

        Self {
            candidates,
            confirmations,
            timeouts,
        }
    }

    pub fn candidates(&self) -> &FallbackChain<Locator> {
        &self.candidates
    }

    pub async fn add_to_cart<P: PageDriver + ?Sized>(&self, page: &P) -> CartOutcome {
        let clicked = self
            .candidates
            .resolve((), |locator| self.try_click(page, locator))
            .await;

        let Some(step) = clicked.step() else {
            tracing::warn!("no add-to-cart control could be clicked");
            return CartOutcome::NotFound;
        };
        let locator = self.candidates.steps()[step].strategy.clone();

        let confirmed = self
            .confirmations
            .resolve((), |(confirmation, timeout)| async move {
                wait_for_presence(page, confirmation, *timeout)
                    .await
                    .map(Some)
            })
            .await;

        if confirmed.is_found() {
            tracing::info!(locator = %locator, "added to cart");
            CartOutcome::Confirmed { locator }
        } else {
            tracing::warn!(locator = %locator, "clicked add to cart but saw no confirmation");
            CartOutcome::Unconfirmed { locator }
        }
    }

    async fn try_click<P: PageDriver + ?Sized>(
        &self,
        page: &P,
        locator: &Locator,
    ) -> Result<Option<()>> {
        wait_for_presence(page, locator, self.timeouts.presence).await?;
        wait_for_clickable(page, locator, self.timeouts.clickable).await?;

        page.scroll_into_view(locator).await?;
        if let Err(e) = page.highlight(locator).await {
            tracing::debug!(error = %e, "could not highlight");
        }
        tokio::time::sleep(self.timeouts.settle).await;

        if let Err(e) = page.click(locator).await {
            tracing::debug!(locator = %locator, error = %e, "native click failed, forcing");
            page.force_click(locator).await?;
        }

        Ok(Some(()))
    }
}

impl Default for CartExecutor {
    fn default() -> Self {
        Self::new(CartTimeouts::default())
    }
}
