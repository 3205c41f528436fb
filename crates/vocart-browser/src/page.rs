use crate::{Error, Locator, Result};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Element-level operations the extractor, cart executor and login form need
///
/// Lookups that find no element return [`Error::ElementNotFound`].
#[async_trait(?Send)]
pub trait PageDriver {
    async fn current_url(&self) -> Result<String>;

    /// Trimmed text content of the first match
    async fn text(&self, locator: &Locator) -> Result<String>;

    /// Attribute of the first match; `None` if the element lacks it
    async fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>>;

    async fn is_present(&self, locator: &Locator) -> Result<bool>;

    /// Present, rendered with a non-empty box, and not disabled
    async fn is_clickable(&self, locator: &Locator) -> Result<bool>;

    async fn scroll_into_view(&self, locator: &Locator) -> Result<()>;

    /// Outline the element so a watching human can see what is about to be clicked
    async fn highlight(&self, locator: &Locator) -> Result<()>;

    async fn type_text(&self, locator: &Locator, text: &str) -> Result<()>;

    /// Native mouse click
    async fn click(&self, locator: &Locator) -> Result<()>;

    /// Script-dispatched click for elements covered by overlays
    async fn force_click(&self, locator: &Locator) -> Result<()>;
}

/// Poll `check` until it reports true or `timeout` elapses; it always runs at least once
pub async fn wait_until<F, Fut>(what: &str, timeout: Duration, mut check: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        match check().await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => tracing::trace!(error = %e, "wait check failed"),
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(Error::Timeout(what.to_string()));
        }
        tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
    }
}

pub async fn wait_for_presence<P: PageDriver + ?Sized>(
    page: &P,
    locator: &Locator,
    timeout: Duration,
) -> Result<()> {
    wait_until(&format!("presence of {}", locator), timeout, || {
        page.is_present(locator)
    })
    .await
}

pub async fn wait_for_clickable<P: PageDriver + ?Sized>(
    page: &P,
    locator: &Locator,
    timeout: Duration,
) -> Result<()> {
    wait_until(&format!("{} to be clickable", locator), timeout, || {
        page.is_clickable(locator)
    })
    .await
}
