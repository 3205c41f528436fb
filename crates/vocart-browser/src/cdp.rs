//! [`PageDriver`] backed by a live Chrome tab

use crate::{Error, Locator, PageDriver, Result};
use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::Page;

const CLICKABLE_JS: &str = "function() { \
    const box = this.getBoundingClientRect(); \
    const style = window.getComputedStyle(this); \
    return !this.disabled && box.width > 0 && box.height > 0 \
        && style.visibility !== 'hidden' && style.pointerEvents !== 'none'; \
}";
const SCROLL_JS: &str = "function() { this.scrollIntoView({block: 'center'}); }";
const HIGHLIGHT_JS: &str = "function() { this.style.border = '3px solid red'; }";
const CLICK_JS: &str = "function() { this.click(); }";

/// One browser tab
#[derive(Clone)]
pub struct CdpPage {
    page: Page,
}

impl CdpPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn inner(&self) -> &Page {
        &self.page
    }

    pub fn into_inner(self) -> Page {
        self.page
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::info!("Navigating to {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    pub async fn bring_to_front(&self) -> Result<()> {
        self.page.bring_to_front().await?;
        Ok(())
    }

    async fn find(&self, locator: &Locator) -> Result<Element> {
        let found = match (locator, locator.css_selector()) {
            (Locator::XPath(expression), _) => self.page.find_xpath(expression.as_str()).await,
            (_, Some(selector)) => self.page.find_element(selector).await,
            (_, None) => return Err(Error::InvalidSelector(locator.to_string())),
        };
        found.map_err(|e| {
            tracing::trace!(locator = %locator, error = %e, "lookup failed");
            Error::ElementNotFound(locator.to_string())
        })
    }

    async fn call(&self, locator: &Locator, function: &str) -> Result<Option<serde_json::Value>> {
        let element = self.find(locator).await?;
        let returns = element.call_js_fn(function, false).await?;
        Ok(returns.result.value)
    }
}

#[async_trait(?Send)]
impl PageDriver for CdpPage {
    async fn current_url(&self) -> Result<String> {
        self.page
            .url()
            .await?
            .ok_or_else(|| Error::Browser("page has no URL".to_string()))
    }

    async fn text(&self, locator: &Locator) -> Result<String> {
        let element = self.find(locator).await?;
        // textContent also covers visually hidden price spans
        let text = element.string_property("textContent").await?;
        Ok(text.unwrap_or_default().trim().to_string())
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>> {
        let element = self.find(locator).await?;
        Ok(element.attribute(name).await?)
    }

    async fn is_present(&self, locator: &Locator) -> Result<bool> {
        Ok(self.find(locator).await.is_ok())
    }

    async fn is_clickable(&self, locator: &Locator) -> Result<bool> {
        let value = self.call(locator, CLICKABLE_JS).await?;
        Ok(value.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    async fn scroll_into_view(&self, locator: &Locator) -> Result<()> {
        self.call(locator, SCROLL_JS).await.map(|_| ())
    }

    async fn highlight(&self, locator: &Locator) -> Result<()> {
        self.call(locator, HIGHLIGHT_JS).await.map(|_| ())
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> Result<()> {
        let element = self.find(locator).await?;
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        let element = self.find(locator).await?;
        element.click().await?;
        Ok(())
    }

    async fn force_click(&self, locator: &Locator) -> Result<()> {
        self.call(locator, CLICK_JS).await.map(|_| ())
    }
}
