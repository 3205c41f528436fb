//! [`PageDriver`] over saved page HTML.
//!
//! Lets product extraction run offline against a page saved from the browser.
//! Interactions succeed without effect when the element exists. The only XPath
//! understood is a labelled-sibling lookup such as
//! `//th[text()='ASIN']/following-sibling::td`; anything else reports
//! [`Error::Unsupported`].

use crate::{Error, Locator, PageDriver, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

pub struct HtmlSnapshot {
    document: Html,
    url: String,
}

impl HtmlSnapshot {
    pub fn new(html: &str, url: impl Into<String>) -> Self {
        Self {
            document: Html::parse_document(html),
            url: url.into(),
        }
    }

    fn selector(locator: &Locator) -> Result<Selector> {
        let css = locator.css_selector().ok_or_else(|| {
            Error::Unsupported(format!("{} needs a live page", locator))
        })?;
        Selector::parse(&css).map_err(|e| Error::InvalidSelector(format!("{}: {}", css, e)))
    }

    fn find(&self, locator: &Locator) -> Result<ElementRef<'_>> {
        let found = match locator {
            Locator::XPath(expression) => LabelledSibling::parse(expression)
                .ok_or_else(|| Error::Unsupported(format!("{} needs a live page", locator)))?
                .find(&self.document)?,
            _ => {
                let selector = Self::selector(locator)?;
                self.document.select(&selector).next()
            }
        };
        found.ok_or_else(|| Error::ElementNotFound(locator.to_string()))
    }
}

/// `//label_tag[text()='label']/following-sibling::sibling_tag`
#[derive(Debug, PartialEq, Eq)]
struct LabelledSibling {
    label_tag: String,
    label: String,
    sibling_tag: String,
}

impl LabelledSibling {
    fn parse(expression: &str) -> Option<Self> {
        let rest = expression.trim().strip_prefix("//")?;
        let (label_tag, rest) = rest.split_once("[text()=")?;
        let quote = rest.chars().next().filter(|c| *c == '\'' || *c == '"')?;
        let (label, rest) = rest[1..].split_once(quote)?;
        let sibling_tag = rest.strip_prefix("]/following-sibling::")?;

        let is_tag = |tag: &str| !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric());
        if !is_tag(label_tag) || !is_tag(sibling_tag) {
            return None;
        }

        Some(Self {
            label_tag: label_tag.to_string(),
            label: label.to_string(),
            sibling_tag: sibling_tag.to_string(),
        })
    }

    /// First `sibling_tag` after the first label whose trimmed text matches
    fn find<'a>(&self, document: &'a Html) -> Result<Option<ElementRef<'a>>> {
        let labels = Selector::parse(&self.label_tag)
            .map_err(|e| Error::InvalidSelector(format!("{}: {}", self.label_tag, e)))?;

        Ok(document
            .select(&labels)
            .filter(|label| label.text().collect::<String>().trim() == self.label)
            .find_map(|label| {
                label
                    .next_siblings()
                    .filter_map(ElementRef::wrap)
                    .find(|sibling| sibling.value().name() == self.sibling_tag)
            }))
    }
}

#[async_trait(?Send)]
impl PageDriver for HtmlSnapshot {
    async fn current_url(&self) -> Result<String> {
        Ok(self.url.clone())
    }

    async fn text(&self, locator: &Locator) -> Result<String> {
        let element = self.find(locator)?;
        Ok(element.text().collect::<String>().trim().to_string())
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>> {
        let element = self.find(locator)?;
        Ok(element.value().attr(name).map(str::to_string))
    }

    async fn is_present(&self, locator: &Locator) -> Result<bool> {
        match self.find(locator) {
            Ok(_) => Ok(true),
            Err(Error::ElementNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn is_clickable(&self, locator: &Locator) -> Result<bool> {
        let element = self.find(locator)?;
        Ok(element.value().attr("disabled").is_none())
    }

    async fn scroll_into_view(&self, locator: &Locator) -> Result<()> {
        self.find(locator).map(|_| ())
    }

    async fn highlight(&self, locator: &Locator) -> Result<()> {
        self.find(locator).map(|_| ())
    }

    async fn type_text(&self, locator: &Locator, _text: &str) -> Result<()> {
        self.find(locator).map(|_| ())
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        self.find(locator)?;
        tracing::debug!(locator = %locator, "click on a snapshot has no effect");
        Ok(())
    }

    async fn force_click(&self, locator: &Locator) -> Result<()> {
        self.click(locator).await
    }
}
