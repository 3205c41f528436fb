//! Scriptable page for unit tests

use crate::{Error, Locator, PageDriver, Result};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Present(Locator),
    Clickable(Locator),
    Scroll(Locator),
    Highlight(Locator),
    Type(Locator, String),
    Click(Locator),
    ForceClick(Locator),
}

#[derive(Default)]
pub struct MockPage {
    pub url: String,
    pub elements: HashMap<Locator, String>,
    pub unclickable: Vec<Locator>,
    pub native_click_blocked: Vec<Locator>,
    pub calls: RefCell<Vec<Call>>,
}

impl MockPage {
    pub fn with_elements(locators: &[Locator]) -> Self {
        Self {
            elements: locators
                .iter()
                .map(|locator| (locator.clone(), String::new()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn require(&self, locator: &Locator) -> Result<&String> {
        self.elements
            .get(locator)
            .ok_or_else(|| Error::ElementNotFound(locator.to_string()))
    }
}

#[async_trait(?Send)]
impl PageDriver for MockPage {
    async fn current_url(&self) -> Result<String> {
        Ok(self.url.clone())
    }

    async fn text(&self, locator: &Locator) -> Result<String> {
        self.require(locator).map(|text| text.trim().to_string())
    }

    async fn attribute(&self, locator: &Locator, _name: &str) -> Result<Option<String>> {
        self.require(locator).map(|value| Some(value.clone()))
    }

    async fn is_present(&self, locator: &Locator) -> Result<bool> {
        self.record(Call::Present(locator.clone()));
        Ok(self.elements.contains_key(locator))
    }

    async fn is_clickable(&self, locator: &Locator) -> Result<bool> {
        self.record(Call::Clickable(locator.clone()));
        Ok(self.elements.contains_key(locator) && !self.unclickable.contains(locator))
    }

    async fn scroll_into_view(&self, locator: &Locator) -> Result<()> {
        self.record(Call::Scroll(locator.clone()));
        self.require(locator).map(|_| ())
    }

    async fn highlight(&self, locator: &Locator) -> Result<()> {
        self.record(Call::Highlight(locator.clone()));
        self.require(locator).map(|_| ())
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> Result<()> {
        self.require(locator)?;
        self.record(Call::Type(locator.clone(), text.to_string()));
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        self.record(Call::Click(locator.clone()));
        self.require(locator)?;
        if self.native_click_blocked.contains(locator) {
            return Err(Error::Cdp("element click intercepted".to_string()));
        }
        Ok(())
    }

    async fn force_click(&self, locator: &Locator) -> Result<()> {
        self.record(Call::ForceClick(locator.clone()));
        self.require(locator).map(|_| ())
    }
}
