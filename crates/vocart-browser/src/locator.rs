use std::fmt;

/// How to find an element on a page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Id(String),
    Class(String),
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Locator::Class(class.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Locator::XPath(expression.into())
    }

    /// Equivalent CSS selector; `None` for XPath expressions
    pub fn css_selector(&self) -> Option<String> {
        match self {
            // Ids like `submit.add-to-cart` are not valid `#id` selectors
            Locator::Id(id) if is_plain_identifier(id) => Some(format!("#{}", id)),
            Locator::Id(id) => Some(format!("[id=\"{}\"]", id.replace('"', "\\\""))),
            Locator::Class(class) => Some(format!(".{}", class)),
            Locator::Css(selector) => Some(selector.clone()),
            Locator::XPath(_) => None,
        }
    }
}

fn is_plain_identifier(value: &str) -> bool {
    value
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "id={}", id),
            Locator::Class(class) => write!(f, "class={}", class),
            Locator::Css(selector) => write!(f, "css={}", selector),
            Locator::XPath(expression) => write!(f, "xpath={}", expression),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_translation() {
        assert_eq!(
            Locator::id("add-to-cart-button").css_selector().as_deref(),
            Some("#add-to-cart-button")
        );
        assert_eq!(
            Locator::id("submit.add-to-cart").css_selector().as_deref(),
            Some("[id=\"submit.add-to-cart\"]")
        );
        assert_eq!(
            Locator::class("a-price-whole").css_selector().as_deref(),
            Some(".a-price-whole")
        );
        assert_eq!(
            Locator::css("input[name='submit.add-to-cart']").css_selector().as_deref(),
            Some("input[name='submit.add-to-cart']")
        );
        assert_eq!(Locator::xpath("//input").css_selector(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Locator::id("productTitle").to_string(), "id=productTitle");
        assert_eq!(
            Locator::xpath("//th[text()='ASIN']").to_string(),
            "xpath=//th[text()='ASIN']"
        );
    }
}
