use crate::Result;
use url::Url;
use url::form_urlencoded::byte_serialize;

const DEFAULT_BASE_URL: &str = "https://www.amazon.in/";
const DEFAULT_CURRENCY: &str = "₹";

/// The storefront a session runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marketplace {
    base: Url,
    currency: String,
}

impl Default for Marketplace {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_BASE_URL).expect("default marketplace URL is valid"),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl Marketplace {
    /// Create a marketplace from a base URL; a missing scheme defaults to https
    pub fn new(base_url: &str, currency: impl Into<String>) -> Result<Self> {
        let base_url = if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            format!("https://{}", base_url)
        } else {
            base_url.to_string()
        };
        let mut base = Url::parse(&base_url)?;
        base.set_path("/");
        base.set_query(None);

        Ok(Self {
            base,
            currency: currency.into(),
        })
    }

    pub fn home_url(&self) -> &str {
        self.base.as_str()
    }

    /// Currency symbol prefixed to prices assembled from whole and fraction parts
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Search results URL; spaces become `+`, other reserved characters are percent-encoded
    pub fn search_url(&self, term: &str) -> String {
        let query: String = byte_serialize(term.trim().as_bytes()).collect();
        format!("{}s?k={}", self.base, query)
    }

    /// OpenID sign-in page that returns to the home page once authenticated
    pub fn sign_in_url(&self) -> Result<Url> {
        const IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";

        let url = Url::parse_with_params(
            self.base.join("ap/signin")?.as_str(),
            &[
                ("openid.pape.max_auth_age", "0"),
                ("openid.return_to", self.base.as_str()),
                ("openid.identity", IDENTIFIER_SELECT),
                ("openid.assoc_handle", "inflex"),
                ("openid.mode", "checkid_setup"),
                ("openid.claimed_id", IDENTIFIER_SELECT),
                ("openid.ns", "http://specs.openid.net/auth/2.0"),
            ],
        )?;
        Ok(url)
    }
}

/// Pull the ASIN out of a product link such as `/Some-Name/dp/B0ABC12345/ref=...`
pub fn asin_from_link(link: &str) -> Option<String> {
    let (_, rest) = link.split_once("/dp/")?;
    let asin = rest
        .split(['/', '?', '#'])
        .next()
        .filter(|segment| !segment.is_empty())?;
    Some(asin.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_joins_terms_with_plus() {
        let marketplace = Marketplace::default();
        assert_eq!(
            marketplace.search_url("wireless mouse"),
            "https://www.amazon.in/s?k=wireless+mouse"
        );
    }

    #[test]
    fn test_search_url_encodes_reserved_characters() {
        let marketplace = Marketplace::default();
        assert_eq!(
            marketplace.search_url("usb c & hdmi"),
            "https://www.amazon.in/s?k=usb+c+%26+hdmi"
        );
    }

    #[test]
    fn test_custom_base_url_without_scheme() {
        let marketplace = Marketplace::new("www.amazon.com/gp/home?x=1", "$").unwrap();
        assert_eq!(marketplace.home_url(), "https://www.amazon.com/");
        assert_eq!(marketplace.currency(), "$");
        assert_eq!(
            marketplace.search_url("desk lamp"),
            "https://www.amazon.com/s?k=desk+lamp"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(Marketplace::new("https://", "₹").is_err());
    }

    #[test]
    fn test_sign_in_url_returns_home() {
        let url = Marketplace::default().sign_in_url().unwrap();
        assert_eq!(url.path(), "/ap/signin");

        let return_to = url
            .query_pairs()
            .find(|(key, _)| key == "openid.return_to")
            .map(|(_, value)| value.into_owned());
        assert_eq!(return_to.as_deref(), Some("https://www.amazon.in/"));
    }

    #[test]
    fn test_asin_from_link() {
        assert_eq!(
            asin_from_link(
                "https://www.amazon.in/Logitech-Mouse/dp/B07W6JN8V8/ref=sr_1_1?keywords=mouse"
            ),
            Some("B07W6JN8V8".to_string())
        );
        assert_eq!(
            asin_from_link("https://www.amazon.in/dp/B0C1234567?th=1"),
            Some("B0C1234567".to_string())
        );
        assert_eq!(asin_from_link("https://www.amazon.in/s?k=mouse"), None);
        assert_eq!(asin_from_link("https://www.amazon.in/dp/"), None);
    }
}
