//! Reads product details from a loaded product page.
//!
//! Every field has its own fallback chain of lookups. Product pages vary by
//! category and by A/B layout, so any lookup may miss; a field whose chain is
//! exhausted is recorded as [`NOT_FOUND`].

use crate::{Locator, PageDriver, Result};
use chrono::{DateTime, Local, TimeZone};
use vocart_core::query::asin_from_link;
use vocart_core::{FallbackChain, Marketplace, NOT_FOUND, ProductRecord};

/// One way of reading a field
#[derive(Debug, Clone)]
pub enum FieldLookup {
    /// Text content of an element
    Text(Locator),
    /// An attribute of an element
    Attribute(Locator, &'static str),
    /// Price split into whole and fraction elements, e.g. `1,299` and `00`
    SplitPrice { whole: Locator, fraction: Locator },
    /// ASIN taken from the `/dp/<ASIN>` segment of the page URL
    LinkAsin,
}

pub struct ProductExtractor {
    title: FallbackChain<FieldLookup>,
    price: FallbackChain<FieldLookup>,
    image_url: FallbackChain<FieldLookup>,
    asin: FallbackChain<FieldLookup>,
    currency: String,
}

impl ProductExtractor {
    /// Lookups for Amazon product pages
    pub fn new(marketplace: &Marketplace) -> Self {
        let mut price = FallbackChain::new("price");
        for selector in [
            "#priceblock_ourprice",
            "#priceblock_dealprice",
            "#priceblock_saleprice",
            "#corePriceDisplay_desktop_feature_div .a-price .a-offscreen",
            "#corePrice_feature_div .a-price .a-offscreen",
        ] {
            price = price.then(selector, FieldLookup::Text(Locator::css(selector)));
        }
        let price = price.then(
            "whole + fraction",
            FieldLookup::SplitPrice {
                whole: Locator::class("a-price-whole"),
                fraction: Locator::class("a-price-fraction"),
            },
        );

        Self {
            title: FallbackChain::new("title")
                .then("#productTitle", FieldLookup::Text(Locator::id("productTitle"))),
            price,
            image_url: FallbackChain::new("image").then(
                "#landingImage src",
                FieldLookup::Attribute(Locator::id("landingImage"), "src"),
            ),
            asin: FallbackChain::new("asin")
                .then(
                    "details table",
                    FieldLookup::Text(Locator::xpath(
                        "//th[text()='ASIN']/following-sibling::td",
                    )),
                )
                .then("link /dp/ segment", FieldLookup::LinkAsin),
            currency: marketplace.currency().to_string(),
        }
    }

    /// Extract using the current local time as the inspection time
    pub async fn extract<P: PageDriver + ?Sized>(&self, page: &P) -> ProductRecord {
        self.extract_at(page, &Local::now()).await
    }

    /// Read every field; never fails, missing fields become [`NOT_FOUND`]
    pub async fn extract_at<P, Tz>(&self, page: &P, inspected_at: &DateTime<Tz>) -> ProductRecord
    where
        P: PageDriver + ?Sized,
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let link = match page.current_url().await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "could not read page URL");
                NOT_FOUND.to_string()
            }
        };

        let title = self.resolve(&self.title, page, &link).await;
        let price = self.resolve(&self.price, page, &link).await;
        let image_url = self.resolve(&self.image_url, page, &link).await;
        let asin = self.resolve(&self.asin, page, &link).await;

        tracing::info!(asin = %asin, title = %title, price = %price, "product extracted");

        ProductRecord::new(asin, title, price, image_url, link, inspected_at)
    }

    async fn resolve<P: PageDriver + ?Sized>(
        &self,
        chain: &FallbackChain<FieldLookup>,
        page: &P,
        link: &str,
    ) -> String {
        chain
            .resolve(NOT_FOUND.to_string(), |lookup| self.lookup(page, lookup, link))
            .await
            .into_value()
    }

    async fn lookup<P: PageDriver + ?Sized>(
        &self,
        page: &P,
        lookup: &FieldLookup,
        link: &str,
    ) -> Result<Option<String>> {
        let value = match lookup {
            FieldLookup::Text(locator) => Some(page.text(locator).await?),
            FieldLookup::Attribute(locator, name) => page.attribute(locator, name).await?,
            FieldLookup::SplitPrice { whole, fraction } => {
                let whole = page.text(whole).await?;
                let fraction = page.text(fraction).await?;
                let whole = whole.replace(',', "");
                let whole = whole.trim_end_matches('.');
                (!whole.is_empty()).then(|| format!("{}{}.{}", self.currency, whole, fraction))
            }
            FieldLookup::LinkAsin => asin_from_link(link),
        };

        Ok(value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HtmlSnapshot;
    use chrono::Utc;

    const LINK: &str = "https://www.amazon.in/Logitech-M331-Wireless-Mouse/dp/B01MTZYMAT/ref=sr_1_3";

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 18, 45, 10).unwrap()
    }

    async fn extract(html: &str) -> ProductRecord {
        let page = HtmlSnapshot::new(html, LINK);
        ProductExtractor::new(&Marketplace::default())
            .extract_at(&page, &at())
            .await
    }

    #[tokio::test]
    async fn test_full_page() {
        let record = extract(
            r#"<span id="productTitle"> Logitech M331 </span>
               <span id="priceblock_ourprice">₹1,195.00</span>
               <img id="landingImage" src="https://m.media-amazon.com/m331.jpg">"#,
        )
        .await;

        assert_eq!(record.title, "Logitech M331");
        assert_eq!(record.price, "₹1,195.00");
        assert_eq!(record.image_url, "https://m.media-amazon.com/m331.jpg");
        assert_eq!(record.asin, "B01MTZYMAT");
        assert_eq!(record.link, LINK);
        assert_eq!(record.date, "2024-06-01");
        assert_eq!(record.time, "18:45:10");
        assert!(!record.added_to_cart);
    }

    #[tokio::test]
    async fn test_empty_price_element_falls_through() {
        let record = extract(
            r#"<span id="priceblock_ourprice">  </span>
               <div id="corePrice_feature_div">
                 <span class="a-price"><span class="a-offscreen">₹799.00</span></span>
               </div>"#,
        )
        .await;

        assert_eq!(record.price, "₹799.00");
    }

    #[tokio::test]
    async fn test_split_price_fallback() {
        let record = extract(
            r#"<span class="a-price-whole">1,299.</span><span class="a-price-fraction">50</span>"#,
        )
        .await;

        assert_eq!(record.price, "₹1299.50");
    }

    #[tokio::test]
    async fn test_missing_fields_use_sentinel() {
        let record = extract("<html><body><p>Page not found</p></body></html>").await;

        assert_eq!(record.title, NOT_FOUND);
        assert_eq!(record.price, NOT_FOUND);
        assert_eq!(record.image_url, NOT_FOUND);
        // ASIN still recovered from the URL
        assert_eq!(record.asin, "B01MTZYMAT");
    }

    #[tokio::test]
    async fn test_asin_sentinel_without_dp_link() {
        let page = HtmlSnapshot::new("<html></html>", "https://www.amazon.in/s?k=mouse");
        let record = ProductExtractor::new(&Marketplace::default())
            .extract_at(&page, &at())
            .await;

        assert_eq!(record.asin, NOT_FOUND);
        assert_eq!(record.link, "https://www.amazon.in/s?k=mouse");
    }

    #[tokio::test]
    async fn test_details_table_asin_wins_over_link() {
        use crate::testing::MockPage;

        let mut page = MockPage::default();
        page.url = LINK.to_string();
        page.elements.insert(
            Locator::xpath("//th[text()='ASIN']/following-sibling::td"),
            " B0TABLE123 ".to_string(),
        );

        let record = ProductExtractor::new(&Marketplace::default())
            .extract_at(&page, &at())
            .await;

        assert_eq!(record.asin, "B0TABLE123");
    }

    #[tokio::test]
    async fn test_details_table_asin_from_saved_page() {
        let page = HtmlSnapshot::new(
            r#"<table id="productDetails_detailBullets_sections1">
                 <tr><th>Manufacturer</th><td>Logitech</td></tr>
                 <tr><th>ASIN</th><td>B0TABLE123</td></tr>
               </table>"#,
            "https://www.amazon.in/gp/product/ref=ox_sc_act",
        );
        let record = ProductExtractor::new(&Marketplace::default())
            .extract_at(&page, &at())
            .await;

        assert_eq!(record.asin, "B0TABLE123");
    }
}
