use chrono::{DateTime, TimeZone};
use serde::{Serialize, Serializer};

/// Placeholder stored for any field no lookup strategy could resolve
pub const NOT_FOUND: &str = "N/A";

/// Details of one inspected product, as written to the session file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    #[serde(rename = "ASIN")]
    pub asin: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Image_URL")]
    pub image_url: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Added_to_Cart", serialize_with = "yes_no")]
    pub added_to_cart: bool,
    #[serde(rename = "Amazon_Link")]
    pub link: String,
}

impl ProductRecord {
    /// Build a record stamped with the local date and time of inspection
    pub fn new<Tz>(
        asin: String,
        title: String,
        price: String,
        image_url: String,
        link: String,
        inspected_at: &DateTime<Tz>,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            asin,
            title,
            price,
            image_url,
            date: inspected_at.format("%Y-%m-%d").to_string(),
            time: inspected_at.format("%H:%M:%S").to_string(),
            added_to_cart: false,
            link,
        }
    }

    pub fn has_title(&self) -> bool {
        self.title != NOT_FOUND
    }

    pub fn has_price(&self) -> bool {
        self.price != NOT_FOUND
    }
}

fn yes_no<S: Serializer>(value: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "Yes" } else { "No" })
}
