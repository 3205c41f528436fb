use crate::Result;
use crate::record::ProductRecord;
use chrono::{DateTime, TimeZone};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "amazon_viewed_products_";

/// Accumulates inspected products for one session and flushes them once at the end
#[derive(Debug, Default)]
pub struct SessionRecorder {
    records: Vec<ProductRecord>,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished record; it can no longer be changed afterwards
    pub fn append(&mut self, record: ProductRecord) {
        tracing::debug!(
            asin = %record.asin,
            added_to_cart = record.added_to_cart,
            "recording product"
        );
        self.records.push(record);
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// File name for a session written at `at`
    pub fn file_name<Tz>(at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        format!("{}{}.csv", FILE_PREFIX, at.format("%Y%m%d_%H%M%S"))
    }

    /// Write every record to a timestamped CSV file inside `dir`, creating `dir` if needed
    pub fn write_to_dir<Tz>(&self, dir: &Path, at: &DateTime<Tz>) -> Result<PathBuf>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(Self::file_name(at));
        self.write_to_file(&path)?;
        Ok(path)
    }

    /// Write every record to `path`, header first
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        tracing::debug!("Writing session file to: {}", path.display());

        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))?;

        tracing::info!(
            "Successfully wrote {} products to {}",
            self.records.len(),
            path.display()
        );

        Ok(())
    }

    /// Serialize the session as CSV into any writer
    pub fn write_to<W: std::io::Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        // Written explicitly so an empty session still gets a header row
        csv.write_record([
            "ASIN",
            "Title",
            "Price",
            "Image_URL",
            "Date",
            "Time",
            "Added_to_Cart",
            "Amazon_Link",
        ])?;
        for record in &self.records {
            csv.serialize(record)?;
        }
        csv.flush()?;

        Ok(())
    }
}
