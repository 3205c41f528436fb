use crate::OutputFormat;
use crate::config::MarketplaceArgs;
use anyhow::{Context, Result};
use std::path::Path;
use vocart_browser::{HtmlSnapshot, ProductExtractor};
use vocart_core::{Marketplace, ProductRecord};

pub fn execute(
    file: &Path,
    url: &str,
    marketplace: &MarketplaceArgs,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Extracting product details from: {}", file.display());

    let record = extract_file(file, url, &marketplace.marketplace()?)?;

    match format {
        OutputFormat::Pretty => output_pretty(&record),
        OutputFormat::Json => output_json(&record)?,
    }

    Ok(())
}

/// Run the product extractor over a saved page
pub fn extract_file(file: &Path, url: &str, marketplace: &Marketplace) -> Result<ProductRecord> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let page = HtmlSnapshot::new(&html, url);
    let extractor = ProductExtractor::new(marketplace);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    Ok(runtime.block_on(extractor.extract(&page)))
}

fn output_pretty(record: &ProductRecord) {
    use console::style;

    println!("\n{}", style("Product Details").bold().cyan());
    println!("{}", style("===============").cyan());
    println!("  ASIN:   {}", record.asin);
    println!("  Title:  {}", record.title);
    println!("  Price:  {}", record.price);
    println!("  Image:  {}", record.image_url);
    println!("  Link:   {}", record.link);
    println!();
}

fn output_json(record: &ProductRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    println!("{}", json);
    Ok(())
}
