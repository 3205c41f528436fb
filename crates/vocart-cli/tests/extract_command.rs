use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use vocart_core::{Marketplace, NOT_FOUND};

const PRODUCT_URL: &str =
    "https://www.amazon.in/Logitech-M331-Silent-Wireless-Mouse/dp/B01MTZYMAT/ref=sr_1_1";

#[allow(deprecated)]
fn get_vocart_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("vocart")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_extract_full_page() {
    let record = vocart_cli::commands::extract::extract_file(
        &fixture("product_page.html"),
        PRODUCT_URL,
        &Marketplace::default(),
    )
    .unwrap();

    assert_eq!(
        record.title,
        "Logitech M331 Silent Plus Wireless Mouse, 2.4GHz with USB Nano Receiver, Black"
    );
    assert_eq!(record.price, "₹1,195.00");
    assert_eq!(
        record.image_url,
        "https://m.media-amazon.com/images/I/61UxfXTUyvL._SX679_.jpg"
    );
    assert_eq!(record.asin, "B01MTZYMAT");
    assert_eq!(record.link, PRODUCT_URL);
    assert!(!record.added_to_cart);
}

#[test]
fn test_extract_asin_from_details_table() {
    let record = vocart_cli::commands::extract::extract_file(
        &fixture("product_page.html"),
        "https://www.amazon.in/gp/product/ref=ox_sc_act_title_1",
        &Marketplace::default(),
    )
    .unwrap();

    assert_eq!(record.asin, "B01MTZYMAT");
}

#[test]
fn test_extract_sparse_page_falls_back() {
    let record = vocart_cli::commands::extract::extract_file(
        &fixture("product_page_sparse.html"),
        "https://www.amazon.in/gp/product/unknown",
        &Marketplace::default(),
    )
    .unwrap();

    assert_eq!(record.title, NOT_FOUND);
    assert_eq!(record.price, "₹12499.50");
    assert_eq!(record.image_url, NOT_FOUND);
    assert_eq!(record.asin, NOT_FOUND);
}

#[test]
fn test_extract_json_output() {
    let mut cmd = Command::new(get_vocart_bin());
    cmd.arg("extract")
        .arg(fixture("product_page.html"))
        .arg("--url")
        .arg(PRODUCT_URL)
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"ASIN\": \"B01MTZYMAT\""))
        .stdout(predicate::str::contains("\"Added_to_Cart\": \"No\""));
}

#[test]
fn test_extract_pretty_output() {
    let mut cmd = Command::new(get_vocart_bin());
    cmd.arg("extract")
        .arg(fixture("product_page_sparse.html"))
        .arg("--url")
        .arg("https://www.amazon.com/dp/B0SPARSE01")
        .arg("--currency")
        .arg("$");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Product Details"))
        .stdout(predicate::str::contains("Price:  $12499.50"))
        .stdout(predicate::str::contains("ASIN:   B0SPARSE01"));
}

#[test]
fn test_extract_missing_file() {
    let mut cmd = Command::new(get_vocart_bin());
    cmd.arg("extract")
        .arg("does-not-exist.html")
        .arg("--url")
        .arg(PRODUCT_URL);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}
