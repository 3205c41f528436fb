mod cart;
mod cdp;
mod chrome_finder;
mod error;
mod extractor;
mod launcher;
mod locator;
mod login;
mod page;
mod profile;
mod session;
mod snapshot;
mod storefront;

#[cfg(test)]
mod testing;

pub use cart::{CartExecutor, CartOutcome, CartTimeouts};
pub use cdp::CdpPage;
pub use chrome_finder::ChromeFinder;
pub use error::{Error, Result};
pub use extractor::{FieldLookup, ProductExtractor};
pub use launcher::{ChromeLauncher, DEFAULT_DEBUGGING_PORT};
pub use locator::Locator;
pub use login::{FORM_TIMEOUT, LoginOutcome, fill_sign_in};
pub use page::{PageDriver, wait_for_clickable, wait_for_presence, wait_until};
pub use profile::{ProfileChoice, ProfileManager};
pub use session::{BrowserConfig, BrowserSession};
pub use snapshot::HtmlSnapshot;
pub use storefront::{Storefront, TabSwitch};
