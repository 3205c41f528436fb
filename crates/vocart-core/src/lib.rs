pub mod credentials;
pub mod error;
pub mod fallback;
pub mod query;
pub mod record;
pub mod recorder;
pub mod speech;

pub use credentials::Credentials;
pub use error::{Error, Result};
pub use fallback::{FallbackChain, Resolution};
pub use query::Marketplace;
pub use record::{NOT_FOUND, ProductRecord};
pub use recorder::SessionRecorder;
