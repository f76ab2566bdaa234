pub mod cli;
pub mod config;
pub mod convert;
pub mod core;
pub mod providers;

use crate::convert::Conversion;
use crate::core::ConvertError;
use tracing::debug;

pub use crate::convert::convert_amount;

/// Runs one conversion against the feed configured in `config`.
pub async fn run(
    config: &config::AppConfig,
    raw_usd: Option<&str>,
) -> Result<Conversion, ConvertError> {
    debug!("Loaded config: {config:#?}");

    let provider = providers::ecb::EcbProvider::new(&config.feed_url, config.timeout());
    convert_amount(raw_usd, &provider).await
}
