//! The validate, fetch, parse and compute pipeline.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::core::{ConvertError, RateSource, UsdAmount, convert};
use crate::providers::eurofxref;

/// Outcome of one successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub usd: UsdAmount,
    pub cross_rate: Decimal,
    pub rub: Decimal,
    pub rate_date: Option<NaiveDate>,
}

/// Converts the raw `--USD` argument to RUB using rates from `source`.
///
/// The amount is validated before `source` is asked for anything, and the
/// first failing stage ends the run.
pub async fn convert_amount(
    raw_usd: Option<&str>,
    source: &dyn RateSource,
) -> Result<Conversion, ConvertError> {
    let usd = UsdAmount::parse(raw_usd)?;
    debug!(%usd, "Validated input amount");

    let document = source.fetch().await?;

    let table = eurofxref::parse_rates(&document)?;
    let cross_rate = table.cross_rate()?;
    match table.date {
        Some(date) => info!("Using reference rates of {date}: 1 USD = {cross_rate} RUB"),
        None => info!("Using reference rates: 1 USD = {cross_rate} RUB"),
    }

    let rub = convert(usd, cross_rate)?;
    info!("USD input: {}; RUB output: {}", usd, rub);

    Ok(Conversion {
        usd,
        cross_rate,
        rub,
        rate_date: table.date,
    })
}
