//! Reference rate abstractions and the cross rate derivation

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::core::amount::truncate;
use crate::core::error::ConvertError;

pub const USD: &str = "USD";
pub const RUB: &str = "RUB";

/// Fractional digits kept in the derived cross rate.
pub const RATE_DECIMALS: u32 = 4;

/// Source of the raw reference rate document.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>, ConvertError>;
}

/// Rates quoted per one EUR, keyed by currency code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    pub date: Option<NaiveDate>,
    pub rates: HashMap<String, Decimal>,
}

impl RateTable {
    fn rate(&self, currency: &str) -> Result<Decimal, ConvertError> {
        self.rates.get(currency).copied().ok_or_else(|| {
            ConvertError::MalformedDocument(format!("No {currency} rate found in document"))
        })
    }

    /// RUB per one USD, derived through EUR and truncated to four places.
    pub fn cross_rate(&self) -> Result<Decimal, ConvertError> {
        let usd = self.rate(USD)?;
        let rub = self.rate(RUB)?;

        let cross = Decimal::ONE
            .checked_div(usd)
            .and_then(|per_usd| per_usd.checked_mul(rub))
            .ok_or_else(|| {
                ConvertError::MalformedDocument(format!(
                    "Cannot derive cross rate from USD {usd} and RUB {rub}"
                ))
            })?;
        Ok(truncate(cross, RATE_DECIMALS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn table(entries: &[(&str, &str)]) -> RateTable {
        RateTable {
            date: None,
            rates: entries
                .iter()
                .map(|(code, rate)| (code.to_string(), Decimal::from_str(rate).unwrap()))
                .collect(),
        }
    }

    #[test]
    fn test_cross_rate_truncates_to_four_places() {
        let rates = table(&[("USD", "1.1383"), ("RUB", "74.9928")]);
        let cross = rates.cross_rate().unwrap();
        assert_eq!(cross, Decimal::from_str("65.8814").unwrap());
        assert_eq!(cross.to_string(), "65.8814");
    }

    #[test]
    fn test_cross_rate_pads_exact_results() {
        let rates = table(&[("USD", "2"), ("RUB", "100")]);
        assert_eq!(rates.cross_rate().unwrap().to_string(), "50.0000");
    }

    #[test]
    fn test_cross_rate_missing_currency() {
        let err = table(&[("USD", "1.1383")]).cross_rate().unwrap_err();
        assert!(matches!(err, ConvertError::MalformedDocument(_)));
        assert_eq!(err.to_string(), "No RUB rate found in document");

        let err = table(&[("RUB", "74.9928")]).cross_rate().unwrap_err();
        assert_eq!(err.to_string(), "No USD rate found in document");
    }

    #[test]
    fn test_cross_rate_zero_usd_rate() {
        let err = table(&[("USD", "0"), ("RUB", "74.9928")])
            .cross_rate()
            .unwrap_err();
        assert_eq!(err.kind(), "MalformedDocumentError");
    }
}
