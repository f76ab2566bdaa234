//! Input validation and the final conversion step.

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Display;
use std::str::FromStr;

use crate::core::error::{ConvertError, TOO_LARGE_TO_CONVERT, TOO_SMALL_TO_CONVERT};

/// Fractional digits kept in the converted amount.
pub const AMOUNT_DECIMALS: u32 = 2;

/// A validated, strictly positive USD amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UsdAmount(Decimal);

impl UsdAmount {
    /// Validates the raw `--USD` argument.
    pub fn parse(raw: Option<&str>) -> Result<Self, ConvertError> {
        raw.ok_or_else(ConvertError::positive_number_required)?
            .parse()
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl FromStr for UsdAmount {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // NaN and infinities have no decimal representation and fail here
        let parsed = Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s));

        match parsed {
            Ok(value) if value > Decimal::ZERO => Ok(UsdAmount(value)),
            _ => Err(out_of_range(s).unwrap_or_else(ConvertError::positive_number_required)),
        }
    }
}

/// Classifies text that is a positive finite number but has no usable
/// decimal representation.
fn out_of_range(s: &str) -> Option<ConvertError> {
    let approx = s.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)?;
    let message = if approx >= 1.0 {
        TOO_LARGE_TO_CONVERT
    } else {
        TOO_SMALL_TO_CONVERT
    };
    Some(ConvertError::InvalidInput(message.to_string()))
}

impl TryFrom<Decimal> for UsdAmount {
    type Error = ConvertError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value <= Decimal::ZERO {
            return Err(ConvertError::positive_number_required());
        }
        Ok(UsdAmount(value))
    }
}

impl Display for UsdAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Truncates `value` toward zero and pads it to exactly `decimals` places.
pub fn truncate(value: Decimal, decimals: u32) -> Decimal {
    let mut truncated = value.round_dp_with_strategy(decimals, RoundingStrategy::ToZero);
    truncated.rescale(decimals);
    truncated
}

/// Converts `amount` USD to RUB at `cross_rate`, truncated to two places.
pub fn convert(amount: UsdAmount, cross_rate: Decimal) -> Result<Decimal, ConvertError> {
    let rub = amount
        .value()
        .checked_mul(cross_rate)
        .ok_or_else(|| ConvertError::InvalidInput(TOO_LARGE_TO_CONVERT.to_string()))?;
    Ok(truncate(rub, AMOUNT_DECIMALS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_validate_accepts_positive_numbers() {
        let amount: UsdAmount = "2".parse().unwrap();
        assert_eq!(amount.value(), dec("2.0"));

        let amount: UsdAmount = " 10.5 ".parse().unwrap();
        assert_eq!(amount.value(), dec("10.5"));

        let amount: UsdAmount = "1e3".parse().unwrap();
        assert_eq!(amount.value(), dec("1000"));
    }

    #[test]
    fn test_validate_rejects_non_positive_or_invalid() {
        for raw in ["-5", "0", "0.00", "abc", "", "NaN", "inf", "-inf"] {
            let err = raw.parse::<UsdAmount>().unwrap_err();
            assert!(
                matches!(err, ConvertError::InvalidInput(_)),
                "expected invalid input for {raw:?}, got {err:?}"
            );
            assert_eq!(err.to_string(), "USD value must be positive number");
        }
    }

    #[test]
    fn test_validate_out_of_range_amounts() {
        for raw in ["1e30", "79228162514264337593543950336"] {
            let err = raw.parse::<UsdAmount>().unwrap_err();
            assert_eq!(
                err.report_line(),
                "InvalidInputError. USD value is too large to convert",
                "{raw:?}"
            );
        }

        let err = "1e-30".parse::<UsdAmount>().unwrap_err();
        assert_eq!(
            err.report_line(),
            "InvalidInputError. USD value is too small to convert"
        );
    }

    #[test]
    fn test_validate_missing_argument() {
        let err = UsdAmount::parse(None).unwrap_err();
        assert_eq!(err.kind(), "InvalidInputError");
    }

    #[test]
    fn test_convert_truncates_to_two_places() {
        let amount: UsdAmount = "10".parse().unwrap();
        let rub = convert(amount, dec("65.8814")).unwrap();
        assert_eq!(rub, dec("658.81"));
        assert_eq!(rub.to_string(), "658.81");
    }

    #[test]
    fn test_convert_pads_whole_results() {
        let amount: UsdAmount = "2".parse().unwrap();
        let rub = convert(amount, dec("50")).unwrap();
        assert_eq!(rub.to_string(), "100.00");
    }

    #[test]
    fn test_truncate_never_rounds_up() {
        assert_eq!(truncate(dec("65.88149"), 4), dec("65.8814"));
        assert_eq!(truncate(dec("0.999"), 2), dec("0.99"));
        assert_eq!(truncate(dec("658.8199999"), 2), dec("658.81"));
    }

    #[test]
    fn test_convert_is_monotonic_in_amount() {
        let rate = dec("65.8814");
        let mut previous = Decimal::ZERO;
        for cents in (1..=5_000).step_by(7) {
            let amount = UsdAmount::try_from(Decimal::new(cents, 2)).unwrap();
            let rub = convert(amount, rate).unwrap();
            assert!(rub > previous, "{amount} gave {rub}, previous {previous}");
            previous = rub;
        }
    }

    #[test]
    fn test_convert_overflow_is_invalid_input() {
        let amount = UsdAmount::try_from(Decimal::MAX).unwrap();
        let err = convert(amount, dec("65.8814")).unwrap_err();
        assert_eq!(
            err.report_line(),
            "InvalidInputError. USD value is too large to convert"
        );
    }
}
