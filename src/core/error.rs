//! Conversion pipeline errors.

use thiserror::Error;

/// Message reported for any amount that is not a positive number.
pub const POSITIVE_NUMBER_REQUIRED: &str = "USD value must be positive number";

/// Message reported for a positive amount beyond the decimal range.
pub const TOO_LARGE_TO_CONVERT: &str = "USD value is too large to convert";

/// Message reported for a positive amount below the decimal precision.
pub const TOO_SMALL_TO_CONVERT: &str = "USD value is too small to convert";

/// Errors that can abort a conversion run.
///
/// Every stage of the pipeline returns this type, so the failure mode of a
/// stage is visible in its signature. None of them are retried.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The USD amount is missing, not a number, or not strictly positive
    #[error("{0}")]
    InvalidInput(String),

    /// The request could not complete (DNS, connection, timeout, body read)
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request completed but the response is unusable
    #[error("{0}")]
    BadResponse(String),

    /// The body is not well-formed XML or lacks the expected rates
    #[error("{0}")]
    MalformedDocument(String),
}

impl ConvertError {
    pub fn positive_number_required() -> Self {
        ConvertError::InvalidInput(POSITIVE_NUMBER_REQUIRED.to_string())
    }

    /// Stable name of the error kind, used as the prefix of the reported line.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::InvalidInput(_) => "InvalidInputError",
            ConvertError::Network { .. } => "NetworkError",
            ConvertError::BadResponse(_) => "BadResponseError",
            ConvertError::MalformedDocument(_) => "MalformedDocumentError",
        }
    }

    /// Formats the error as `<kind>. <message>`.
    pub fn report_line(&self) -> String {
        format!("{}. {}", self.kind(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_line_prefixes_kind() {
        let err = ConvertError::positive_number_required();
        assert_eq!(
            err.report_line(),
            "InvalidInputError. USD value must be positive number"
        );

        let err = ConvertError::BadResponse("Received empty response".to_string());
        assert_eq!(err.report_line(), "BadResponseError. Received empty response");

        let err = ConvertError::MalformedDocument("No USD rate found".to_string());
        assert_eq!(err.kind(), "MalformedDocumentError");
    }
}
