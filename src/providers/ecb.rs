use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::core::{ConvertError, RateSource};

/// Fetches the ECB euro foreign exchange reference rate feed.
pub struct EcbProvider {
    feed_url: String,
    timeout: Duration,
}

impl EcbProvider {
    pub fn new(feed_url: &str, timeout: Duration) -> Self {
        EcbProvider {
            feed_url: feed_url.to_string(),
            timeout,
        }
    }

    fn network_error(&self, source: reqwest::Error) -> ConvertError {
        ConvertError::Network {
            url: self.feed_url.clone(),
            source,
        }
    }
}

#[async_trait]
impl RateSource for EcbProvider {
    #[instrument(name = "EcbFetch", skip(self), fields(url = %self.feed_url))]
    async fn fetch(&self) -> Result<Vec<u8>, ConvertError> {
        let client = reqwest::Client::builder()
            .user_agent("usdrub/0.1")
            .timeout(self.timeout)
            .build()
            .map_err(|e| self.network_error(e))?;

        info!("Requesting reference rates");
        let response = client
            .get(&self.feed_url)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        if !response.status().is_success() {
            return Err(ConvertError::BadResponse(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body = response.bytes().await.map_err(|e| self.network_error(e))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ConvertError::BadResponse(
                "Received empty response".to_string(),
            ));
        }

        debug!(bytes = body.len(), "Received reference rates document");
        info!("Received reference rates");
        Ok(body.to_vec())
    }
}
