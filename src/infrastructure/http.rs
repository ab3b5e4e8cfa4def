use crate::application::BubbleConfig;
use crate::domain::{
    errors::FetchError,
    logging::LogComponent,
    market_data::MarketDataSource,
};
use crate::{log_debug, log_info, log_warn};
use gloo::net::http::Request;
use serde_json::Value;

/// CoinGecko `/coins/markets` client built on gloo's fetch wrapper
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    url: String,
}

impl CoinGeckoClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn from_config(config: &BubbleConfig) -> Self {
        Self::new(config.markets_url())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl MarketDataSource for CoinGeckoClient {
    async fn fetch_markets(&self) -> Result<Value, FetchError> {
        log_info!(LogComponent::Infrastructure("CoinGecko"), "📡 GET {}", self.url);

        let response = Request::get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !response.ok() {
            let error = FetchError::Http { status: response.status(), status_text: response.status_text() };
            log_warn!(LogComponent::Infrastructure("CoinGecko"), "{}", error);
            return Err(error);
        }

        let data: Value = response.json().await.map_err(|e| FetchError::Decode(e.to_string()))?;
        log_debug!(
            LogComponent::Infrastructure("CoinGecko"),
            "✅ Received {} records",
            data.as_array().map_or(0, Vec::len)
        );
        Ok(data)
    }
}
