use super::{entities::RawCoin, value_objects::Timeframe};
use crate::domain::{bubble::BubbleNode, errors::MappingError, logging::LogComponent};
use crate::{log_debug, log_warn};
use rand::Rng;
use serde_json::{Value, json};
use std::collections::HashSet;

/// Tunables for turning market records into bubbles
#[derive(Debug, Clone, PartialEq)]
pub struct MappingSettings {
    pub min_radius: f64,
    pub radius_divisor: f64,
    pub max_nodes: usize,
    /// Half-width of the uniform spawn jitter around the view center
    pub jitter: f64,
    pub placeholder_image: String,
}

impl Default for MappingSettings {
    fn default() -> Self {
        Self {
            min_radius: 40.0,
            radius_divisor: 4000.0,
            max_nodes: 15,
            jitter: 50.0,
            placeholder_image: "https://via.placeholder.com/32".to_string(),
        }
    }
}

/// Domain service mapping raw markets payloads to bubble nodes
pub struct BubbleMappingService {
    settings: MappingSettings,
}

impl BubbleMappingService {
    pub fn new(settings: MappingSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &MappingSettings {
        &self.settings
    }

    /// `max(min_radius, sqrt(market_cap) / divisor)`, or `min_radius` without a cap.
    pub fn radius_for(&self, market_cap: Option<f64>) -> f64 {
        match market_cap {
            Some(cap) if cap > 0.0 => {
                (cap.sqrt() / self.settings.radius_divisor).max(self.settings.min_radius)
            }
            _ => self.settings.min_radius,
        }
    }

    /// Map a payload for `timeframe`, spawning nodes around `center`.
    pub fn map_to_nodes<R: Rng + ?Sized>(
        &self,
        raw: &Value,
        timeframe: Timeframe,
        center: (f64, f64),
        rng: &mut R,
    ) -> Result<Vec<BubbleNode>, MappingError> {
        let records = raw.as_array().ok_or(MappingError::NotASequence)?;
        if records.is_empty() {
            return Err(MappingError::Empty);
        }

        let mut seen = HashSet::new();
        let mut nodes = Vec::with_capacity(records.len().min(self.settings.max_nodes));

        for record in records.iter().take(self.settings.max_nodes) {
            let Some(coin) = RawCoin::from_json(record) else {
                log_warn!(LogComponent::Domain("BubbleMapper"), "Skipping non-object record: {}", record);
                continue;
            };
            let Some(id) = coin.id() else {
                log_warn!(LogComponent::Domain("BubbleMapper"), "Missing id for coin: {}", record);
                continue;
            };
            if !seen.insert(id.to_string()) {
                log_warn!(LogComponent::Domain("BubbleMapper"), "Duplicate coin id dropped: {}", id);
                continue;
            }

            nodes.push(self.build_node(&coin, id, timeframe, center, rng));
        }

        if nodes.is_empty() {
            return Err(MappingError::NoValidNodes);
        }

        log_debug!(
            LogComponent::Domain("BubbleMapper"),
            "Mapped {} of {} records for {}",
            nodes.len(),
            records.len(),
            timeframe
        );

        Ok(nodes)
    }

    fn build_node<R: Rng + ?Sized>(
        &self,
        coin: &RawCoin,
        id: &str,
        timeframe: Timeframe,
        center: (f64, f64),
        rng: &mut R,
    ) -> BubbleNode {
        let jitter = self.settings.jitter;
        let (dx, dy) = if jitter > 0.0 && jitter.is_finite() {
            (rng.gen_range(-jitter..jitter), rng.gen_range(-jitter..jitter))
        } else {
            (0.0, 0.0)
        };

        let mut node =
            BubbleNode::new(id, self.radius_for(coin.market_cap), center.0 + dx, center.1 + dy);
        node.value = coin.current_price.unwrap_or(0.0);
        node.change = coin.change_for(timeframe);
        node.symbol = coin
            .symbol
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| "UNKNOWN".to_string());
        node.image = coin
            .image
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.settings.placeholder_image.clone());
        node.market_cap = coin.market_cap.unwrap_or(0.0);
        node
    }
}

impl Default for BubbleMappingService {
    fn default() -> Self {
        Self::new(MappingSettings::default())
    }
}

/// Built-in payload rendered when neither the API nor the cache can help.
pub fn mock_markets() -> Value {
    json!([
        {
            "id": "dogecoin",
            "market_cap": 1_000_000_000.0,
            "current_price": 0.1,
            "price_change_percentage_1h_in_currency": 5.0,
            "price_change_percentage_4h_in_currency": 3.0,
            "price_change_percentage_24h": 2.0,
            "symbol": "doge",
            "image": "https://assets.coingecko.com/coins/images/1/small/dogecoin.png"
        },
        {
            "id": "shiba-inu",
            "market_cap": 500_000_000.0,
            "current_price": 0.00001,
            "price_change_percentage_1h_in_currency": -2.0,
            "price_change_percentage_4h_in_currency": -1.0,
            "price_change_percentage_24h": -3.0,
            "symbol": "shib",
            "image": "https://assets.coingecko.com/coins/images/11939/small/shiba.png"
        }
    ])
}
