use super::value_objects::Timeframe;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Domain entity - one coin record as returned by the markets endpoint.
///
/// Every field is optional: the upstream API omits or nulls fields freely and
/// the mapper decides the defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawCoin {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_1h_in_currency: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_4h_in_currency: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

impl RawCoin {
    /// Field-by-field decode of one array element. Wrongly typed fields are
    /// treated as absent; only a non-object element is rejected.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
        let number = |key: &str| object.get(key).and_then(Value::as_f64).filter(|n| n.is_finite());

        Some(Self {
            id: text("id"),
            symbol: text("symbol"),
            image: text("image"),
            current_price: number("current_price"),
            market_cap: number("market_cap"),
            price_change_percentage_1h_in_currency: number("price_change_percentage_1h_in_currency"),
            price_change_percentage_4h_in_currency: number("price_change_percentage_4h_in_currency"),
            price_change_percentage_24h: number("price_change_percentage_24h"),
        })
    }

    /// Change for the timeframe, then the 24h change, then zero. A zero change
    /// counts as missing.
    pub fn change_for(&self, timeframe: Timeframe) -> f64 {
        let specific = match timeframe {
            Timeframe::OneHour => self.price_change_percentage_1h_in_currency,
            Timeframe::FourHours => self.price_change_percentage_4h_in_currency,
            Timeframe::OneDay => None,
        };
        let nonzero = |v: &f64| *v != 0.0;
        specific
            .filter(nonzero)
            .or(self.price_change_percentage_24h.filter(nonzero))
            .unwrap_or(0.0)
    }

    /// Present and non-empty id.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Domain entity - the single snapshot kept in local storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: Value,
    pub timestamp: u64,
}

impl CacheEntry {
    pub fn new(data: Value, timestamp: u64) -> Self {
        Self { data, timestamp }
    }

    pub fn age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.timestamp)
    }

    pub fn is_fresh(&self, now: u64, ttl_ms: u64) -> bool {
        self.age_ms(now) < ttl_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn change_falls_back_to_24h_then_zero() {
        let coin: RawCoin = serde_json::from_value(json!({
            "id": "pepe",
            "price_change_percentage_1h_in_currency": null,
            "price_change_percentage_24h": 3.0
        }))
        .unwrap();
        assert_eq!(coin.change_for(Timeframe::OneHour), 3.0);
        assert_eq!(coin.change_for(Timeframe::FourHours), 3.0);
        assert_eq!(RawCoin::default().change_for(Timeframe::OneDay), 0.0);
    }

    #[test]
    fn wrongly_typed_fields_are_absent() {
        let coin = RawCoin::from_json(&json!({
            "id": "bonk",
            "market_cap": "lots",
            "current_price": 0.00002
        }))
        .unwrap();
        assert_eq!(coin.id(), Some("bonk"));
        assert_eq!(coin.market_cap, None);
        assert_eq!(coin.current_price, Some(0.00002));
        assert!(RawCoin::from_json(&json!("bonk")).is_none());
    }

    #[test]
    fn zero_change_falls_through() {
        let coin = RawCoin {
            price_change_percentage_1h_in_currency: Some(0.0),
            price_change_percentage_24h: Some(7.5),
            ..RawCoin::default()
        };
        assert_eq!(coin.change_for(Timeframe::OneHour), 7.5);

        let flat = RawCoin { price_change_percentage_24h: Some(0.0), ..RawCoin::default() };
        assert_eq!(flat.change_for(Timeframe::FourHours), 0.0);
    }

    #[test]
    fn entry_freshness_is_strict() {
        let entry = CacheEntry::new(json!([]), 1_000);
        assert!(entry.is_fresh(1_000 + 299_999, 300_000));
        assert!(!entry.is_fresh(1_000 + 300_000, 300_000));
    }
}
