use crate::domain::{
    bubble::SimulationSettings,
    errors::ConfigError,
    market_data::{MappingSettings, Timeframe},
};
use serde::{Deserialize, Serialize};

/// Largest accepted spawn jitter in CSS pixels
const MAX_SPAWN_JITTER: f64 = 10_000.0;

/// CSS selectors / element ids of the host page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomSelectors {
    pub container: String,
    pub svg: String,
    pub timeframe_buttons: String,
    pub error_message_id: String,
    pub last_updated_id: String,
    pub tooltip_id: String,
}

impl Default for DomSelectors {
    fn default() -> Self {
        Self {
            container: ".container".to_string(),
            svg: "svg".to_string(),
            timeframe_buttons: ".timeframe-btn".to_string(),
            error_message_id: "error-message".to_string(),
            last_updated_id: "last-updated".to_string(),
            tooltip_id: "tooltip".to_string(),
        }
    }
}

/// Every tunable of the bubble chart. Any field omitted by the host page keeps
/// its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BubbleConfig {
    // Remote data
    pub api_url: String,
    pub cors_proxy: Option<String>,
    pub vs_currency: String,
    pub category: String,
    pub per_page: usize,
    pub page: u32,

    // Cache
    pub cache_key: String,
    pub cache_ttl_ms: u64,

    // Timers
    pub debounce_ms: u32,
    pub refresh_interval_ms: u32,
    pub error_banner_ms: u32,
    pub transition_ms: f64,

    // Mapping
    pub min_radius: f64,
    pub radius_divisor: f64,
    pub spawn_jitter: f64,
    pub placeholder_image: String,
    pub default_timeframe: Timeframe,

    // Layout
    pub center_strength: f64,
    pub collision_padding: f64,
    pub collision_strength: f64,
    pub charge_strength: f64,
    pub alpha_decay: f64,
    pub alpha_min: f64,
    pub velocity_decay: f64,
    pub release_alpha: f64,
    pub drift_magnitude: f64,

    // Navigation / DOM
    pub detail_page: String,
    pub selectors: DomSelectors,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        let mapping = MappingSettings::default();
        let layout = SimulationSettings::default();
        Self {
            api_url: "https://api.coingecko.com/api/v3/coins/markets".to_string(),
            cors_proxy: None,
            vs_currency: "usd".to_string(),
            category: "meme-token".to_string(),
            per_page: mapping.max_nodes,
            page: 1,
            cache_key: "memeBubbleData".to_string(),
            cache_ttl_ms: 5 * 60 * 1000,
            debounce_ms: 1000,
            refresh_interval_ms: 120_000,
            error_banner_ms: 5000,
            transition_ms: 500.0,
            min_radius: mapping.min_radius,
            radius_divisor: mapping.radius_divisor,
            spawn_jitter: mapping.jitter,
            placeholder_image: mapping.placeholder_image,
            default_timeframe: Timeframe::default(),
            center_strength: layout.center_strength,
            collision_padding: layout.collision_padding,
            collision_strength: layout.collision_strength,
            charge_strength: layout.charge_strength,
            alpha_decay: layout.alpha_decay,
            alpha_min: layout.alpha_min,
            velocity_decay: layout.velocity_decay,
            release_alpha: layout.release_alpha,
            drift_magnitude: layout.drift_magnitude,
            detail_page: "chart.html".to_string(),
            selectors: DomSelectors::default(),
        }
    }
}

impl BubbleConfig {
    /// Reject values the chart cannot work with.
    pub fn validate(self) -> Result<Self, ConfigError> {
        fn invalid(field: &'static str, reason: &str) -> ConfigError {
            ConfigError::InvalidParameter { field, reason: reason.to_string() }
        }

        if self.api_url.trim().is_empty() {
            return Err(invalid("apiUrl", "must not be empty"));
        }
        if self.per_page == 0 {
            return Err(invalid("perPage", "must be at least 1"));
        }
        if self.cache_ttl_ms == 0 {
            return Err(invalid("cacheTtlMs", "must be positive"));
        }
        if self.cache_key.is_empty() {
            return Err(invalid("cacheKey", "must not be empty"));
        }
        if !(self.min_radius > 0.0) {
            return Err(invalid("minRadius", "must be positive"));
        }
        if !(self.radius_divisor > 0.0) {
            return Err(invalid("radiusDivisor", "must be positive"));
        }
        if !(self.alpha_min > 0.0 && self.alpha_min < 1.0) {
            return Err(invalid("alphaMin", "must be in (0, 1)"));
        }
        if !(0.0..=1.0).contains(&self.velocity_decay) {
            return Err(invalid("velocityDecay", "must be in [0, 1]"));
        }
        if !(0.0..=MAX_SPAWN_JITTER).contains(&self.spawn_jitter) {
            return Err(invalid("spawnJitter", "must be in [0, 10000]"));
        }
        if self.refresh_interval_ms <= self.debounce_ms {
            return Err(invalid("refreshIntervalMs", "must exceed debounceMs"));
        }
        if !(self.transition_ms.is_finite() && self.transition_ms >= 0.0) {
            return Err(invalid("transitionMs", "must be finite and non-negative"));
        }
        if !(self.collision_padding.is_finite() && self.collision_padding >= 0.0) {
            return Err(invalid("collisionPadding", "must be finite and non-negative"));
        }
        Ok(self)
    }

    /// Parse a JSON config object; missing fields keep defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(json)
            .map_err(|e| ConfigError::Malformed(e.to_string()))?
            .validate()
    }

    /// Markets endpoint with query string and optional proxy prefix.
    pub fn markets_url(&self) -> String {
        let params = [
            ("vs_currency", self.vs_currency.clone()),
            ("category", self.category.clone()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
        ];
        let query = params.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&");
        let proxy = self.cors_proxy.as_deref().unwrap_or("");
        format!("{proxy}{}?{query}", self.api_url)
    }

    pub fn mapping_settings(&self) -> MappingSettings {
        MappingSettings {
            min_radius: self.min_radius,
            radius_divisor: self.radius_divisor,
            max_nodes: self.per_page,
            jitter: self.spawn_jitter,
            placeholder_image: self.placeholder_image.clone(),
        }
    }

    pub fn simulation_settings(&self) -> SimulationSettings {
        SimulationSettings {
            alpha_decay: self.alpha_decay,
            alpha_min: self.alpha_min,
            alpha_target: 0.0,
            velocity_decay: self.velocity_decay,
            release_alpha: self.release_alpha,
            center_strength: self.center_strength,
            collision_padding: self.collision_padding,
            collision_strength: self.collision_strength,
            charge_strength: self.charge_strength,
            drift_magnitude: self.drift_magnitude,
        }
    }
}
