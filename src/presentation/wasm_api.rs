use crate::application::{BubbleConfig, BubbleCoordinator};
use crate::domain::{
    errors::{AppError, ConfigError},
    logging::LogComponent,
    market_data::Timeframe,
};
use crate::log_info;
use gloo::utils::format::JsValueSerdeExt;
use wasm_bindgen::prelude::*;

/// JavaScript handle of a mounted bubble chart.
///
/// ```js
/// const chart = MemeBubbles.mount({ perPage: 10 });
/// chart.setTimeframe("24h");
/// ```
#[wasm_bindgen]
pub struct MemeBubbles {
    coordinator: BubbleCoordinator,
}

#[wasm_bindgen]
impl MemeBubbles {
    /// Mount on the current page. `config` is an optional plain object with
    /// camelCase fields; omitted fields keep their defaults.
    pub fn mount(config: JsValue) -> Result<MemeBubbles, JsValue> {
        let config = parse_config(&config)?;
        let coordinator = BubbleCoordinator::mount(config)?;
        log_info!(LogComponent::Presentation("MemeBubbles"), "Chart handle created");
        Ok(Self { coordinator })
    }

    /// Switch to `1h`, `4h` or `24h`.
    #[wasm_bindgen(js_name = setTimeframe)]
    pub fn set_timeframe(&self, timeframe: &str) -> Result<(), JsValue> {
        let timeframe = parse_timeframe(timeframe)?;
        self.coordinator.set_timeframe(timeframe);
        Ok(())
    }

    pub fn timeframe(&self) -> String {
        self.coordinator.timeframe().to_string()
    }

    pub fn refresh(&self) {
        self.coordinator.refresh();
    }

    #[wasm_bindgen(js_name = isFetching)]
    pub fn is_fetching(&self) -> bool {
        self.coordinator.is_fetching()
    }

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> usize {
        self.coordinator.node_count()
    }

    #[wasm_bindgen(js_name = isDestroyed)]
    pub fn is_destroyed(&self) -> bool {
        self.coordinator.is_destroyed()
    }

    pub fn destroy(&self) {
        self.coordinator.destroy();
    }
}

/// `undefined`/`null` select the defaults.
pub fn parse_config(value: &JsValue) -> Result<BubbleConfig, AppError> {
    if value.is_undefined() || value.is_null() {
        return Ok(BubbleConfig::default());
    }
    let config: BubbleConfig = value
        .into_serde()
        .map_err(|e| ConfigError::Malformed(e.to_string()))?;
    Ok(config.validate()?)
}

pub fn parse_timeframe(value: &str) -> Result<Timeframe, AppError> {
    value.trim().parse::<Timeframe>().map_err(|_| {
        AppError::from(ConfigError::InvalidParameter {
            field: "timeframe",
            reason: format!("expected one of 1h, 4h, 24h, got '{value}'"),
        })
    })
}
