use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Value Object - window used for the percentage change shown on a bubble
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    StrumDisplay,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum Timeframe {
    #[default]
    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    OneHour,

    #[strum(serialize = "4h")]
    #[serde(rename = "4h")]
    FourHours,

    #[strum(serialize = "24h")]
    #[serde(rename = "24h")]
    OneDay,
}

impl Timeframe {
    /// Parse a `data-timeframe` attribute, falling back to the default window.
    pub fn from_attribute(value: Option<&str>) -> Self {
        value.and_then(|v| v.trim().parse().ok()).unwrap_or_default()
    }

    /// Upper-cased label used in the tooltip, e.g. `4H`.
    pub fn label(&self) -> String {
        self.as_ref().to_uppercase()
    }
}
