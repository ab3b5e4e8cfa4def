use derive_more::Display;

/// Failure of one market-data request
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum FetchError {
    #[display(fmt = "API request failed with status: {} - {}", status, status_text)]
    Http { status: u16, status_text: String },
    #[display(fmt = "Network error: {}", _0)]
    Network(String),
    #[display(fmt = "Failed to parse response: {}", _0)]
    Decode(String),
}

impl FetchError {
    pub const TOO_MANY_REQUESTS: u16 = 429;

    /// Whether the API asked us to back off
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::Http { status, .. } if *status == Self::TOO_MANY_REQUESTS)
    }
}

/// Whole-response problems that make a fetch cycle unusable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MappingError {
    #[display(fmt = "Invalid data: Data is not an array")]
    NotASequence,
    #[display(fmt = "No coins found in the data")]
    Empty,
    #[display(fmt = "No valid nodes after mapping")]
    NoValidNodes,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ConfigError {
    #[display(fmt = "Invalid parameter `{}`: {}", field, reason)]
    InvalidParameter { field: &'static str, reason: String },
    #[display(fmt = "Failed to read configuration: {}", _0)]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DomError {
    #[display(fmt = "Browser API unavailable: {}", _0)]
    Unavailable(&'static str),
    #[display(fmt = "Element not found: {}", _0)]
    ElementNotFound(String),
    #[display(fmt = "DOM operation failed: {}", _0)]
    OperationFailed(String),
}

/// Root error type for the application
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum AppError {
    #[display(fmt = "Fetch Error: {}", _0)]
    Fetch(FetchError),
    #[display(fmt = "Mapping Error: {}", _0)]
    Mapping(MappingError),
    #[display(fmt = "Configuration Error: {}", _0)]
    Config(ConfigError),
    #[display(fmt = "DOM Error: {}", _0)]
    Dom(DomError),
}

impl std::error::Error for FetchError {}
impl std::error::Error for MappingError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for DomError {}
impl std::error::Error for AppError {}

impl From<FetchError> for AppError {
    fn from(error: FetchError) -> Self {
        AppError::Fetch(error)
    }
}

impl From<MappingError> for AppError {
    fn from(error: MappingError) -> Self {
        AppError::Mapping(error)
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        AppError::Config(error)
    }
}

impl From<DomError> for AppError {
    fn from(error: DomError) -> Self {
        AppError::Dom(error)
    }
}

impl From<AppError> for wasm_bindgen::JsValue {
    fn from(error: AppError) -> Self {
        wasm_bindgen::JsValue::from_str(&error.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_429_counts_as_rate_limited() {
        let limited = FetchError::Http { status: 429, status_text: "Too Many Requests".into() };
        let broken = FetchError::Http { status: 500, status_text: "Internal Server Error".into() };
        assert!(limited.is_rate_limited());
        assert!(!broken.is_rate_limited());
        assert!(!FetchError::Network("offline".into()).is_rate_limited());
    }

    #[test]
    fn http_error_message_names_status() {
        let err = FetchError::Http { status: 429, status_text: "Too Many Requests".into() };
        assert_eq!(err.to_string(), "API request failed with status: 429 - Too Many Requests");
    }
}
