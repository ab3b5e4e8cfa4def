pub mod http;
pub mod rendering;
pub mod services;
pub mod storage;
pub mod timers;
pub mod ui;

pub use http::CoinGeckoClient;
pub use services::{BrowserTimeProvider, ConsoleLogger, random_seed};
pub use storage::{InMemoryStorage, LocalStorageBackend};
pub use timers::Debouncer;
pub use ui::DomUi;
