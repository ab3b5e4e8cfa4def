pub mod cache;
pub mod config;
pub mod coordinator;
pub mod refresh;

pub use cache::CacheStore;
pub use config::{BubbleConfig, DomSelectors};
pub use coordinator::BubbleCoordinator;
pub use refresh::{
    CycleOutcome, DataOrigin, commit_nodes, FetchTicket, NO_CACHE_MESSAGE, RATE_LIMITED_MESSAGE, RefreshGate,
    RefreshService,
};
