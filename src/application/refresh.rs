use super::cache::CacheStore;
use crate::domain::{
    bubble::{BubbleNode, Simulation},
    errors::AppError,
    logging::LogComponent,
    market_data::{BubbleMappingService, MarketDataSource, SnapshotStorage, Timeframe, mock_markets},
};
use crate::{log_info, log_warn};
use derive_more::Display;
use rand::Rng;
use serde_json::Value;

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests to the API. Using cached data...";
pub const NO_CACHE_MESSAGE: &str = "No cached data available. Please try again later.";

/// Identifies one fetch cycle. Only the most recent ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// At-most-one-in-flight guard with per-cycle invalidation.
///
/// Triggers arriving while a cycle runs are dropped, not queued.
#[derive(Debug, Default)]
pub struct RefreshGate {
    in_flight: bool,
    generation: u64,
}

impl RefreshGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Start a cycle unless one is running. Starting a cycle supersedes every
    /// earlier ticket.
    pub fn try_begin(&mut self) -> Option<FetchTicket> {
        if self.in_flight {
            return None;
        }
        self.in_flight = true;
        self.generation += 1;
        Some(FetchTicket { generation: self.generation })
    }

    /// End the cycle of `ticket`. Returns false for a superseded ticket, whose
    /// result must be discarded.
    pub fn finish(&mut self, ticket: FetchTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.in_flight = false;
        true
    }

    /// Supersede the running cycle (teardown) and reopen the gate.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.in_flight = false;
    }
}

/// Where the rendered data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DataOrigin {
    #[display(fmt = "network")]
    Network,
    #[display(fmt = "cache")]
    Cache,
    #[display(fmt = "mock")]
    Mock,
}

/// Result of one refresh cycle, always renderable
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub nodes: Vec<BubbleNode>,
    pub origin: DataOrigin,
    /// Banner messages in the order they were raised
    pub banners: Vec<String>,
}

impl CycleOutcome {
    /// Most recent banner, the one left on screen.
    pub fn banner(&self) -> Option<&str> {
        self.banners.last().map(String::as_str)
    }
}

/// Use case turning a fetch result into nodes, with the cache/mock fallbacks.
pub struct RefreshService {
    mapper: BubbleMappingService,
}

impl RefreshService {
    pub fn new(mapper: BubbleMappingService) -> Self {
        Self { mapper }
    }

    pub fn mapper(&self) -> &BubbleMappingService {
        &self.mapper
    }

    /// Map cached data without fetching (initial page load).
    pub fn from_cache<S: SnapshotStorage, R: Rng + ?Sized>(
        &self,
        cache: &mut CacheStore<S>,
        timeframe: Timeframe,
        center: (f64, f64),
        rng: &mut R,
    ) -> Option<CycleOutcome> {
        let cached = cache.load()?;
        match self.mapper.map_to_nodes(&cached, timeframe, center, rng) {
            Ok(nodes) => Some(CycleOutcome { nodes, origin: DataOrigin::Cache, banners: Vec::new() }),
            Err(e) => {
                log_warn!(LogComponent::Application("Refresh"), "Cached snapshot unusable: {}", e);
                None
            }
        }
    }

    /// Fetch and resolve in one go.
    pub async fn run<M, S, R>(
        &self,
        source: &M,
        cache: &mut CacheStore<S>,
        timeframe: Timeframe,
        center: (f64, f64),
        rng: &mut R,
    ) -> CycleOutcome
    where
        M: MarketDataSource,
        S: SnapshotStorage,
        R: Rng + ?Sized,
    {
        let result = source.fetch_markets().await;
        self.resolve(result.map_err(AppError::from), cache, timeframe, center, rng)
    }

    /// Successful payloads are mapped and cached. Any failure, including a
    /// payload that maps to nothing, falls back to the cache (rate limit only)
    /// and then to the built-in mock coins.
    pub fn resolve<S: SnapshotStorage, R: Rng + ?Sized>(
        &self,
        result: Result<Value, AppError>,
        cache: &mut CacheStore<S>,
        timeframe: Timeframe,
        center: (f64, f64),
        rng: &mut R,
    ) -> CycleOutcome {
        let failure = match result {
            Ok(data) => match self.mapper.map_to_nodes(&data, timeframe, center, rng) {
                Ok(nodes) => {
                    cache.save(&data);
                    log_info!(LogComponent::Application("Refresh"), "Rendering {} coins from the API", nodes.len());
                    return CycleOutcome { nodes, origin: DataOrigin::Network, banners: Vec::new() };
                }
                Err(e) => AppError::from(e),
            },
            Err(e) => e,
        };

        let mut banners = Vec::new();
        let rate_limited = matches!(&failure, AppError::Fetch(fetch) if fetch.is_rate_limited());

        if rate_limited {
            log_warn!(LogComponent::Application("Refresh"), "Rate limited: {}", failure);
            banners.push(RATE_LIMITED_MESSAGE.to_string());
            if let Some(outcome) = self.from_cache(cache, timeframe, center, rng) {
                return CycleOutcome { banners, ..outcome };
            }
            banners.push(NO_CACHE_MESSAGE.to_string());
        } else {
            log_warn!(LogComponent::Application("Refresh"), "Refresh failed: {}", failure);
            banners.push(format!("Failed to load data: {}", failure_message(&failure)));
        }

        let nodes = self.mapper.map_to_nodes(&mock_markets(), timeframe, center, rng).unwrap_or_default();
        CycleOutcome { nodes, origin: DataOrigin::Mock, banners }
    }
}

fn failure_message(error: &AppError) -> String {
    match error {
        AppError::Fetch(e) => e.to_string(),
        AppError::Mapping(e) => e.to_string(),
        other => other.to_string(),
    }
}

impl Default for RefreshService {
    fn default() -> Self {
        Self::new(BubbleMappingService::default())
    }
}

/// Hand `nodes` to `draw` and only then to the simulation. When drawing fails
/// the simulation keeps the bubbles that are still on screen.
pub fn commit_nodes<E>(
    simulation: &mut Simulation,
    nodes: Vec<BubbleNode>,
    draw: impl FnOnce(&[BubbleNode]) -> Result<(), E>,
) -> Result<(), E> {
    draw(&nodes)?;
    simulation.set_nodes(nodes);
    Ok(())
}
