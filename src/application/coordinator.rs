use super::{
    cache::CacheStore,
    config::BubbleConfig,
    refresh::{CycleOutcome, FetchTicket, RefreshGate, RefreshService, commit_nodes},
};
use crate::domain::{
    bubble::{BubbleNode, Simulation, TooltipContent},
    errors::{AppError, DomError, FetchError},
    logging::{LogComponent, TimeProvider},
    market_data::{BubbleMappingService, MarketDataSource, Timeframe},
};
use crate::infrastructure::{
    BrowserTimeProvider, CoinGeckoClient, Debouncer, DomUi, LocalStorageBackend, random_seed,
    rendering::{ChartEvent, FrameLoop, SvgRenderer},
    ui::query_one,
};
use crate::time_utils::format_last_updated;
use crate::ui_state::{TooltipView, UiState};
use crate::view_state::ViewState;
use crate::{log_debug, log_error, log_info, log_warn};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::{AbortHandle, Abortable};
use gloo::events::EventListener;
use gloo_timers::callback::Interval;
use leptos::{SignalGetUntracked, SignalSet};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;
use web_sys::Element;

/// Mutable chart state touched by fetch completions and frames
struct Core {
    cache: CacheStore<LocalStorageBackend>,
    gate: RefreshGate,
    abort: Option<AbortHandle>,
    simulation: Simulation,
    renderer: SvgRenderer,
    rng: SmallRng,
    /// Timeframe the drawn nodes were mapped with
    rendered_timeframe: Timeframe,
    last_frame_ms: f64,
    events: UnboundedReceiver<ChartEvent>,
}

/// Timers and listeners owned by the session, released on teardown
#[derive(Default)]
struct Resources {
    ui: Option<DomUi>,
    debouncer: Option<Debouncer>,
    interval: Option<Interval>,
    frame_loop: Option<FrameLoop>,
    window_listeners: Vec<EventListener>,
}

struct Session {
    config: BubbleConfig,
    refresh: RefreshService,
    client: CoinGeckoClient,
    clock: Arc<dyn TimeProvider>,
    container: Element,
    ui_state: UiState,
    events: UnboundedSender<ChartEvent>,
    core: RefCell<Core>,
    resources: RefCell<Resources>,
    destroyed: Cell<bool>,
}

/// One mounted bubble chart.
///
/// Owns every piece of mutable state of the page: the fetch gate, nodes and
/// simulation, cache mirror, timers and listeners. Dropping the handle does
/// not unmount the chart; call [`BubbleCoordinator::destroy`] (also run on
/// `pagehide`).
#[derive(Clone)]
pub struct BubbleCoordinator {
    session: Rc<Session>,
}

impl BubbleCoordinator {
    /// Resolve the page elements, start the frame loop and timers, then render
    /// the cached snapshot or schedule the first fetch.
    pub fn mount(config: BubbleConfig) -> Result<Self, AppError> {
        let config = config.validate()?;
        let window = web_sys::window().ok_or(DomError::Unavailable("window"))?;
        let document = window.document().ok_or(DomError::Unavailable("document"))?;
        let container = query_one(&document, &config.selectors.container)?;
        let svg = query_one(&document, &config.selectors.svg)?;
        let view = container_view(&container);

        let (sender, receiver) = mpsc::unbounded();
        let renderer = SvgRenderer::new(
            document.clone(),
            svg,
            config.transition_ms,
            config.detail_page.clone(),
            sender.clone(),
        )?;
        renderer.set_size(view)?;

        let seed = random_seed();
        let clock: Arc<dyn TimeProvider> = Arc::new(BrowserTimeProvider::new());
        let core = Core {
            cache: CacheStore::new(
                LocalStorageBackend::new(),
                Arc::clone(&clock),
                config.cache_key.clone(),
                config.cache_ttl_ms,
            ),
            gate: RefreshGate::new(),
            abort: None,
            simulation: Simulation::with_default_forces(config.simulation_settings(), view, seed),
            renderer,
            rng: SmallRng::seed_from_u64(seed.rotate_left(17)),
            rendered_timeframe: config.default_timeframe,
            last_frame_ms: 0.0,
            events: receiver,
        };

        let active_selector = format!("{}.active", config.selectors.timeframe_buttons);
        let timeframe = query_one(&document, &active_selector)
            .ok()
            .map(|button| Timeframe::from_attribute(button.get_attribute("data-timeframe").as_deref()))
            .unwrap_or(config.default_timeframe);

        let session = Rc::new(Session {
            refresh: RefreshService::new(BubbleMappingService::new(config.mapping_settings())),
            client: CoinGeckoClient::from_config(&config),
            clock,
            container,
            ui_state: UiState::new(timeframe),
            events: sender,
            core: RefCell::new(core),
            resources: RefCell::new(Resources::default()),
            destroyed: Cell::new(false),
            config,
        });

        Session::bind(&session, &window, &document)?;
        log_info!(
            LogComponent::Application("Coordinator"),
            "🚀 Bubble chart mounted ({}x{}, {})",
            view.width,
            view.height,
            timeframe
        );

        if !session.render_cached(timeframe) {
            session.trigger_refresh();
        }
        Ok(Self { session })
    }

    /// Switch the timeframe as if its button was clicked.
    pub fn set_timeframe(&self, timeframe: Timeframe) {
        if self.session.destroyed.get() {
            return;
        }
        self.session.ui_state.timeframe.set(timeframe);
        self.session.trigger_refresh();
    }

    pub fn timeframe(&self) -> Timeframe {
        self.session.ui_state.timeframe.get_untracked()
    }

    /// Debounced refresh; dropped while a fetch is in flight.
    pub fn refresh(&self) {
        self.session.trigger_refresh();
    }

    /// A fetch cycle is running; `refresh` calls are dropped until it ends.
    pub fn is_fetching(&self) -> bool {
        self.session.ui_state.fetching.get_untracked()
    }

    /// Reactive state of the chart, for hosts that render their own controls.
    pub fn ui_state(&self) -> UiState {
        self.session.ui_state
    }

    pub fn node_count(&self) -> usize {
        self.session.core.borrow().simulation.len()
    }

    pub fn is_destroyed(&self) -> bool {
        self.session.destroyed.get()
    }

    pub fn destroy(&self) {
        self.session.destroy();
    }
}

impl Session {
    fn bind(session: &Rc<Self>, window: &web_sys::Window, document: &web_sys::Document) -> Result<(), AppError> {
        let weak = Rc::downgrade(session);
        let config = &session.config;

        let ui = DomUi::bind(document, &config.selectors, session.ui_state, config.error_banner_ms, {
            let weak = Weak::clone(&weak);
            move |timeframe| {
                if let Some(session) = weak.upgrade() {
                    log_debug!(LogComponent::Application("Coordinator"), "Timeframe button: {}", timeframe);
                    session.trigger_refresh();
                }
            }
        })?;

        let debouncer = Debouncer::new(config.debounce_ms, {
            let weak = Weak::clone(&weak);
            move || {
                if let Some(session) = weak.upgrade() {
                    session.start_cycle();
                }
            }
        });

        let interval = Interval::new(config.refresh_interval_ms, {
            let weak = Weak::clone(&weak);
            move || {
                if let Some(session) = weak.upgrade() {
                    session.trigger_refresh();
                }
            }
        });

        let frame_loop = FrameLoop::start({
            let weak = Weak::clone(&weak);
            move |timestamp| {
                if let Some(session) = weak.upgrade() {
                    session.on_frame(timestamp);
                }
            }
        })?;

        let resize = {
            let events = session.events.clone();
            EventListener::new(window, "resize", move |_| {
                let _ = events.unbounded_send(ChartEvent::Resize);
            })
        };
        let pagehide = {
            let weak = Weak::clone(&weak);
            EventListener::new(window, "pagehide", move |_| {
                if let Some(session) = weak.upgrade() {
                    session.destroy();
                }
            })
        };

        let mut resources = session.resources.borrow_mut();
        resources.ui = Some(ui);
        resources.debouncer = Some(debouncer);
        resources.interval = Some(interval);
        resources.frame_loop = Some(frame_loop);
        resources.window_listeners = vec![resize, pagehide];
        Ok(())
    }

    /// Entry point of the button, timer and API triggers.
    fn trigger_refresh(&self) {
        if self.destroyed.get() {
            return;
        }
        if self.core.borrow().gate.is_in_flight() {
            log_debug!(LogComponent::Application("Coordinator"), "Fetch in flight, trigger dropped");
            return;
        }
        if let Some(debouncer) = self.resources.borrow().debouncer.as_ref() {
            debouncer.trigger();
        }
    }

    fn start_cycle(self: &Rc<Self>) {
        if self.destroyed.get() {
            return;
        }
        let (ticket, registration) = {
            let mut core = self.core.borrow_mut();
            let Some(ticket) = core.gate.try_begin() else {
                log_debug!(LogComponent::Application("Coordinator"), "Already fetching, skipping");
                return;
            };
            let (handle, registration) = AbortHandle::new_pair();
            core.abort = Some(handle);
            (ticket, registration)
        };
        // Set after the core borrow ends; effects may call back into the session.
        self.ui_state.fetching.set(true);

        log_debug!(LogComponent::Application("Coordinator"), "Fetch cycle #{} started", ticket.generation());
        let weak = Rc::downgrade(self);
        let client = self.client.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = Abortable::new(client.fetch_markets(), registration).await;
            let Some(session) = weak.upgrade() else { return };
            match result {
                Ok(result) => session.complete_cycle(ticket, result),
                Err(_) => {
                    log_debug!(LogComponent::Application("Coordinator"), "Fetch cycle #{} aborted", ticket.generation());
                }
            }
        });
    }

    fn complete_cycle(&self, ticket: FetchTicket, result: Result<serde_json::Value, FetchError>) {
        let mut core = self.core.borrow_mut();
        if !core.gate.finish(ticket) {
            log_debug!(LogComponent::Application("Coordinator"), "Discarding stale cycle #{}", ticket.generation());
            return;
        }
        core.abort = None;

        let timeframe = self.ui_state.timeframe.get_untracked();
        let center = core.simulation.view().center();
        let Core { cache, rng, .. } = &mut *core;
        let outcome = self.refresh.resolve(result.map_err(AppError::from), cache, timeframe, center, rng);
        self.apply(&mut core, outcome, timeframe);
        drop(core);
        self.ui_state.fetching.set(false);
    }

    fn render_cached(&self, timeframe: Timeframe) -> bool {
        let mut core = self.core.borrow_mut();
        let center = core.simulation.view().center();
        let Core { cache, rng, .. } = &mut *core;
        match self.refresh.from_cache(cache, timeframe, center, rng) {
            Some(outcome) => {
                self.apply(&mut core, outcome, timeframe);
                true
            }
            None => false,
        }
    }

    fn apply(&self, core: &mut Core, outcome: CycleOutcome, timeframe: Timeframe) {
        for banner in &outcome.banners {
            self.ui_state.show_banner(banner.clone());
        }

        let now = core.last_frame_ms;
        let Core { simulation, renderer, .. } = &mut *core;
        let drawn = commit_nodes(simulation, outcome.nodes, |nodes| renderer.render(nodes, now).map(drop));
        if let Err(e) = drawn {
            log_error!(LogComponent::Application("Coordinator"), "Render failed: {}", e);
            return;
        }
        let nodes: Vec<BubbleNode> = core.simulation.nodes().cloned().collect();
        core.renderer.update(&nodes, now);
        core.rendered_timeframe = timeframe;

        self.ui_state.node_count.set(nodes.len());
        self.ui_state.last_updated.set(Some(format_last_updated(self.clock.current_timestamp())));
        log_info!(
            LogComponent::Application("Coordinator"),
            "Rendered {} bubbles from {} ({})",
            nodes.len(),
            outcome.origin,
            timeframe
        );
    }

    fn on_frame(&self, timestamp: f64) {
        let Ok(mut core) = self.core.try_borrow_mut() else {
            return;
        };
        core.last_frame_ms = timestamp;
        self.drain_events(&mut core);
        core.simulation.tick();
        let Core { simulation, renderer, .. } = &mut *core;
        renderer.update(simulation.nodes(), timestamp);
    }

    fn drain_events(&self, core: &mut Core) {
        while let Ok(Some(event)) = core.events.try_next() {
            match event {
                ChartEvent::HoverEnter { id, page_x, page_y } => {
                    core.simulation.hover_enter(&id);
                    if let Some(node) = core.simulation.node(&id) {
                        let html = TooltipContent::new(node, core.rendered_timeframe).to_html();
                        self.ui_state.show_tooltip(TooltipView { html, page_x, page_y });
                    }
                }
                ChartEvent::HoverExit { id } => {
                    core.simulation.hover_exit(&id);
                    self.ui_state.hide_tooltip();
                }
                ChartEvent::Resize => {
                    let view = container_view(&self.container);
                    if view == core.simulation.view() {
                        continue;
                    }
                    if let Err(e) = core.renderer.set_size(view) {
                        log_warn!(LogComponent::Application("Coordinator"), "Resize failed: {}", e);
                    }
                    core.simulation.resize(view);
                    log_debug!(LogComponent::Application("Coordinator"), "Resized to {}x{}", view.width, view.height);
                }
            }
        }
    }

    /// Abort the in-flight cycle, stop timers and frames, unbind listeners and
    /// clear the chart. Idempotent.
    fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }

        // Effects are disposed by `unbind`; hide while they still run.
        self.ui_state.hide_tooltip();
        self.ui_state.hide_banner();

        let resources = std::mem::take(&mut *self.resources.borrow_mut());
        if let Some(debouncer) = &resources.debouncer {
            debouncer.cancel();
        }
        if let Some(frame_loop) = &resources.frame_loop {
            frame_loop.stop();
        }
        if let Some(mut ui) = resources.ui {
            ui.unbind();
        }
        drop(resources.interval);
        drop(resources.window_listeners);

        if let Ok(mut core) = self.core.try_borrow_mut() {
            if let Some(handle) = core.abort.take() {
                handle.abort();
            }
            core.gate.invalidate();
            core.simulation.clear();
            core.renderer.detach();
        }
        self.ui_state.fetching.set(false);
        log_info!(LogComponent::Application("Coordinator"), "Bubble chart destroyed");
    }
}

fn container_view(container: &Element) -> ViewState {
    ViewState::new(container.client_width() as f64, container.client_height() as f64)
}
