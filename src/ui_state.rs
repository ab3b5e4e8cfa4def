use crate::domain::market_data::Timeframe;
use leptos::*;

/// Tooltip request: rendered markup plus the cursor it follows
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipView {
    pub html: String,
    pub page_x: f64,
    pub page_y: f64,
}

/// Reactive UI state of one mounted chart.
///
/// Every field is a `Copy` signal handle, so the struct is passed by value
/// into listeners and effects.
#[derive(Clone, Copy)]
pub struct UiState {
    pub timeframe: RwSignal<Timeframe>,
    pub banner: RwSignal<Option<String>>,
    pub last_updated: RwSignal<Option<String>>,
    pub tooltip: RwSignal<Option<TooltipView>>,
    pub node_count: RwSignal<usize>,
    /// True from the start of a fetch cycle until its result is applied
    pub fetching: RwSignal<bool>,
}

impl UiState {
    pub fn new(timeframe: Timeframe) -> Self {
        Self {
            timeframe: create_rw_signal(timeframe),
            banner: create_rw_signal(None),
            last_updated: create_rw_signal(None),
            tooltip: create_rw_signal(None),
            node_count: create_rw_signal(0),
            fetching: create_rw_signal(false),
        }
    }

    pub fn show_banner(&self, message: impl Into<String>) {
        self.banner.set(Some(message.into()));
    }

    pub fn hide_banner(&self) {
        self.banner.set(None);
    }

    pub fn show_tooltip(&self, view: TooltipView) {
        self.tooltip.set(Some(view));
    }

    pub fn hide_tooltip(&self) {
        self.tooltip.set(None);
    }
}
