use crate::application::DomSelectors;
use crate::domain::{
    bubble::tooltip_position,
    errors::DomError,
    logging::LogComponent,
    market_data::Timeframe,
};
use crate::ui_state::UiState;
use crate::{log_debug, log_warn};
use gloo::events::EventListener;
use gloo_timers::callback::Timeout;
use leptos::{Disposer, SignalGet, SignalSet, as_child_of_current_owner, create_effect};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

/// Pushes [`UiState`] into the host page: timeframe buttons, error banner,
/// last-updated text and tooltip.
pub struct DomUi {
    state: UiState,
    buttons: Vec<Element>,
    button_listeners: Vec<EventListener>,
    banner_timeout: Rc<RefCell<Option<Timeout>>>,
    /// Owner of the DOM effects; dropping it disposes them.
    effects: Option<Disposer>,
}

impl DomUi {
    /// Resolve the page elements and install the effects. Missing optional
    /// elements are logged and skipped.
    pub fn bind(
        document: &Document,
        selectors: &DomSelectors,
        state: UiState,
        banner_ms: u32,
        on_timeframe: impl Fn(Timeframe) + 'static,
    ) -> Result<Self, DomError> {
        let buttons = query_all(document, &selectors.timeframe_buttons)?;
        if buttons.is_empty() {
            log_warn!(
                LogComponent::Infrastructure("DomUi"),
                "No timeframe buttons match '{}'",
                selectors.timeframe_buttons
            );
        }

        let on_timeframe = Rc::new(on_timeframe);
        let button_listeners = buttons
            .iter()
            .map(|button| {
                let attribute = button.get_attribute("data-timeframe");
                let on_timeframe = Rc::clone(&on_timeframe);
                EventListener::new(button, "click", move |_| {
                    let timeframe = Timeframe::from_attribute(attribute.as_deref());
                    state.timeframe.set(timeframe);
                    on_timeframe(timeframe);
                })
            })
            .collect();

        let mut ui = Self {
            state,
            buttons,
            button_listeners,
            banner_timeout: Rc::new(RefCell::new(None)),
            effects: None,
        };
        let ((), disposer) = as_child_of_current_owner(|()| {
            ui.bind_timeframe_buttons();
            ui.bind_banner(element_by_id(document, &selectors.error_message_id), banner_ms);
            ui.bind_last_updated(element_by_id(document, &selectors.last_updated_id));
            ui.bind_tooltip(element_by_id(document, &selectors.tooltip_id));
        })(());
        ui.effects = Some(disposer);
        Ok(ui)
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    fn bind_timeframe_buttons(&self) {
        let buttons = self.buttons.clone();
        let timeframe = self.state.timeframe;
        create_effect(move |_| {
            let active = timeframe.get().to_string();
            for button in &buttons {
                let is_active = button.get_attribute("data-timeframe").as_deref() == Some(active.as_str());
                let _ = button.class_list().toggle_with_force("active", is_active);
            }
        });
    }

    /// The banner hides itself `banner_ms` after the latest message.
    fn bind_banner(&self, element: Option<HtmlElement>, banner_ms: u32) {
        let Some(element) = element else { return };
        let banner = self.state.banner;
        let pending = Rc::clone(&self.banner_timeout);
        create_effect(move |_| match banner.get() {
            Some(message) => {
                element.set_text_content(Some(&message));
                let _ = element.style().set_property("display", "block");
                let hide = Timeout::new(banner_ms, move || banner.set(None));
                *pending.borrow_mut() = Some(hide);
            }
            None => {
                let _ = element.style().set_property("display", "none");
            }
        });
    }

    fn bind_last_updated(&self, element: Option<HtmlElement>) {
        let Some(element) = element else { return };
        let last_updated = self.state.last_updated;
        create_effect(move |_| {
            if let Some(text) = last_updated.get() {
                element.set_text_content(Some(&text));
            }
        });
    }

    fn bind_tooltip(&self, element: Option<HtmlElement>) {
        let Some(element) = element else { return };
        let tooltip = self.state.tooltip;
        create_effect(move |_| match tooltip.get() {
            Some(view) => {
                element.set_inner_html(&view.html);
                let _ = element.class_list().add_1("show");
                let width = element.get_bounding_client_rect().width();
                let window_width = web_sys::window()
                    .and_then(|w| w.inner_width().ok())
                    .and_then(|w| w.as_f64())
                    .unwrap_or(f64::INFINITY);
                let (left, top) = tooltip_position(view.page_x, view.page_y, width, window_width);
                let style = element.style();
                let _ = style.set_property("left", &format!("{left}px"));
                let _ = style.set_property("top", &format!("{top}px"));
            }
            None => {
                let _ = element.class_list().remove_1("show");
            }
        });
    }

    /// Cancel the banner timer, dispose the effects and unbind the buttons.
    /// Later state changes no longer reach the page.
    pub fn unbind(&mut self) {
        if let Some(timeout) = self.banner_timeout.borrow_mut().take() {
            timeout.cancel();
        }
        drop(self.effects.take());
        self.button_listeners.clear();
        log_debug!(LogComponent::Infrastructure("DomUi"), "UI listeners removed");
    }
}

/// `querySelector` resolved to the first match.
pub fn query_one(document: &Document, selector: &str) -> Result<Element, DomError> {
    document
        .query_selector(selector)
        .map_err(|e| DomError::OperationFailed(format!("invalid selector '{selector}': {e:?}")))?
        .ok_or_else(|| DomError::ElementNotFound(selector.to_string()))
}

pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, DomError> {
    let list = document
        .query_selector_all(selector)
        .map_err(|e| DomError::OperationFailed(format!("invalid selector '{selector}': {e:?}")))?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn element_by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    let element = document.get_element_by_id(id).and_then(|e| e.dyn_into::<HtmlElement>().ok());
    if element.is_none() {
        log_warn!(LogComponent::Infrastructure("DomUi"), "Element '#{}' not found in DOM", id);
    }
    element
}
