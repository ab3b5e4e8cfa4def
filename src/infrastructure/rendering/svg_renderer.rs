use super::transitions::Fade;
use crate::domain::{
    bubble::{BubbleNode, BubbleVisual, Reconciliation, detail_url},
    errors::DomError,
    logging::LogComponent,
};
use crate::view_state::ViewState;
use crate::{log_debug, log_warn};
use futures::channel::mpsc::UnboundedSender;
use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, MouseEvent};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Interaction queued for the next animation frame
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    HoverEnter { id: String, page_x: f64, page_y: f64 },
    HoverExit { id: String },
    Resize,
}

struct RenderedBubble {
    id: String,
    group: Element,
    circle: Element,
    image: Element,
    label: Element,
    opacity: f64,
    fade: Option<Fade>,
    exiting: bool,
    listeners: Vec<EventListener>,
}

impl RenderedBubble {
    fn apply_visual(&self, visual: &BubbleVisual) -> Result<(), DomError> {
        set_attr(&self.circle, "r", &visual.radius.to_string())?;

        self.image
            .set_attribute_ns(Some(XLINK_NS), "xlink:href", &visual.image_href)
            .map_err(|e| DomError::OperationFailed(format!("{e:?}")))?;
        set_attr(&self.image, "width", &visual.image_size.to_string())?;
        set_attr(&self.image, "height", &visual.image_size.to_string())?;
        set_attr(&self.image, "x", &visual.image_x.to_string())?;
        set_attr(&self.image, "y", &visual.image_y.to_string())?;

        set_attr(&self.label, "dy", &visual.label_dy.to_string())?;
        set_attr(&self.label, "fill", visual.label_color)?;
        set_attr(&self.label, "font-size", &visual.font_size.to_string())?;
        self.label.set_text_content(Some(&visual.label));
        Ok(())
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity;
        let _ = self.group.set_attribute("opacity", &format!("{opacity:.3}"));
    }
}

/// Keyed SVG binding of bubble nodes.
///
/// One `<g class="bubble">` per node id, faded in on enter and faded out then
/// removed on exit. Positions are pushed every frame by [`SvgRenderer::update`].
pub struct SvgRenderer {
    document: Document,
    svg: Element,
    layer: Element,
    bubbles: Vec<RenderedBubble>,
    transition_ms: f64,
    detail_page: String,
    events: UnboundedSender<ChartEvent>,
}

impl SvgRenderer {
    pub fn new(
        document: Document,
        svg: Element,
        transition_ms: f64,
        detail_page: impl Into<String>,
        events: UnboundedSender<ChartEvent>,
    ) -> Result<Self, DomError> {
        let layer = create_svg(&document, "g")?;
        svg.append_child(&layer).map_err(|e| DomError::OperationFailed(format!("{e:?}")))?;
        Ok(Self {
            document,
            svg,
            layer,
            bubbles: Vec::new(),
            transition_ms,
            detail_page: detail_page.into(),
            events,
        })
    }

    pub fn set_size(&self, view: ViewState) -> Result<(), DomError> {
        set_attr(&self.svg, "width", &view.width.to_string())?;
        set_attr(&self.svg, "height", &view.height.to_string())
    }

    /// Ids bound to live (non-exiting) elements, in DOM order.
    pub fn ids(&self) -> Vec<&str> {
        self.bubbles.iter().filter(|b| !b.exiting).map(|b| b.id.as_str()).collect()
    }

    /// Elements in the DOM, exiting ones included.
    pub fn element_count(&self) -> usize {
        self.bubbles.len()
    }

    /// Join `nodes` against the drawn bubbles.
    pub fn render(&mut self, nodes: &[BubbleNode], now_ms: f64) -> Result<Reconciliation, DomError> {
        let join = Reconciliation::between(self.ids(), nodes);

        for id in &join.exiting {
            if let Some(bubble) = self.bubbles.iter_mut().find(|b| !b.exiting && &b.id == id) {
                bubble.exiting = true;
                bubble.listeners.clear();
                bubble.fade = Some(Fade::fade_out(bubble.opacity, now_ms, self.transition_ms));
            }
        }

        for node in nodes {
            let visual = BubbleVisual::from_node(node);
            let position = self.bubbles.iter().position(|b| b.id == node.id);
            let index = match position {
                Some(index) => index,
                None => {
                    let bubble = self.create_bubble(&node.id)?;
                    self.bubbles.push(bubble);
                    self.bubbles.len() - 1
                }
            };

            let listeners = self.bind_handlers(&self.bubbles[index].group, &node.id);
            let transition_ms = self.transition_ms;
            let bubble = &mut self.bubbles[index];
            bubble.apply_visual(&visual)?;
            // A bubble caught mid-exit is revived from its current opacity.
            bubble.exiting = false;
            bubble.listeners = listeners;
            bubble.fade = Some(Fade::fade_in(bubble.opacity, now_ms, transition_ms));
        }

        log_debug!(
            LogComponent::Infrastructure("SvgRenderer"),
            "Join: {} entering, {} updating, {} exiting",
            join.entering.len(),
            join.updating.len(),
            join.exiting.len()
        );
        Ok(join)
    }

    /// Per-frame pass: move every bubble to its node's position, advance fades
    /// and drop bubbles whose exit finished.
    pub fn update<'a>(&mut self, nodes: impl IntoIterator<Item = &'a BubbleNode>, now_ms: f64) {
        for node in nodes {
            if let Some(bubble) = self.bubbles.iter().find(|b| !b.exiting && b.id == node.id) {
                let (x, y) = node.render_position();
                let _ = bubble.group.set_attribute("transform", &format!("translate({x},{y})"));
            }
        }

        for bubble in &mut self.bubbles {
            if let Some(fade) = bubble.fade {
                bubble.set_opacity(fade.opacity_at(now_ms));
                if fade.is_done(now_ms) {
                    bubble.fade = None;
                }
            }
        }

        self.bubbles.retain(|bubble| {
            let finished = bubble.exiting && bubble.fade.is_none();
            if finished {
                bubble.group.remove();
            }
            !finished
        });
    }

    /// Remove every bubble immediately.
    pub fn clear(&mut self) {
        for bubble in self.bubbles.drain(..) {
            bubble.group.remove();
        }
    }

    /// Remove the drawing layer from the SVG.
    pub fn detach(&mut self) {
        self.clear();
        self.layer.remove();
    }

    fn create_bubble(&self, id: &str) -> Result<RenderedBubble, DomError> {
        let group = create_svg(&self.document, "g")?;
        set_attr(&group, "class", "bubble")?;
        set_attr(&group, "opacity", "0")?;

        let circle = create_svg(&self.document, "circle")?;
        set_attr(&circle, "class", "outer-ring")?;
        let image = create_svg(&self.document, "image")?;
        let label = create_svg(&self.document, "text")?;
        set_attr(&label, "class", "change")?;

        for child in [&circle, &image, &label] {
            group.append_child(child).map_err(|e| DomError::OperationFailed(format!("{e:?}")))?;
        }
        self.layer.append_child(&group).map_err(|e| DomError::OperationFailed(format!("{e:?}")))?;

        Ok(RenderedBubble {
            id: id.to_string(),
            group,
            circle,
            image,
            label,
            opacity: 0.0,
            fade: None,
            exiting: false,
            listeners: Vec::new(),
        })
    }

    fn bind_handlers(&self, group: &Element, id: &str) -> Vec<EventListener> {
        let enter = {
            let id = id.to_string();
            let events = self.events.clone();
            EventListener::new(group, "mouseenter", move |event| {
                let (page_x, page_y) = event
                    .dyn_ref::<MouseEvent>()
                    .map(|e| (e.page_x() as f64, e.page_y() as f64))
                    .unwrap_or_default();
                let _ = events.unbounded_send(ChartEvent::HoverEnter { id: id.clone(), page_x, page_y });
            })
        };

        let leave = {
            let id = id.to_string();
            let events = self.events.clone();
            EventListener::new(group, "mouseleave", move |_| {
                let _ = events.unbounded_send(ChartEvent::HoverExit { id: id.clone() });
            })
        };

        let click = {
            let url = detail_url(&self.detail_page, id);
            EventListener::new(group, "click", move |_| {
                let Some(window) = web_sys::window() else { return };
                if let Err(e) = window.location().set_href(&url) {
                    log_warn!(LogComponent::Infrastructure("SvgRenderer"), "Navigation failed: {:?}", e);
                }
            })
        };

        vec![enter, leave, click]
    }
}

fn create_svg(document: &Document, tag: &str) -> Result<Element, DomError> {
    document
        .create_element_ns(Some(SVG_NS), tag)
        .map_err(|e| DomError::OperationFailed(format!("create <{tag}>: {e:?}")))
}

fn set_attr(element: &Element, name: &str, value: &str) -> Result<(), DomError> {
    element
        .set_attribute(name, value)
        .map_err(|e| DomError::OperationFailed(format!("set {name}: {e:?}")))
}
