#![cfg(feature = "render")]
use futures::channel::mpsc::unbounded;
use meme_bubbles_wasm::domain::bubble::BubbleNode;
use meme_bubbles_wasm::infrastructure::rendering::{ChartEvent, SvgRenderer};
use meme_bubbles_wasm::view_state::ViewState;
use wasm_bindgen_test::*;
use web_sys::{Element, MouseEvent};

wasm_bindgen_test_configure!(run_in_browser);

fn svg_root() -> (web_sys::Document, Element) {
    let document = web_sys::window().unwrap().document().unwrap();
    let svg = document.create_element_ns(Some("http://www.w3.org/2000/svg"), "svg").unwrap();
    document.body().unwrap().append_child(&svg).unwrap();
    (document, svg)
}

fn coin(id: &str, x: f64) -> BubbleNode {
    let mut node = BubbleNode::new(id, 40.0, x, 100.0);
    node.change = 2.5;
    node.image = format!("https://example.com/{id}.png");
    node
}

#[wasm_bindgen_test]
fn renders_one_group_per_node() {
    let (document, svg) = svg_root();
    let (tx, _rx) = unbounded();
    let mut renderer = SvgRenderer::new(document, svg.clone(), 500.0, "chart.html", tx).unwrap();
    renderer.set_size(ViewState::new(640.0, 480.0)).unwrap();

    let nodes = vec![coin("pepe", 100.0), coin("bonk", 300.0)];
    let join = renderer.render(&nodes, 0.0).unwrap();
    renderer.update(&nodes, 0.0);

    assert_eq!(join.entering, ["pepe", "bonk"]);
    assert_eq!(svg.query_selector_all("g.bubble").unwrap().length(), 2);
    assert_eq!(svg.get_attribute("width").as_deref(), Some("640"));

    let first = svg.query_selector("g.bubble").unwrap().unwrap();
    assert_eq!(first.get_attribute("transform").as_deref(), Some("translate(100,100)"));
    let label = first.query_selector("text").unwrap().unwrap();
    assert_eq!(label.text_content().as_deref(), Some("+2.5%"));

    renderer.detach();
    assert_eq!(svg.child_element_count(), 0);
    svg.remove();
}

#[wasm_bindgen_test]
fn exiting_bubble_is_removed_after_fade() {
    let (document, svg) = svg_root();
    let (tx, _rx) = unbounded();
    let mut renderer = SvgRenderer::new(document, svg.clone(), 500.0, "chart.html", tx).unwrap();

    let both = vec![coin("pepe", 100.0), coin("bonk", 300.0)];
    renderer.render(&both, 0.0).unwrap();
    renderer.update(&both, 500.0);

    let one = vec![coin("pepe", 100.0)];
    let join = renderer.render(&one, 1_000.0).unwrap();
    assert_eq!(join.exiting, ["bonk"]);
    assert_eq!(renderer.ids(), ["pepe"]);

    renderer.update(&one, 1_250.0);
    assert_eq!(renderer.element_count(), 2);

    renderer.update(&one, 1_500.0);
    assert_eq!(renderer.element_count(), 1);
    assert_eq!(svg.query_selector_all("g.bubble").unwrap().length(), 1);

    renderer.detach();
    svg.remove();
}

#[wasm_bindgen_test]
fn hover_is_queued_on_the_channel() {
    let (document, svg) = svg_root();
    let (tx, mut rx) = unbounded();
    let mut renderer = SvgRenderer::new(document, svg.clone(), 500.0, "chart.html", tx).unwrap();
    renderer.render(&[coin("pepe", 100.0)], 0.0).unwrap();

    let group = svg.query_selector("g.bubble").unwrap().unwrap();
    group.dispatch_event(&MouseEvent::new("mouseenter").unwrap()).unwrap();
    group.dispatch_event(&MouseEvent::new("mouseleave").unwrap()).unwrap();

    match rx.try_next() {
        Ok(Some(ChartEvent::HoverEnter { id, .. })) => assert_eq!(id, "pepe"),
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(rx.try_next().ok().flatten(), Some(ChartEvent::HoverExit { id: "pepe".into() }));

    renderer.detach();
    svg.remove();
}
