use meme_bubbles_wasm::domain::bubble::{
    BubbleNode, BubbleVisual, GAIN_COLOR, LOSS_COLOR, Reconciliation, TooltipContent, detail_url,
    tooltip_position,
};
use meme_bubbles_wasm::domain::market_data::{BubbleMappingService, Timeframe, mock_markets};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn mock_nodes(timeframe: Timeframe) -> Vec<BubbleNode> {
    let mut rng = SmallRng::seed_from_u64(5);
    BubbleMappingService::default()
        .map_to_nodes(&mock_markets(), timeframe, (400.0, 300.0), &mut rng)
        .unwrap()
}

fn node(id: &str) -> BubbleNode {
    BubbleNode::new(id, 40.0, 0.0, 0.0)
}

#[test]
fn first_render_enters_everything() {
    let next = vec![node("a"), node("b")];
    let diff = Reconciliation::between(std::iter::empty(), &next);
    assert_eq!(diff.entering, ["a", "b"]);
    assert!(diff.updating.is_empty());
    assert!(diff.exiting.is_empty());
}

#[test]
fn diff_is_keyed_by_id() {
    let next = vec![node("c"), node("a")];
    let diff = Reconciliation::between(["a", "b"], &next);
    assert_eq!(diff.entering, ["c"]);
    assert_eq!(diff.updating, ["a"]);
    assert_eq!(diff.exiting, ["b"]);
    assert!(!diff.is_noop());
}

#[test]
fn same_ids_only_update() {
    let next = vec![node("b"), node("a")];
    let diff = Reconciliation::between(["a", "b"], &next);
    assert_eq!(diff.updating, ["b", "a"]);
    assert!(diff.is_noop());
}

#[test]
fn empty_next_exits_everything() {
    let diff = Reconciliation::between(["a", "b"], &[]);
    assert_eq!(diff.exiting, ["a", "b"]);
}

#[test]
fn small_bubble_visual() {
    let nodes = mock_nodes(Timeframe::OneHour);
    let visual = BubbleVisual::from_node(&nodes[0]);
    assert_eq!(visual.radius, 40.0);
    assert_eq!(visual.image_size, 24.0);
    assert_eq!((visual.image_x, visual.image_y), (-12.0, -20.0));
    assert_eq!(visual.label, "+5.0%");
    assert_eq!(visual.label_dy, 16.0);
    assert_eq!(visual.label_color, GAIN_COLOR);
    assert_eq!(visual.font_size, 14.0);
}

#[test]
fn large_bubble_visual_is_capped() {
    let mut big = node("big");
    big.radius = 100.0;
    big.change = -2.34;
    let visual = BubbleVisual::from_node(&big);
    assert_eq!(visual.image_size, 32.0);
    assert_eq!((visual.image_x, visual.image_y), (-16.0, -24.0));
    assert_eq!(visual.font_size, 14.0);
    assert_eq!(visual.label_dy, 40.0);
    assert_eq!(visual.label, "-2.3%");
    assert_eq!(visual.label_color, LOSS_COLOR);
}

#[test]
fn flat_change_is_drawn_as_loss() {
    let visual = BubbleVisual::from_node(&node("flat"));
    assert_eq!(visual.label, "0.0%");
    assert_eq!(visual.label_color, LOSS_COLOR);
}

#[test]
fn tooltip_html_for_dogecoin() {
    let nodes = mock_nodes(Timeframe::OneHour);
    let html = TooltipContent::new(&nodes[0], Timeframe::OneHour).to_html();
    insta::assert_snapshot!(html, @r#"<img src="https://assets.coingecko.com/coins/images/1/small/dogecoin.png" alt="dogecoin"><strong>Name:</strong> dogecoin<br><strong>Symbol:</strong> DOGE<br><strong>Price:</strong> $0.10<br><strong>1H Change:</strong> 5.00%<br><strong>Market Cap:</strong> $1,000,000,000"#);
}

#[test]
fn tooltip_follows_timeframe_label() {
    let nodes = mock_nodes(Timeframe::FourHours);
    let content = TooltipContent::new(&nodes[1], Timeframe::FourHours);
    assert_eq!(content.change_label, "4H");
    assert_eq!(content.change, "-1.00");
    assert_eq!(content.market_cap, "500,000,000");
    assert_eq!(content.price, "0.00");
}

#[test]
fn tooltip_escapes_markup() {
    let mut evil = node("<script>");
    evil.symbol = "A&B".into();
    let html = TooltipContent::new(&evil, Timeframe::OneDay).to_html();
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("A&amp;B"));
    assert!(!html.contains("<script>"));
}

#[test]
fn tooltip_sits_right_and_above_cursor() {
    assert_eq!(tooltip_position(100.0, 200.0, 150.0, 1024.0), (120.0, 150.0));
}

#[test]
fn tooltip_flips_left_near_right_edge() {
    assert_eq!(tooltip_position(950.0, 200.0, 150.0, 1024.0), (780.0, 150.0));
}

#[test]
fn tooltip_drops_below_near_top() {
    assert_eq!(tooltip_position(100.0, 30.0, 150.0, 1024.0), (120.0, 50.0));
}

#[test]
fn detail_link_targets_coin() {
    assert_eq!(detail_url("chart.html", "dogecoin"), "chart.html?coin=dogecoin");
}
