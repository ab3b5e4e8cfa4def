use meme_bubbles_wasm::domain::bubble::BubbleNode;
use meme_bubbles_wasm::domain::errors::MappingError;
use meme_bubbles_wasm::domain::market_data::{
    BubbleMappingService, MappingSettings, Timeframe, mock_markets,
};
use quickcheck_macros::quickcheck;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde_json::{Value, json};

const CENTER: (f64, f64) = (400.0, 300.0);

fn map(raw: &Value, timeframe: Timeframe) -> Result<Vec<BubbleNode>, MappingError> {
    let mut rng = SmallRng::seed_from_u64(7);
    BubbleMappingService::default().map_to_nodes(raw, timeframe, CENTER, &mut rng)
}

fn coin(id: &str) -> Value {
    json!({ "id": id, "market_cap": 4.0e10, "current_price": 1.0, "symbol": id })
}

#[quickcheck]
fn radius_never_below_minimum(cap: f64) -> bool {
    let service = BubbleMappingService::default();
    let radius = service.radius_for(Some(cap));
    if !(cap > 0.0) {
        return radius == 40.0;
    }
    radius >= 40.0 && radius == (cap.sqrt() / 4000.0).max(40.0)
}

#[test]
fn radius_grows_with_market_cap() {
    let service = BubbleMappingService::default();
    assert_eq!(service.radius_for(None), 40.0);
    assert_eq!(service.radius_for(Some(0.0)), 40.0);
    assert_eq!(service.radius_for(Some(1.0e9)), 40.0);
    // sqrt(1e11) / 4000 ~= 79.06
    assert!((service.radius_for(Some(1.0e11)) - 79.056_941_504).abs() < 1e-6);
}

#[test]
fn missing_timeframe_field_falls_back_to_24h() {
    let raw = json!([{
        "id": "pepe",
        "market_cap": 1.0e9,
        "price_change_percentage_1h_in_currency": 1.5,
        "price_change_percentage_24h": 3.0
    }]);
    assert_eq!(map(&raw, Timeframe::FourHours).unwrap()[0].change, 3.0);
    assert_eq!(map(&raw, Timeframe::OneHour).unwrap()[0].change, 1.5);
    assert_eq!(map(&raw, Timeframe::OneDay).unwrap()[0].change, 3.0);
}

#[test]
fn zero_change_falls_back_to_24h() {
    let raw = json!([{
        "id": "bonk",
        "price_change_percentage_1h_in_currency": 0.0,
        "price_change_percentage_24h": 3.0
    }]);
    assert_eq!(map(&raw, Timeframe::OneHour).unwrap()[0].change, 3.0);
}

#[test]
fn no_change_fields_means_zero() {
    let raw = json!([{ "id": "wif" }]);
    let node = &map(&raw, Timeframe::FourHours).unwrap()[0];
    assert_eq!(node.change, 0.0);
    assert_eq!(node.symbol, "UNKNOWN");
    assert_eq!(node.image, "https://via.placeholder.com/32");
    assert_eq!(node.market_cap, 0.0);
    assert_eq!(node.radius, 40.0);
}

#[test]
fn whole_response_errors() {
    assert_eq!(map(&json!({"error": "nope"}), Timeframe::OneHour), Err(MappingError::NotASequence));
    assert_eq!(map(&json!([]), Timeframe::OneHour), Err(MappingError::Empty));
    assert_eq!(
        map(&json!([{ "symbol": "x" }, 42, null]), Timeframe::OneHour),
        Err(MappingError::NoValidNodes)
    );
}

#[test]
fn records_without_id_are_skipped() {
    let raw = json!([{ "symbol": "anon" }, coin("dogecoin"), "garbage"]);
    let nodes = map(&raw, Timeframe::OneHour).unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].id, "dogecoin");
    assert_eq!(nodes[0].symbol, "DOGECOIN");
}

#[test]
fn only_first_page_is_used() {
    let raw = Value::Array((0..20).map(|i| coin(&format!("coin-{i}"))).collect());
    let nodes = map(&raw, Timeframe::OneHour).unwrap();
    assert_eq!(nodes.len(), 15);
    assert_eq!(nodes.last().unwrap().id, "coin-14");
}

#[test]
fn duplicate_ids_are_dropped() {
    let raw = json!([coin("floki"), coin("floki"), coin("brett")]);
    let ids: Vec<String> = map(&raw, Timeframe::OneHour).unwrap().into_iter().map(|n| n.id).collect();
    assert_eq!(ids, ["floki", "brett"]);
}

#[test]
fn nodes_spawn_around_the_center() {
    let raw = Value::Array((0..15).map(|i| coin(&format!("c{i}"))).collect());
    for node in map(&raw, Timeframe::OneHour).unwrap() {
        assert!((node.x - CENTER.0).abs() <= 50.0);
        assert!((node.y - CENTER.1).abs() <= 50.0);
        assert_eq!((node.vx, node.vy), (0.0, 0.0));
        assert!(!node.is_hovered);
    }
}

#[test]
fn zero_jitter_spawns_on_the_center() {
    let service = BubbleMappingService::new(MappingSettings { jitter: 0.0, ..MappingSettings::default() });
    let mut rng = SmallRng::seed_from_u64(1);
    let nodes = service.map_to_nodes(&mock_markets(), Timeframe::OneHour, CENTER, &mut rng).unwrap();
    assert!(nodes.iter().all(|n| (n.x, n.y) == CENTER));
}

#[test]
fn mock_dataset_maps_to_two_coins() {
    let nodes = map(&mock_markets(), Timeframe::FourHours).unwrap();
    let summary: Vec<(&str, &str, f64)> =
        nodes.iter().map(|n| (n.id.as_str(), n.symbol.as_str(), n.change)).collect();
    assert_eq!(summary, [("dogecoin", "DOGE", 3.0), ("shiba-inu", "SHIB", -1.0)]);
}
