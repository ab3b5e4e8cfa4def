use super::entities::BubbleNode;
use crate::domain::market_data::Timeframe;
use num_format::{Locale, ToFormattedString};
use std::collections::HashSet;

pub const GAIN_COLOR: &str = "#10b981";
pub const LOSS_COLOR: &str = "#ef4444";

/// Keyed diff between the drawn bubbles and the next node set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub entering: Vec<String>,
    pub updating: Vec<String>,
    pub exiting: Vec<String>,
}

impl Reconciliation {
    /// `entering`/`updating` follow node order, `exiting` follows `previous`.
    pub fn between<'a>(
        previous: impl IntoIterator<Item = &'a str>,
        next: &[BubbleNode],
    ) -> Self {
        let previous: Vec<&str> = previous.into_iter().collect();
        let before: HashSet<&str> = previous.iter().copied().collect();
        let after: HashSet<&str> = next.iter().map(|n| n.id.as_str()).collect();

        let (updating, entering): (Vec<_>, Vec<_>) =
            next.iter().map(|n| n.id.clone()).partition(|id| before.contains(id.as_str()));
        let exiting = previous
            .into_iter()
            .filter(|id| !after.contains(id))
            .map(str::to_string)
            .collect();

        Self { entering, updating, exiting }
    }

    pub fn is_noop(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }
}

/// SVG attributes of one bubble derived from its node
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleVisual {
    pub radius: f64,
    pub image_href: String,
    pub image_size: f64,
    pub image_x: f64,
    pub image_y: f64,
    pub label: String,
    pub label_dy: f64,
    pub label_color: &'static str,
    pub font_size: f64,
}

impl BubbleVisual {
    pub fn from_node(node: &BubbleNode) -> Self {
        let r = node.radius;
        Self {
            radius: r,
            image_href: node.image.clone(),
            image_size: (r * 0.6).min(32.0),
            image_x: -(r * 0.3).min(16.0),
            image_y: -(r * 0.5).min(24.0),
            label: change_label(node.change),
            label_dy: r * 0.4,
            label_color: if node.is_gaining() { GAIN_COLOR } else { LOSS_COLOR },
            font_size: (r * 0.4).min(14.0),
        }
    }
}

/// `+5.0%`, `-3.2%`, `0.0%`
pub fn change_label(change: f64) -> String {
    let sign = if change > 0.0 { "+" } else { "" };
    format!("{sign}{change:.1}%")
}

/// Hover card content for one bubble
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub image: String,
    pub name: String,
    pub symbol: String,
    pub price: String,
    pub change_label: String,
    pub change: String,
    pub market_cap: String,
}

impl TooltipContent {
    pub fn new(node: &BubbleNode, timeframe: Timeframe) -> Self {
        Self {
            image: node.image.clone(),
            name: node.id.clone(),
            symbol: node.symbol.clone(),
            price: format_fixed(node.value, 2),
            change_label: timeframe.label(),
            change: format_fixed(node.change, 2),
            market_cap: format_grouped(node.market_cap),
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            "<img src=\"{image}\" alt=\"{name}\">\
             <strong>Name:</strong> {name}<br>\
             <strong>Symbol:</strong> {symbol}<br>\
             <strong>Price:</strong> ${price}<br>\
             <strong>{tf} Change:</strong> {change}%<br>\
             <strong>Market Cap:</strong> ${cap}",
            image = escape_html(&self.image),
            name = escape_html(&self.name),
            symbol = escape_html(&self.symbol),
            price = self.price,
            tf = self.change_label,
            change = self.change,
            cap = self.market_cap,
        )
    }
}

fn format_fixed(value: f64, digits: usize) -> String {
    if value.is_finite() { format!("{value:.digits$}") } else { "N/A".to_string() }
}

/// Thousands-grouped number with at most three decimals, e.g. `1,234,567.5`.
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let grouped = int_part
        .parse::<u64>()
        .map(|n| n.to_formatted_string(&Locale::en))
        .unwrap_or_else(|_| int_part.to_string());

    let sign = if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Tooltip offset from the cursor
pub const TOOLTIP_OFFSET_X: f64 = 20.0;
pub const TOOLTIP_OFFSET_Y: f64 = 50.0;

/// Top-left of the tooltip for a cursor at (`page_x`, `page_y`).
///
/// Placed right of and above the cursor; flipped left when it would overflow
/// `window_width`, and below the cursor when it would go above the page.
pub fn tooltip_position(page_x: f64, page_y: f64, tooltip_width: f64, window_width: f64) -> (f64, f64) {
    let mut left = page_x + TOOLTIP_OFFSET_X;
    let mut top = page_y - TOOLTIP_OFFSET_Y;
    if left + tooltip_width > window_width {
        left = page_x - tooltip_width - TOOLTIP_OFFSET_X;
    }
    if top < 0.0 {
        top = page_y + TOOLTIP_OFFSET_X;
    }
    (left, top)
}

/// Detail page link for a coin, e.g. `chart.html?coin=dogecoin`.
pub fn detail_url(detail_page: &str, coin_id: &str) -> String {
    format!("{detail_page}?coin={}", urlencoding::encode(coin_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_numbers() {
        assert_eq!(format_grouped(1_000_000_000.0), "1,000,000,000");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1234.5), "1,234.5");
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(-12345.678), "-12,345.678");
        assert_eq!(format_grouped(4.2e19), "42000000000000000000");
    }

    #[test]
    fn labels_carry_sign() {
        assert_eq!(change_label(5.0), "+5.0%");
        assert_eq!(change_label(-3.04), "-3.0%");
        assert_eq!(change_label(0.0), "0.0%");
    }

    #[test]
    fn query_component_is_encoded() {
        assert_eq!(detail_url("chart.html", "shiba-inu"), "chart.html?coin=shiba-inu");
        assert_eq!(detail_url("chart.html", "a b&c"), "chart.html?coin=a%20b%26c");
    }

    #[test]
    fn html_is_escaped() {
        assert_eq!(escape_html("<b>\"x\"</b>"), "&lt;b&gt;&quot;x&quot;&lt;/b&gt;");
    }
}
