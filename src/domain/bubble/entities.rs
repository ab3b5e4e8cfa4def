use serde::{Deserialize, Serialize};

/// Domain entity - one coin laid out as a floating circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleNode {
    pub id: String,
    pub radius: f64,
    /// Current price in USD
    pub value: f64,
    /// Percentage change for the active timeframe
    pub change: f64,
    pub symbol: String,
    pub image: String,
    pub market_cap: f64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub is_hovered: bool,
    pub fixed: Option<(f64, f64)>,
}

impl BubbleNode {
    pub fn new(id: impl Into<String>, radius: f64, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            radius,
            value: 0.0,
            change: 0.0,
            symbol: String::new(),
            image: String::new(),
            market_cap: 0.0,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            is_hovered: false,
            fixed: None,
        }
    }

    /// Where the bubble is drawn: the pinned spot while hovered, else its
    /// simulated position.
    pub fn render_position(&self) -> (f64, f64) {
        self.fixed.unwrap_or((self.x, self.y))
    }

    pub fn is_gaining(&self) -> bool {
        self.change > 0.0
    }

    pub fn pin(&mut self, x: f64, y: f64) {
        self.is_hovered = true;
        self.fixed = Some((x, y));
        self.vx = 0.0;
        self.vy = 0.0;
    }

    pub fn release(&mut self) {
        self.is_hovered = false;
        self.fixed = None;
    }
}
