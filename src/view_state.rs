/// Drawable area of the bubble chart in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0 }
    }
}

impl ViewState {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width: width.max(0.0), height: height.max(0.0) }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Apply a new container size. Returns whether anything changed.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        let next = Self::new(width, height);
        let changed = next != *self;
        *self = next;
        changed
    }

    /// Keep a circle of `radius` inside the view. When the view is narrower
    /// than the circle the lower bound wins.
    pub fn clamp(&self, x: f64, y: f64, radius: f64) -> (f64, f64) {
        (clamp_axis(x, radius, self.width), clamp_axis(y, radius, self.height))
    }
}

fn clamp_axis(value: f64, radius: f64, extent: f64) -> f64 {
    radius.max(value.min(extent - radius))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_circle_inside() {
        let view = ViewState::new(400.0, 300.0);
        assert_eq!(view.clamp(-10.0, 500.0, 40.0), (40.0, 260.0));
        assert_eq!(view.clamp(200.0, 150.0, 40.0), (200.0, 150.0));
    }

    #[test]
    fn tiny_view_pins_to_radius() {
        let view = ViewState::new(50.0, 50.0);
        assert_eq!(view.clamp(25.0, 0.0, 40.0), (40.0, 40.0));
    }

    #[test]
    fn resize_reports_changes() {
        let mut view = ViewState::default();
        assert!(!view.resize(800.0, 600.0));
        assert!(view.resize(1024.0, 768.0));
        assert_eq!(view.center(), (512.0, 384.0));
    }
}
