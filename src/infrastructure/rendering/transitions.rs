/// Time-based opacity tween
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    from: f64,
    to: f64,
    start_ms: f64,
    duration_ms: f64,
}

impl Fade {
    pub fn new(from: f64, to: f64, start_ms: f64, duration_ms: f64) -> Self {
        Self { from, to, start_ms, duration_ms: duration_ms.max(0.0) }
    }

    pub fn fade_in(from: f64, start_ms: f64, duration_ms: f64) -> Self {
        Self::new(from, 1.0, start_ms, duration_ms)
    }

    pub fn fade_out(from: f64, start_ms: f64, duration_ms: f64) -> Self {
        Self::new(from, 0.0, start_ms, duration_ms)
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    /// Normalised progress in `[0, 1]`.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms == 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn opacity_at(&self, now_ms: f64) -> f64 {
        let t = ease_cubic_in_out(self.progress(now_ms));
        self.from + (self.to - self.from) * t
    }

    pub fn is_done(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

fn ease_cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_out_reaches_zero_after_duration() {
        let fade = Fade::fade_out(1.0, 1000.0, 500.0);
        assert_eq!(fade.opacity_at(1000.0), 1.0);
        assert!(!fade.is_done(1499.0));
        assert!(fade.is_done(1500.0));
        assert_eq!(fade.opacity_at(2000.0), 0.0);
    }

    #[test]
    fn midpoint_is_halfway() {
        let fade = Fade::fade_in(0.0, 0.0, 500.0);
        assert!((fade.opacity_at(250.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let fade = Fade::fade_in(0.2, 10.0, 0.0);
        assert!(fade.is_done(10.0));
        assert_eq!(fade.opacity_at(10.0), 1.0);
    }
}
