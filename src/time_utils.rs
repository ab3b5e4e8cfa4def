use js_sys::Date;
use wasm_bindgen::JsValue;

/// Calendar fields of a local date/time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDateTime {
    pub year: u32,
    /// 1-based
    pub month: u32,
    pub day: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl LocalDateTime {
    /// Local-time components of a millisecond timestamp, via `Date`.
    pub fn from_millis(timestamp: u64) -> Self {
        let date = Date::new(&JsValue::from_f64(timestamp as f64));
        Self {
            year: date.get_full_year(),
            month: date.get_month() + 1,
            day: date.get_date(),
            hours: date.get_hours(),
            minutes: date.get_minutes(),
            seconds: date.get_seconds(),
        }
    }

    /// `YYYY-MM-DD HH:MM:SS`
    pub fn format(&self) -> String {
        format!(
            "{}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hours, self.minutes, self.seconds
        )
    }
}

/// Text of the "last updated" element for a render at `timestamp`.
pub fn format_last_updated(timestamp: u64) -> String {
    LocalDateTime::from_millis(timestamp).format()
}

#[cfg(test)]
mod tests {
    use super::LocalDateTime;

    #[test]
    fn pads_every_field() {
        let at = LocalDateTime { year: 2024, month: 3, day: 7, hours: 9, minutes: 5, seconds: 0 };
        assert_eq!(at.format(), "2024-03-07 09:05:00");
    }
}
