//! Second/minute conversions and `MM:SS` formatting.

/// Convert whole minutes to seconds.
pub fn minutes_to_seconds(min: u32) -> u32 {
    min.saturating_mul(60)
}

/// Convert seconds to whole minutes, truncating the remainder.
pub fn seconds_to_minutes(sec: u32) -> u32 {
    sec / 60
}

/// Render seconds as zero-padded `MM:SS`.
///
/// Minutes are not capped at 59: `3600` renders as `"60:00"`.
pub fn format_time(sec: u32) -> String {
    format!("{:02}:{:02}", sec / 60, sec % 60)
}

/// Clamp a user-entered minute value into `[min, max]`.
///
/// NaN falls back to `min`. In-range values are truncated to whole minutes.
pub fn clamp_minutes(value: f64, min: u32, max: u32) -> u32 {
    if value.is_nan() || value < f64::from(min) {
        return min;
    }
    if value > f64::from(max) {
        return max;
    }
    value as u32
}

/// Parse minute input from a text field.
///
/// Anything that is not a number becomes NaN, which [`clamp_minutes`] maps
/// to its lower bound.
pub fn parse_minutes(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_pads_minutes_and_seconds() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(5), "00:05");
        assert_eq!(format_time(60), "01:00");
        assert_eq!(format_time(90), "01:30");
        assert_eq!(format_time(1500), "25:00");
        assert_eq!(format_time(3599), "59:59");
    }

    #[test]
    fn format_time_does_not_wrap_hours() {
        assert_eq!(format_time(3600), "60:00");
        assert_eq!(format_time(7265), "121:05");
    }

    #[test]
    fn minute_conversions() {
        assert_eq!(minutes_to_seconds(25), 1500);
        assert_eq!(minutes_to_seconds(0), 0);
        assert_eq!(minutes_to_seconds(1), 60);
        assert_eq!(seconds_to_minutes(1500), 25);
        assert_eq!(seconds_to_minutes(0), 0);
        // truncates
        assert_eq!(seconds_to_minutes(90), 1);
    }

    #[test]
    fn clamp_minutes_bounds() {
        assert_eq!(clamp_minutes(25.0, 1, 60), 25);
        assert_eq!(clamp_minutes(0.0, 1, 60), 1);
        assert_eq!(clamp_minutes(-5.0, 1, 60), 1);
        assert_eq!(clamp_minutes(100.0, 1, 60), 60);
        assert_eq!(clamp_minutes(1.0, 1, 60), 1);
        assert_eq!(clamp_minutes(60.0, 1, 60), 60);
    }

    #[test]
    fn clamp_minutes_nan_is_min() {
        assert_eq!(clamp_minutes(f64::NAN, 1, 60), 1);
    }

    #[test]
    fn parse_minutes_rejects_text() {
        assert_eq!(parse_minutes(" 30 "), 30.0);
        assert!(parse_minutes("abc").is_nan());
        assert!(parse_minutes("").is_nan());
        assert_eq!(clamp_minutes(parse_minutes("abc"), 1, 60), 1);
    }
}
