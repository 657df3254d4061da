use chrono::DateTime;

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const MS_IN_MIN: i64 = Self::MS_IN_S * 60;
    pub const MS_IN_15_MIN: i64 = Self::MS_IN_S * 60 * 15;
    pub const MS_IN_H: i64 = Self::MS_IN_MIN * 60;
    pub const MS_IN_4_H: i64 = Self::MS_IN_MIN * 60 * 4;
    pub const MS_IN_D: i64 = Self::MS_IN_H * 24;
    pub const MS_IN_W: i64 = Self::MS_IN_D * 7;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
    pub const CHART_TIME_FORMAT: &str = "%m-%d %H:%M";
}

/// Format a chart timestamp (epoch ms as f64) for axis labels and tooltips.
/// Returns an empty string for values chrono cannot represent.
pub fn epoch_ms_to_chart_label(epoch_ms: f64) -> String {
    if !epoch_ms.is_finite() {
        return String::new();
    }
    match DateTime::from_timestamp_millis(epoch_ms as i64) {
        Some(dt) => dt.format(TimeUtils::CHART_TIME_FORMAT).to_string(),
        None => String::new(),
    }
}

pub fn epoch_ms_to_utc(epoch_ms: i64) -> String {
    // Used for display purposes
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.format(TimeUtils::STANDARD_TIME_FORMAT).to_string(),
        None => String::new(),
    }
}

/// Human readable span, e.g. `3d 4h` or `45m`. Used by the measure tool.
pub fn format_span_ms(span_ms: f64) -> String {
    let total_min = (span_ms.abs() / TimeUtils::MS_IN_MIN as f64).round() as i64;
    let days = total_min / (60 * 24);
    let hours = (total_min / 60) % 24;
    let minutes = total_min % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_formatting_picks_largest_units() {
        assert_eq!(format_span_ms(45.0 * TimeUtils::MS_IN_MIN as f64), "45m");
        assert_eq!(format_span_ms(TimeUtils::MS_IN_H as f64 * 5.5), "5h 30m");
        assert_eq!(format_span_ms(-(TimeUtils::MS_IN_D as f64 * 3.0)), "3d 0h");
    }

    #[test]
    fn chart_label_rejects_non_finite() {
        assert_eq!(epoch_ms_to_chart_label(f64::NAN), "");
        assert_eq!(epoch_ms_to_chart_label(0.0), "01-01 00:00");
    }
}
