//! Human-readable duration formatting

/// Format a number of seconds as zero-padded `HH:MM:SS`.
///
/// Negative input renders as `00:00:00`. Hours are not wrapped, so a
/// duration past 99 hours widens the hour field.
pub fn format_duration(seconds: i64) -> String {
    if seconds < 0 {
        return "00:00:00".to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Parse the leading integer of form input, if any.
///
/// Leading whitespace and a sign are accepted and parsing stops at the first
/// non-digit, so `"90s"` reads as 90 seconds.
pub fn parse_leading_seconds(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Overlong digit runs saturate instead of failing.
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(format_duration(3661), "01:01:01");
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(59), "00:00:59");
        assert_eq!(format_duration(86_399), "23:59:59");
    }

    #[test]
    fn negative_seconds_render_as_zero() {
        assert_eq!(format_duration(-1), "00:00:00");
        assert_eq!(format_duration(i64::MIN), "00:00:00");
    }

    #[test]
    fn hours_are_not_wrapped() {
        assert_eq!(format_duration(360_000), "100:00:00");
    }

    #[test]
    fn non_numeric_input_has_no_seconds() {
        assert_eq!(parse_leading_seconds("abc"), None);
        assert_eq!(parse_leading_seconds(""), None);
        assert_eq!(parse_leading_seconds("-"), None);
    }

    #[test]
    fn input_parses_leading_integer() {
        assert_eq!(parse_leading_seconds("3661"), Some(3661));
        assert_eq!(parse_leading_seconds("  90s"), Some(90));
        assert_eq!(parse_leading_seconds("+5"), Some(5));
        assert_eq!(parse_leading_seconds("-30"), Some(-30));
        assert_eq!(parse_leading_seconds("12.9"), Some(12));
    }
}
