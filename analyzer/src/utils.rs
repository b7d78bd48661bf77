use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ISO8601_DURATION: Regex = Regex::new(
        r"^P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$"
    )
    .expect("duration pattern is valid");
}

/// Parse ISO8601 duration string (P1DT2H3M4S, PT1H2M3S, P0D) to total seconds.
/// Returns `None` for anything that is not a duration with at least one component.
pub fn parse_iso8601_duration(duration_str: &str) -> Option<f64> {
    let captures = ISO8601_DURATION.captures(duration_str.trim())?;

    // weeks, days, hours, minutes, seconds
    const UNIT_SECONDS: [f64; 5] = [604_800.0, 86_400.0, 3_600.0, 60.0, 1.0];

    let mut total_seconds = 0.0;
    let mut any_component = false;
    for (index, unit) in UNIT_SECONDS.iter().enumerate() {
        if let Some(m) = captures.get(index + 1) {
            total_seconds += m.as_str().parse::<f64>().ok()? * unit;
            any_component = true;
        }
    }

    any_component.then_some(total_seconds)
}

/// Round to two decimal places, halves away from zero (0.125 -> 0.13).
/// Non-finite values pass through unchanged.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    (value * 100.0).round() / 100.0
}

/// `m:ss` rendering of a duration, e.g. 125.0 -> "2:05".
pub fn format_duration(duration_seconds: f64) -> String {
    let total = duration_seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Thousands separators, e.g. 1234567 -> "1,234,567".
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
