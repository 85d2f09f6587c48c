//! Human-readable size and rate formatting.

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Formats a byte count as a human-readable size.
///
/// At most two decimals, trailing zeros trimmed: `1024` → `"1 KB"`,
/// `1536` → `"1.5 KB"`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".into();
    }
    let (value, unit) = scale(bytes as f64);
    format!("{} {unit}", trim_decimals(value))
}

/// Formats a transfer rate in bytes per second.
pub fn format_speed(bytes_per_sec: f64) -> String {
    if bytes_per_sec <= 0.0 {
        return "0 Bytes/s".into();
    }
    let (value, unit) = scale(bytes_per_sec);
    format!("{} {unit}/s", trim_decimals(value))
}

fn scale(mut value: f64) -> (f64, &'static str) {
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    (value, UNITS[unit])
}

/// Renders with at most two decimals, trimming trailing zeros.
fn trim_decimals(value: f64) -> String {
    let rendered = format!("{value:.2}");
    rendered.trim_end_matches('0').trim_end_matches('.').to_string()
}
