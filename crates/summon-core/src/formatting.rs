use crate::history::PityBand;

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use summon_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(999), "999");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a `0.0..=1.0` rate as a percentage with two decimals.
///
/// # Examples
///
/// ```
/// use summon_core::formatting::format_rate;
///
/// assert_eq!(format_rate(0.0), "0.00%");
/// assert_eq!(format_rate(0.0125), "1.25%");
/// assert_eq!(format_rate(1.0), "100.00%");
/// ```
pub fn format_rate(rate: f64) -> String {
    if !rate.is_finite() {
        return "0.00%".to_string();
    }
    format!("{:.2}%", rate * 100.0)
}

/// Star label for a rarity tier, e.g. `"★6"`.
pub fn rarity_label(rarity: u8) -> String {
    format!("★{}", rarity)
}

/// Lowercase name of a pity band.
pub fn band_label(band: PityBand) -> &'static str {
    match band {
        PityBand::Green => "green",
        PityBand::Yellow => "yellow",
        PityBand::Red => "red",
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}
