//! GPS coordinate strings.
//!
//! Coordinates travel as a single `"lat,lng"` string, whether typed by hand,
//! captured from the browser geolocation API or copied from a division.

/// Parse a `"lat,lng"` string.
///
/// Returns `None` for absent or empty input, when the string does not split
/// into exactly two parts, or when either part is not a number.
#[must_use]
pub fn parse_gps(input: Option<&str>) -> Option<(f64, f64)> {
    let input = input?.trim();
    if input.is_empty() {
        return None;
    }

    let parts: Vec<&str> = input.split(',').collect();
    if parts.len() != 2 {
        return None;
    }

    let lat = parts[0].trim().parse::<f64>().ok()?;
    let lng = parts[1].trim().parse::<f64>().ok()?;
    if lat.is_nan() || lng.is_nan() {
        return None;
    }

    Some((lat, lng))
}
