use crate::foundation::error::OperationError;

const VERTICAL: &[&str] = &["vertical", "垂直"];
const HORIZONTAL: &[&str] = &["horizontal", "水平"];

/// Parse a gradient/rotation angle in whole degrees, `0..=360`.
///
/// `vertical` maps to 90 and `horizontal` to 0.
pub fn parse_angle(text: &str) -> Result<u32, OperationError> {
    let s = text.trim();
    let lower = s.to_lowercase();
    if VERTICAL.contains(&lower.as_str()) {
        return Ok(90);
    }
    if HORIZONTAL.contains(&lower.as_str()) {
        return Ok(0);
    }
    match super::parse_uint(s) {
        Some(v) if v <= 360 => Ok(v),
        _ => Err(OperationError::InvalidAngle {
            value: text.to_string(),
        }),
    }
}

/// Parse a rotation in degrees. Any finite decimal is accepted, negative values rotate
/// counter-clockwise.
pub fn parse_rotation(text: &str) -> Result<f64, OperationError> {
    let s = text.trim();
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits = digits.strip_suffix("deg").unwrap_or(digits).trim_end_matches('°');
    let v = super::parse_decimal(digits).ok_or_else(|| OperationError::InvalidAngle {
        value: text.to_string(),
    })?;
    Ok(if neg { -v } else { v })
}

#[cfg(test)]
#[path = "../../tests/unit/args/angle.rs"]
mod tests;
