use crate::foundation::{core::Rgba, error::OperationError};

/// Parse a user color.
///
/// Accepted forms:
/// - hex with optional `#`: `rgb`, `rgba`, `rrggbb`, `rrggbbaa`
/// - `rgb(r, g, b)` / `rgba(r, g, b, a)` with comma or whitespace separators
///
/// Alpha below 1 is a fraction of 255; otherwise it is an integer 0-255.
pub fn parse_color(text: &str) -> Result<Rgba, OperationError> {
    let invalid = || OperationError::InvalidColor {
        value: text.to_string(),
    };
    let s = text.trim();
    let lower = s.to_ascii_lowercase();

    if let Some(body) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
    {
        let body = body.strip_suffix(')').ok_or_else(invalid)?;
        return parse_functional(body).ok_or_else(invalid);
    }

    parse_hex(&lower).ok_or_else(invalid)
}

/// Parse a color and require it to be fully opaque.
pub fn parse_opaque_color(text: &str) -> Result<Rgba, OperationError> {
    let color = parse_color(text)?;
    if !color.is_opaque() {
        return Err(OperationError::AlphaNotSupported {
            value: text.to_string(),
        });
    }
    Ok(color)
}

fn parse_hex(s: &str) -> Option<Rgba> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| -> Option<u8> {
        let d = u8::from_str_radix(&s[i..=i], 16).ok()?;
        Some(d * 17)
    };
    let byte = |i: usize| -> Option<u8> { u8::from_str_radix(&s[i..i + 2], 16).ok() };

    match s.len() {
        3 => Some(Rgba::opaque(digit(0)?, digit(1)?, digit(2)?)),
        4 => Some(Rgba::new(digit(0)?, digit(1)?, digit(2)?, digit(3)?)),
        6 => Some(Rgba::opaque(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_functional(body: &str) -> Option<Rgba> {
    let parts = body
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |p: &str| -> Option<u8> {
        let v = super::parse_uint(p)?;
        u8::try_from(v).ok()
    };
    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = match parts.get(3) {
        None => 255,
        Some(p) => parse_alpha(p)?,
    };
    Some(Rgba::new(r, g, b, a))
}

fn parse_alpha(p: &str) -> Option<u8> {
    let v = super::parse_decimal(p)?;
    if v < 1.0 {
        return Some((v * 255.0).round() as u8);
    }
    if v.fract() != 0.0 || v > 255.0 {
        return None;
    }
    Some(v as u8)
}

#[cfg(test)]
#[path = "../../tests/unit/args/color.rs"]
mod tests;
