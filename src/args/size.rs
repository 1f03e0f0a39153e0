use crate::{config::ToolboxConfig, foundation::error::OperationError};

const ABSOLUTE_SEPARATORS: &[char] = &['x', 'X', '*', ',', ' '];
const RATIO_SEPARATORS: &[char] = &[':', '：', '比'];

/// A parsed size argument, not yet resolved against a source image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SizeSpec {
    /// `WxH`; a missing side follows the source aspect ratio.
    Absolute {
        /// Requested width.
        width: Option<u32>,
        /// Requested height.
        height: Option<u32>,
    },
    /// `N%` of the source on both axes.
    Percent(f64),
    /// `W:H` aspect ratio.
    Ratio {
        /// Ratio width term.
        w: f64,
        /// Ratio height term.
        h: f64,
    },
}

impl SizeSpec {
    /// Try absolute, percentage, then ratio.
    pub fn parse(text: &str) -> Result<Self, OperationError> {
        let s = text.trim();
        parse_absolute(s)
            .or_else(|| parse_percent(s))
            .or_else(|| parse_ratio(s))
            .ok_or_else(|| OperationError::invalid_arg(text))
    }

    /// Like [`SizeSpec::parse`] without the percentage form.
    pub fn parse_crop(text: &str) -> Result<Self, OperationError> {
        let s = text.trim();
        parse_absolute(s)
            .or_else(|| parse_ratio(s))
            .ok_or_else(|| OperationError::invalid_arg(text))
    }

    /// Compute target dimensions for a `src_w x src_h` source.
    ///
    /// Ratio sizes scale by `min(src_w / w, src_w / h)`, using the source width on both terms.
    pub fn resolve(self, src_w: u32, src_h: u32) -> Option<(u32, u32)> {
        let (sw, sh) = (f64::from(src_w), f64::from(src_h));
        let (w, h) = match self {
            Self::Absolute {
                width: Some(w),
                height: Some(h),
            } => (f64::from(w), f64::from(h)),
            Self::Absolute {
                width: Some(w),
                height: None,
            } => (f64::from(w), (f64::from(w) * sh / sw).round()),
            Self::Absolute {
                width: None,
                height: Some(h),
            } => ((f64::from(h) * sw / sh).round(), f64::from(h)),
            Self::Absolute {
                width: None,
                height: None,
            } => return None,
            Self::Percent(p) => ((sw * p / 100.0).floor(), (sh * p / 100.0).floor()),
            Self::Ratio { w, h } => {
                let size = (sw / w).min(sw / h);
                ((w * size).floor(), (h * size).floor())
            }
        };
        to_dims(w, h)
    }
}

/// Parse and resolve a resize argument against the source dimensions.
pub fn parse_size_spec(text: &str, src_w: u32, src_h: u32) -> Result<(u32, u32), OperationError> {
    SizeSpec::parse(text)?
        .resolve(src_w, src_h)
        .ok_or_else(|| OperationError::invalid_arg(text))
}

/// Parse and resolve a crop argument (absolute or ratio) against the source dimensions.
pub fn parse_crop_spec(text: &str, src_w: u32, src_h: u32) -> Result<(u32, u32), OperationError> {
    SizeSpec::parse_crop(text)?
        .resolve(src_w, src_h)
        .ok_or_else(|| OperationError::invalid_arg(text))
}

/// Apply generator defaults and bounds to an optional width/height pair.
pub fn check_size(
    width: Option<u32>,
    height: Option<u32>,
    cfg: &ToolboxConfig,
) -> Result<(u32, u32), OperationError> {
    let width = width.unwrap_or(cfg.default_width);
    let height = height.unwrap_or(cfg.default_height);
    for (name, v) in [("width", width), ("height", height)] {
        if v < cfg.min_size || v > cfg.max_size {
            return Err(OperationError::InvalidRange {
                name: name.to_string(),
                value: v.to_string(),
                min: cfg.min_size.to_string(),
                max: cfg.max_size.to_string(),
            });
        }
    }
    Ok((width, height))
}

fn to_dims(w: f64, h: f64) -> Option<(u32, u32)> {
    if !(w.is_finite() && h.is_finite()) || w < 1.0 || h < 1.0 {
        return None;
    }
    let max = f64::from(u32::MAX);
    if w > max || h > max {
        return None;
    }
    Some((w as u32, h as u32))
}

fn parse_absolute(s: &str) -> Option<SizeSpec> {
    let first = s.find(ABSOLUTE_SEPARATORS)?;
    let left = &s[..first];
    let rest = s[first..].trim_start_matches(ABSOLUTE_SEPARATORS);
    if rest.contains(ABSOLUTE_SEPARATORS) {
        return None;
    }
    let side = |p: &str| -> Option<Option<u32>> {
        let p = p.trim();
        if p.is_empty() {
            Some(None)
        } else {
            super::parse_uint(p).map(Some)
        }
    };
    let width = side(left)?;
    let height = side(rest)?;
    if width.is_none() && height.is_none() {
        return None;
    }
    Some(SizeSpec::Absolute { width, height })
}

fn parse_percent(s: &str) -> Option<SizeSpec> {
    let v = super::parse_decimal(s.strip_suffix('%')?)?;
    Some(SizeSpec::Percent(v))
}

fn parse_ratio(s: &str) -> Option<SizeSpec> {
    let mut parts = s.split(RATIO_SEPARATORS);
    let w = super::parse_decimal(parts.next()?)?;
    let h = super::parse_decimal(parts.next()?)?;
    if parts.next().is_some() || w <= 0.0 || h <= 0.0 {
        return None;
    }
    Some(SizeSpec::Ratio { w, h })
}

#[cfg(test)]
#[path = "../../tests/unit/args/size.rs"]
mod tests;
