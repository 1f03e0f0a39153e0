use crate::foundation::error::OperationError;

/// A frame-timing change requested by the user.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RateSpec {
    /// `2x`: play N times as fast.
    Multiplier(f64),
    /// `50%`: play at N percent speed.
    Percent(f64),
    /// `25fps`: uniform frame rate.
    Fps(f64),
    /// `40ms` / `2s`: uniform per-frame duration in milliseconds.
    Duration(f64),
}

impl RateSpec {
    /// Try multiplier, percentage, frame rate, then duration.
    pub fn parse(text: &str) -> Result<Self, OperationError> {
        let s = text.trim().to_ascii_lowercase();
        let number = |body: &str| super::parse_decimal(body).filter(|v| *v > 0.0);

        let spec = if let Some(body) = s.strip_suffix('x') {
            number(body).map(Self::Multiplier)
        } else if let Some(body) = s.strip_suffix('%') {
            number(body).map(Self::Percent)
        } else if let Some(body) = s.strip_suffix("fps") {
            number(body).map(Self::Fps)
        } else if let Some(body) = s.strip_suffix("ms") {
            number(body).map(Self::Duration)
        } else if let Some(body) = s.strip_suffix('s') {
            number(body).map(|secs| Self::Duration(secs * 1000.0))
        } else {
            None
        };
        spec.ok_or_else(|| OperationError::invalid_arg(text))
    }

    /// New per-frame durations (ms) derived from the existing ones.
    pub fn apply(self, durations: &[u32]) -> Vec<u32> {
        let round = |v: f64| -> u32 { v.round().clamp(0.0, f64::from(u32::MAX)) as u32 };
        match self {
            Self::Multiplier(m) => durations
                .iter()
                .map(|&d| round(f64::from(d) / m))
                .collect(),
            Self::Percent(p) => durations
                .iter()
                .map(|&d| round(f64::from(d) * 100.0 / p))
                .collect(),
            Self::Fps(fps) => vec![round(1000.0 / fps); durations.len()],
            Self::Duration(ms) => vec![round(ms); durations.len()],
        }
    }
}

/// Parse `text` and retime `durations` with it.
pub fn parse_rate_spec(text: &str, durations: &[u32]) -> Result<Vec<u32>, OperationError> {
    Ok(RateSpec::parse(text)?.apply(durations))
}

#[cfg(test)]
#[path = "../../tests/unit/args/rate.rs"]
mod tests;
