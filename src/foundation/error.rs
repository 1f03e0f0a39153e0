/// Convenience result type used across the toolbox.
pub type ToolboxResult<T> = Result<T, ToolboxError>;

/// Top-level error taxonomy used by toolbox APIs.
///
/// Only [`ToolboxError::Operation`] is meant to reach end users as a localized message; the
/// remaining variants are technical failures the host logs and aborts on.
#[derive(thiserror::Error, Debug)]
pub enum ToolboxError {
    /// A user-facing, localizable failure (bad argument, missing image, soft warning).
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// Encoded bytes could not be turned into an [`crate::Image`].
    #[error("decode error: {0}")]
    Decode(String),

    /// An [`crate::Image`] could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// The drawing backend failed.
    #[error("canvas error: {0}")]
    Canvas(String),

    /// Invalid configuration or internal invariant violation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ToolboxError {
    /// Build a [`ToolboxError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ToolboxError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ToolboxError::Canvas`] value.
    pub fn canvas(msg: impl Into<String>) -> Self {
        Self::Canvas(msg.into())
    }

    /// Build a [`ToolboxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// The typed operation error, if this is one.
    pub fn as_operation(&self) -> Option<&OperationError> {
        match self {
            Self::Operation(e) => Some(e),
            _ => None,
        }
    }
}

/// Localizable failure raised by operations.
///
/// Hosts render these through [`OperationError::key`] and [`OperationError::params`]; both are
/// part of the stable contract.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum OperationError {
    /// A required image argument was absent.
    #[error("missing-image")]
    MissingImage,

    /// The source image could not be fetched (network-class failure).
    #[error("fetch-image-failed: {url}")]
    FetchImageFailed {
        /// Location that failed.
        url: String,
    },

    /// The source image was fetched but could not be decoded.
    #[error("invalid-image: {url}")]
    InvalidImage {
        /// Location of the undecodable image.
        url: String,
    },

    /// An animation-only operation was given a still image.
    #[error("image-must-animated")]
    ImageMustBeAnimated,

    /// No size/rate/color pattern matched the argument.
    #[error("invalid-arg-format: {value}")]
    InvalidArgFormat {
        /// Offending argument text.
        value: String,
    },

    /// A numeric argument is below its lower bound.
    #[error("value-too-small: {name}={value} < {min}")]
    ValueTooSmall {
        /// Argument name.
        name: String,
        /// Offending value.
        value: String,
        /// Smallest accepted value.
        min: String,
    },

    /// A numeric argument is above its upper bound.
    #[error("value-too-big: {name}={value} > {max}")]
    ValueTooBig {
        /// Argument name.
        name: String,
        /// Offending value.
        value: String,
        /// Largest accepted value.
        max: String,
    },

    /// A numeric argument is outside `[min, max]`.
    #[error("invalid-range: {name}={value} not in [{min}, {max}]")]
    InvalidRange {
        /// Argument name (`width`, `height`, ...).
        name: String,
        /// Offending value.
        value: String,
        /// Smallest accepted value.
        min: String,
        /// Largest accepted value.
        max: String,
    },

    /// Unparseable color string.
    #[error("invalid-color: {value}")]
    InvalidColor {
        /// Offending color text.
        value: String,
    },

    /// A translucent color was given where only opaque colors are accepted.
    #[error("alpha-not-supported: {value}")]
    AlphaNotSupported {
        /// Offending color text.
        value: String,
    },

    /// Angle unparseable or outside `[0, 360]`.
    #[error("invalid-angle: {value}")]
    InvalidAngle {
        /// Offending angle text.
        value: String,
    },

    /// The requested timing implies 50 FPS or more and no override was given.
    #[error("fps-exceed-range-warn: average frame duration {average_ms}ms")]
    FpsExceedRangeWarn {
        /// Mean frame duration in milliseconds.
        average_ms: f64,
    },

    /// Fewer images than the operation needs.
    #[error("image-not-enough: at least {min} required")]
    ImageNotEnough {
        /// Required minimum.
        min: usize,
    },

    /// Animated input given to a join without override.
    #[error("image-animated-warn")]
    ImageAnimatedWarn,

    /// Archive packaging failed (raised by hosts only).
    #[error("zip-failed")]
    ZipFailed,
}

impl OperationError {
    /// Stable message key used for localization lookups.
    pub fn key(&self) -> &'static str {
        match self {
            Self::MissingImage => "missing-image",
            Self::FetchImageFailed { .. } => "fetch-image-failed",
            Self::InvalidImage { .. } => "invalid-image",
            Self::ImageMustBeAnimated => "image-must-animated",
            Self::InvalidArgFormat { .. } => "invalid-arg-format",
            Self::ValueTooSmall { .. } => "value-too-small",
            Self::ValueTooBig { .. } => "value-too-big",
            Self::InvalidRange { .. } => "invalid-range",
            Self::InvalidColor { .. } => "invalid-color",
            Self::AlphaNotSupported { .. } => "alpha-not-supported",
            Self::InvalidAngle { .. } => "invalid-angle",
            Self::FpsExceedRangeWarn { .. } => "fps-exceed-range-warn",
            Self::ImageNotEnough { .. } => "image-not-enough",
            Self::ImageAnimatedWarn => "image-animated-warn",
            Self::ZipFailed => "zip-failed",
        }
    }

    /// Ordered substitution values for the localized message.
    pub fn params(&self) -> Vec<String> {
        match self {
            Self::MissingImage
            | Self::ImageMustBeAnimated
            | Self::ImageAnimatedWarn
            | Self::ZipFailed => Vec::new(),
            Self::FetchImageFailed { url } | Self::InvalidImage { url } => vec![url.clone()],
            Self::InvalidArgFormat { value }
            | Self::InvalidColor { value }
            | Self::AlphaNotSupported { value }
            | Self::InvalidAngle { value } => vec![value.clone()],
            Self::ValueTooSmall { name, value, min } => {
                vec![name.clone(), value.clone(), min.clone()]
            }
            Self::ValueTooBig { name, value, max } => {
                vec![name.clone(), value.clone(), max.clone()]
            }
            Self::InvalidRange {
                name,
                value,
                min,
                max,
            } => vec![name.clone(), value.clone(), min.clone(), max.clone()],
            Self::FpsExceedRangeWarn { average_ms } => vec![format!("{average_ms:.2}")],
            Self::ImageNotEnough { min } => vec![min.to_string()],
        }
    }

    /// `true` for soft warnings that the user may override with `force`.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::FpsExceedRangeWarn { .. } | Self::ImageAnimatedWarn
        )
    }

    pub(crate) fn invalid_arg(value: impl Into<String>) -> Self {
        Self::InvalidArgFormat {
            value: value.into(),
        }
    }

    pub(crate) fn too_small(
        name: impl Into<String>,
        value: impl ToString,
        min: impl ToString,
    ) -> Self {
        Self::ValueTooSmall {
            name: name.into(),
            value: value.to_string(),
            min: min.to_string(),
        }
    }

    pub(crate) fn too_big(
        name: impl Into<String>,
        value: impl ToString,
        max: impl ToString,
    ) -> Self {
        Self::ValueTooBig {
            name: name.into(),
            value: value.to_string(),
            max: max.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
