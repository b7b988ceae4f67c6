// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// A rejected transform or configuration value.
///
/// These are always reported synchronously by the call that received the
/// offending value, and that call leaves any previous state untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// A matrix with different X and Y scale factors was supplied where a
    /// uniform zoom is required.
    NonUniformScale {
        /// The X scale factor (`a` coefficient).
        scale_x: f64,
        /// The Y scale factor (`d` coefficient).
        scale_y: f64,
    },
    /// A matrix with rotation or skew terms was supplied.
    RotationOrSkew,
    /// A zoom factor that is zero or negative.
    NonPositiveScale(f64),
    /// A component was NaN or infinite.
    NonFinite,
    /// Zoom bounds with a non-positive or NaN minimum, or a NaN maximum.
    InvalidZoomBounds {
        /// Requested minimum zoom.
        min: f64,
        /// Requested maximum zoom.
        max: f64,
    },
    /// A device pixel ratio that is not finite and positive.
    InvalidPixelRatio(f64),
    /// An ease factor outside `[0, 1]`.
    InvalidEaseFactor(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonUniformScale { scale_x, scale_y } => write!(
                f,
                "x scale {scale_x} differs from y scale {scale_y}; only uniform 2D zoom is supported"
            ),
            Self::RotationOrSkew => f.write_str("transform contains rotation or skew"),
            Self::NonPositiveScale(z) => write!(f, "zoom factor {z} must be positive"),
            Self::NonFinite => f.write_str("transform contains a NaN or infinite component"),
            Self::InvalidZoomBounds { min, max } => {
                write!(f, "invalid zoom bounds [{min}, {max}]")
            }
            Self::InvalidPixelRatio(ratio) => {
                write!(f, "pixel ratio {ratio} must be finite and positive")
            }
            Self::InvalidEaseFactor(t) => write!(f, "ease factor {t} must lie in [0, 1]"),
        }
    }
}

impl core::error::Error for ConfigError {}
