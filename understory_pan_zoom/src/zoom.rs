// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoom-toward-cursor math.

use kurbo::Point;

use crate::error::ConfigError;
use crate::transform::{TransformDelta, ViewTransform};

/// Default wheel sensitivity: zoom change per unit of wheel `delta_y`.
pub const DEFAULT_WHEEL_SENSITIVITY: f64 = 0.0005;

/// Allowed range for the uniform zoom factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomBounds {
    min: f64,
    max: f64,
}

impl ZoomBounds {
    /// No limits beyond keeping the zoom positive.
    pub const UNBOUNDED: Self = Self {
        min: 0.0,
        max: f64::INFINITY,
    };

    /// Creates a zoom range.
    ///
    /// A reversed range is normalized so that `min <= max`. The smaller value
    /// must be positive and neither may be NaN; `max` may be infinite.
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        if min.is_nan() || max.is_nan() {
            return Err(ConfigError::InvalidZoomBounds { min, max });
        }
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        if lo <= 0.0 || lo.is_infinite() {
            return Err(ConfigError::InvalidZoomBounds { min, max });
        }
        Ok(Self { min: lo, max: hi })
    }

    /// Smallest allowed zoom (`0.0` when unbounded).
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest allowed zoom.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Adjusts a multiplicative `factor` so that `current * factor` lands
    /// inside the range, exactly on the bound when it would overshoot.
    ///
    /// When `current` is already outside the range, a step back toward the
    /// range is kept as-is and a step further away becomes `1.0`; the zoom
    /// never jumps across to the bound from the outside.
    #[must_use]
    pub fn clamp_factor(&self, current: f64, factor: f64) -> f64 {
        let target = current * factor;
        if target > self.max {
            if current > self.max {
                factor.min(1.0)
            } else {
                self.max / current
            }
        } else if target < self.min {
            if current < self.min {
                factor.max(1.0)
            } else {
                self.min / current
            }
        } else {
            factor
        }
    }
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// Computes the pending delta for one wheel step.
///
/// The returned delta scales the view by `1 - delta_y * sensitivity`
/// (clamped into `bounds`) while translating so that the world point under
/// `cursor` stays under `cursor`. `reference` must be the transform the delta
/// will be folded into.
///
/// A step that would make the scale zero or negative lands on a positive
/// lower bound like any other overshoot. Without one there is nothing to
/// clamp to and `None` is returned.
#[must_use]
pub fn wheel_zoom_delta(
    reference: ViewTransform,
    cursor: Point,
    delta_y: f64,
    sensitivity: f64,
    bounds: ZoomBounds,
) -> Option<TransformDelta> {
    let z = reference.z();
    let factor = 1.0 - delta_y * sensitivity;
    let clamped = bounds.clamp_factor(z, factor);
    if clamped.is_nan() || clamped <= 0.0 {
        log::warn!("wheel step {delta_y} would invert the zoom, ignoring");
        return None;
    }
    if clamped != factor {
        log::trace!("zoom factor {factor} clamped to {clamped} at zoom {z}");
    }
    let change = clamped - 1.0;

    // World position under the cursor before this step.
    let world = reference.view_to_world(cursor);
    Some(TransformDelta::new(
        -world.x * change,
        -world.y * change,
        clamped,
    ))
}
