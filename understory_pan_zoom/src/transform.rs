// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Vec2};

use crate::error::ConfigError;

/// A uniform pan + zoom transform mapping world coordinates into view space.
///
/// `x`/`y` are the translation in view units and `z` is the uniform scale,
/// so a world point `w` lands at `w * z + (x, y)` in the view. This is the
/// same mapping as the matrix `[z, 0, 0, z, x, y]`.
///
/// Values built through [`ViewTransform::new`] or
/// [`ViewTransform::try_from_affine`] always have a finite, positive scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    x: f64,
    y: f64,
    z: f64,
}

impl ViewTransform {
    /// No translation, unit scale.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    /// Creates a transform from a translation and a uniform scale.
    ///
    /// Fails if any component is not finite or if `z <= 0`.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, ConfigError> {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err(ConfigError::NonFinite);
        }
        if z <= 0.0 {
            return Err(ConfigError::NonPositiveScale(z));
        }
        Ok(Self { x, y, z })
    }

    /// Extracts the translation and uniform scale of `affine`.
    ///
    /// Matrices with unequal X/Y scale, rotation or skew are rejected rather
    /// than approximated.
    pub fn try_from_affine(affine: Affine) -> Result<Self, ConfigError> {
        let (scale, translation) = uniform_parts(affine)?;
        Self::new(translation.x, translation.y, scale)
    }

    /// Horizontal translation in view units.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Vertical translation in view units.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Uniform zoom factor.
    #[must_use]
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Translation as a vector.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// The equivalent world → view matrix.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::new([self.z, 0.0, 0.0, self.z, self.x, self.y])
    }

    /// Converts a view-space point into world space.
    #[must_use]
    pub fn view_to_world(&self, pt: Point) -> Point {
        Point::new((pt.x - self.x) / self.z, (pt.y - self.y) / self.z)
    }

    /// Converts a world-space point into view space.
    #[must_use]
    pub fn world_to_view(&self, pt: Point) -> Point {
        Point::new(pt.x * self.z + self.x, pt.y * self.z + self.y)
    }

    /// Folds `delta` into this transform: translation first, then scale.
    ///
    /// The delta translation is expressed in the frame established by the
    /// current scale, so it is multiplied by the *old* `z` before being
    /// added. This is `self.to_affine() * delta.to_affine()`.
    ///
    /// No clamping is applied; a non-positive `delta.dz` yields a degenerate
    /// result.
    #[must_use]
    pub fn compose(self, delta: TransformDelta) -> Self {
        Self {
            x: self.x + delta.dx * self.z,
            y: self.y + delta.dy * self.z,
            z: self.z * delta.dz,
        }
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<Affine> for ViewTransform {
    type Error = ConfigError;

    fn try_from(affine: Affine) -> Result<Self, Self::Error> {
        Self::try_from_affine(affine)
    }
}

impl From<ViewTransform> for Affine {
    fn from(transform: ViewTransform) -> Self {
        transform.to_affine()
    }
}

/// Change in a [`ViewTransform`] since it was last read.
///
/// `dx`/`dy` are a translation in the frame of the transform the delta will
/// be folded into (world units at the current scale), and `dz` is a
/// multiplicative scale factor. The identity delta is `{0, 0, 1}`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformDelta {
    /// Horizontal translation.
    pub dx: f64,
    /// Vertical translation.
    pub dy: f64,
    /// Scale multiplier.
    pub dz: f64,
}

impl TransformDelta {
    /// No translation, unit scale.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 1.0);

    /// Creates a delta from its components.
    #[must_use]
    pub const fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    /// Builds a delta from a uniform-scale matrix.
    ///
    /// The same restrictions as [`ViewTransform::try_from_affine`] apply.
    pub fn try_from_affine(affine: Affine) -> Result<Self, ConfigError> {
        let (scale, translation) = uniform_parts(affine)?;
        if scale <= 0.0 {
            return Err(ConfigError::NonPositiveScale(scale));
        }
        Ok(Self::new(translation.x, translation.y, scale))
    }

    /// Returns `true` if applying this delta changes nothing.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Translation as a vector.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.dx, self.dy)
    }

    /// The equivalent matrix, suitable for post-multiplying a render transform.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::new([self.dz, 0.0, 0.0, self.dz, self.dx, self.dy])
    }
}

impl Default for TransformDelta {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<TransformDelta> for Affine {
    fn from(delta: TransformDelta) -> Self {
        delta.to_affine()
    }
}

/// Splits a matrix into `(scale, translation)`, rejecting anything that is
/// not an axis-aligned uniform scale.
fn uniform_parts(affine: Affine) -> Result<(f64, Vec2), ConfigError> {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    if ![a, b, c, d, e, f].iter().all(|v| v.is_finite()) {
        return Err(ConfigError::NonFinite);
    }
    if b != 0.0 || c != 0.0 {
        return Err(ConfigError::RotationOrSkew);
    }
    if a != d {
        return Err(ConfigError::NonUniformScale {
            scale_x: a,
            scale_y: d,
        });
    }
    Ok((a, Vec2::new(e, f)))
}

#[cfg(test)]
mod tests {
    use kurbo::{Affine, Point, Vec2};

    use super::{TransformDelta, ViewTransform};
    use crate::error::ConfigError;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn identity_is_default() {
        assert_eq!(ViewTransform::default(), ViewTransform::IDENTITY);
        assert_eq!(TransformDelta::default(), TransformDelta::IDENTITY);
        assert!(TransformDelta::IDENTITY.is_identity());
    }

    #[test]
    fn new_rejects_non_positive_and_non_finite() {
        assert_eq!(
            ViewTransform::new(0.0, 0.0, 0.0),
            Err(ConfigError::NonPositiveScale(0.0))
        );
        assert_eq!(
            ViewTransform::new(0.0, 0.0, -2.0),
            Err(ConfigError::NonPositiveScale(-2.0))
        );
        assert_eq!(
            ViewTransform::new(f64::NAN, 0.0, 1.0),
            Err(ConfigError::NonFinite)
        );
    }

    #[test]
    fn compose_scales_translation_by_old_zoom() {
        let total = ViewTransform::new(0.0, 0.0, 2.0).unwrap();
        let folded = total.compose(TransformDelta::new(1.0, 1.0, 1.5));
        assert_eq!(folded, ViewTransform::new(2.0, 2.0, 3.0).unwrap());
    }

    #[test]
    fn compose_matches_matrix_product() {
        let total = ViewTransform::new(3.0, -4.0, 1.25).unwrap();
        let delta = TransformDelta::new(-2.0, 7.0, 0.8);
        let expected = total.to_affine() * delta.to_affine();
        let folded = total.compose(delta).to_affine();
        for (a, b) in folded.as_coeffs().iter().zip(expected.as_coeffs()) {
            assert!((a - b).abs() < EPSILON, "{folded:?} != {expected:?}");
        }
    }

    #[test]
    fn world_view_roundtrip() {
        let t = ViewTransform::new(10.0, -5.0, 4.0).unwrap();
        let world = Point::new(1.5, 2.5);
        let back = t.view_to_world(t.world_to_view(world));
        assert!((back.x - world.x).abs() < EPSILON);
        assert!((back.y - world.y).abs() < EPSILON);
        assert_eq!(t.to_affine() * world, t.world_to_view(world));
    }

    #[test]
    fn affine_roundtrip_for_uniform_scale() {
        let affine = Affine::translate(Vec2::new(5.0, 6.0)) * Affine::scale(3.0);
        let t = ViewTransform::try_from_affine(affine).unwrap();
        assert_eq!(t.translation(), Vec2::new(5.0, 6.0));
        assert_eq!(t.z(), 3.0);
        assert_eq!(Affine::from(t), affine);
    }

    #[test]
    fn non_uniform_scale_is_rejected() {
        let affine = Affine::scale_non_uniform(2.0, 3.0);
        assert_eq!(
            ViewTransform::try_from(affine),
            Err(ConfigError::NonUniformScale {
                scale_x: 2.0,
                scale_y: 3.0,
            })
        );
        assert_eq!(
            TransformDelta::try_from_affine(affine),
            Err(ConfigError::NonUniformScale {
                scale_x: 2.0,
                scale_y: 3.0,
            })
        );
    }

    #[test]
    fn rotation_is_rejected() {
        let affine = Affine::new([1.0, 0.5, -0.5, 1.0, 0.0, 0.0]);
        assert_eq!(
            ViewTransform::try_from_affine(affine),
            Err(ConfigError::RotationOrSkew)
        );
    }

    #[test]
    fn delta_from_affine_requires_positive_scale() {
        let affine = Affine::new([-1.0, 0.0, 0.0, -1.0, 0.0, 0.0]);
        assert_eq!(
            TransformDelta::try_from_affine(affine),
            Err(ConfigError::NonPositiveScale(-1.0))
        );
    }
}
