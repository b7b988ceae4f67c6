// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accumulation of transform deltas between reads.
//!
//! A [`TransformAccumulator`] keeps two views of the same transform:
//!
//! - `pending`: everything that changed since the last [`read`], drained and
//!   reset to identity on every read.
//! - `total`: everything that ever changed, updated exactly once per read by
//!   folding the drained delta in.
//!
//! [`read`]: TransformAccumulator::read

use alloc::rc::Rc;
use core::fmt;

use kurbo::Affine;

use crate::error::ConfigError;
use crate::transform::{TransformDelta, ViewTransform};

/// Raw accumulator state.
///
/// This is plain data; it is only mutated through [`TransformAccumulator`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AccumulatorState {
    /// Deltas accumulated since the last read.
    pub pending: TransformDelta,
    /// Everything folded in since construction or the last re-initialization.
    pub total: ViewTransform,
}

/// Where the "current effective transform" used by input math comes from.
///
/// Callers that compose the accumulated transform with others (for example a
/// render context that also carries a camera or DPI transform) should pass an
/// [`External`](Self::External) provider. Otherwise the accumulator's own
/// total is used.
#[derive(Clone, Default)]
pub enum TransformReference {
    /// Use the accumulator's own running total.
    #[default]
    Total,
    /// Query a caller-owned provider every time the reference is needed.
    ///
    /// The provider runs while a [`PanZoom`](crate::PanZoom) is handling an
    /// event and its state is mutably borrowed. It must not call back into
    /// that `PanZoom`; doing so panics.
    External(Rc<dyn Fn() -> ViewTransform>),
}

impl TransformReference {
    /// Wraps a provider closure.
    pub fn external(provider: impl Fn() -> ViewTransform + 'static) -> Self {
        Self::External(Rc::new(provider))
    }
}

impl fmt::Debug for TransformReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Total => f.write_str("Total"),
            Self::External(_) => f
                .debug_struct("External")
                .field("provider", &"<function>")
                .finish(),
        }
    }
}

/// Running pan/zoom transform with an exactly-once-per-read delta.
///
/// ```
/// use understory_pan_zoom::{TransformAccumulator, TransformDelta};
///
/// let mut acc = TransformAccumulator::new();
/// acc.increment_delta(1.0, 0.0, 0.0);
/// acc.increment_delta(1.0, 0.0, 0.0);
///
/// assert_eq!(acc.read(), TransformDelta::new(2.0, 0.0, 1.0));
/// // Drained: nothing is returned twice.
/// assert_eq!(acc.read(), TransformDelta::IDENTITY);
/// assert_eq!(acc.total().x(), 2.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TransformAccumulator {
    state: AccumulatorState,
    reference: TransformReference,
}

impl TransformAccumulator {
    /// Creates an identity accumulator that uses its own total as reference.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an identity accumulator with the given reference provider.
    #[must_use]
    pub fn with_reference(reference: TransformReference) -> Self {
        Self {
            state: AccumulatorState::default(),
            reference,
        }
    }

    /// Creates an accumulator whose total starts at `total`.
    #[must_use]
    pub fn with_total(total: ViewTransform) -> Self {
        let mut acc = Self::new();
        acc.reinitialize(total);
        acc
    }

    /// Replaces individual pending components.
    ///
    /// `None` keeps the current pending value of that component; this is not
    /// a reset to identity.
    pub fn set_delta(&mut self, dx: Option<f64>, dy: Option<f64>, dz: Option<f64>) {
        let pending = &mut self.state.pending;
        pending.dx = dx.unwrap_or(pending.dx);
        pending.dy = dy.unwrap_or(pending.dy);
        pending.dz = dz.unwrap_or(pending.dz);
    }

    /// Replaces the pending delta with the one described by `affine`.
    ///
    /// Fails, leaving `pending` unchanged, if `affine` is not an axis-aligned
    /// uniform scale with a positive factor.
    pub fn set_delta_affine(&mut self, affine: Affine) -> Result<(), ConfigError> {
        self.state.pending = TransformDelta::try_from_affine(affine)?;
        Ok(())
    }

    /// Adds to every pending component, including `dz`.
    pub fn increment_delta(&mut self, dx: f64, dy: f64, dz: f64) {
        let pending = &mut self.state.pending;
        pending.dx += dx;
        pending.dy += dy;
        pending.dz += dz;
    }

    /// Returns the pending delta without draining it.
    #[must_use]
    pub fn pending(&self) -> TransformDelta {
        self.state.pending
    }

    /// Drains the pending delta and folds it into the total.
    ///
    /// Returns `{0, 0, 1}` if nothing changed since the last read.
    pub fn read(&mut self) -> TransformDelta {
        let delta = core::mem::take(&mut self.state.pending);
        self.state.total = self.state.total.compose(delta);
        delta
    }

    /// Like [`read`](Self::read), but returns the updated total instead of
    /// the drained delta.
    pub fn read_total(&mut self) -> ViewTransform {
        self.read();
        self.state.total
    }

    /// The cumulative transform as of the last read.
    #[must_use]
    pub fn total(&self) -> ViewTransform {
        self.state.total
    }

    /// Current effective transform according to the configured reference.
    #[must_use]
    pub fn reference(&self) -> ViewTransform {
        match &self.reference {
            TransformReference::Total => self.state.total,
            TransformReference::External(provider) => provider(),
        }
    }

    /// Read-only view of the raw state.
    #[must_use]
    pub fn state(&self) -> &AccumulatorState {
        &self.state
    }

    /// Resets `pending` to identity and `total` to `total`.
    pub fn reinitialize(&mut self, total: ViewTransform) {
        self.state = AccumulatorState {
            pending: TransformDelta::IDENTITY,
            total,
        };
    }

    /// Like [`reinitialize`](Self::reinitialize) from a matrix.
    ///
    /// On error the state is left exactly as it was.
    pub fn try_reinitialize_from_affine(&mut self, affine: Affine) -> Result<(), ConfigError> {
        let total = ViewTransform::try_from_affine(affine)?;
        self.reinitialize(total);
        Ok(())
    }
}
