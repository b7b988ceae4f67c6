// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::accumulator::{TransformAccumulator, TransformReference};
use crate::error::ConfigError;
use crate::interpreter::{InputInterpreter, InterpreterConfig};
use crate::source::{
    EventResponse, InputEvent, InputEventKind, InputEventSource, ListenerOptions,
    ListenerRegistration,
};
use crate::transform::{TransformDelta, ViewTransform};
use crate::zoom::{DEFAULT_WHEEL_SENSITIVITY, ZoomBounds};

/// Construction-time options for [`PanZoom`].
#[derive(Clone, Debug)]
pub struct PanZoomOptions {
    /// Provider of the current effective transform.
    pub transform_reference: TransformReference,
    /// Factor applied to incoming pointer positions, matching the ratio the
    /// rendering surface was scaled by.
    pub pixel_ratio: f64,
    /// Reserved for smoothing; stored and reported but currently has no
    /// effect. Must lie in `[0, 1]`.
    pub ease_factor: f64,
    /// Zoom range enforced on wheel input.
    pub zoom_bounds: ZoomBounds,
    /// Zoom change per unit of wheel `delta_y`.
    pub wheel_sensitivity: f64,
    /// Register pointer handlers for drag-to-pan.
    pub manage_pan: bool,
    /// Register the wheel handler for zoom.
    pub manage_zoom: bool,
}

impl Default for PanZoomOptions {
    fn default() -> Self {
        Self {
            transform_reference: TransformReference::Total,
            pixel_ratio: 1.0,
            ease_factor: 1.0,
            zoom_bounds: ZoomBounds::UNBOUNDED,
            wheel_sensitivity: DEFAULT_WHEEL_SENSITIVITY,
            manage_pan: true,
            manage_zoom: true,
        }
    }
}

impl PanZoomOptions {
    /// Default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the transform reference provider.
    #[must_use]
    pub fn with_transform_reference(mut self, reference: TransformReference) -> Self {
        self.transform_reference = reference;
        self
    }

    /// Sets the device pixel ratio.
    #[must_use]
    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    /// Sets the reserved ease factor.
    #[must_use]
    pub fn with_ease_factor(mut self, ease_factor: f64) -> Self {
        self.ease_factor = ease_factor;
        self
    }

    /// Sets the zoom range.
    #[must_use]
    pub fn with_zoom_bounds(mut self, bounds: ZoomBounds) -> Self {
        self.zoom_bounds = bounds;
        self
    }

    /// Sets the wheel sensitivity.
    #[must_use]
    pub fn with_wheel_sensitivity(mut self, sensitivity: f64) -> Self {
        self.wheel_sensitivity = sensitivity;
        self
    }

    /// Enables or disables drag-to-pan.
    #[must_use]
    pub fn with_manage_pan(mut self, manage: bool) -> Self {
        self.manage_pan = manage;
        self
    }

    /// Enables or disables wheel zoom.
    #[must_use]
    pub fn with_manage_zoom(mut self, manage: bool) -> Self {
        self.manage_zoom = manage;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0) {
            return Err(ConfigError::InvalidPixelRatio(self.pixel_ratio));
        }
        if !(0.0..=1.0).contains(&self.ease_factor) {
            return Err(ConfigError::InvalidEaseFactor(self.ease_factor));
        }
        if !self.wheel_sensitivity.is_finite() {
            return Err(ConfigError::NonFinite);
        }
        Ok(())
    }

    fn interpreter_config(&self) -> InterpreterConfig {
        InterpreterConfig {
            wheel_sensitivity: self.wheel_sensitivity,
            zoom_bounds: self.zoom_bounds,
            manage_pan: self.manage_pan,
            manage_zoom: self.manage_zoom,
        }
    }
}

#[derive(Debug)]
struct Shared {
    accumulator: TransformAccumulator,
    interpreter: InputInterpreter,
}

/// Pan/zoom controller attached to an [`InputEventSource`].
///
/// Attaching registers pointer and wheel listeners that feed a
/// [`TransformAccumulator`]. The consumer drains changes with
/// [`read`](Self::read), typically once per rendered frame, and tears the
/// listeners down with [`dispose`](Self::dispose) (or by dropping).
///
/// ```
/// use kurbo::Point;
/// use understory_pan_zoom::{InputEvent, LocalEventSource, PanZoom, PanZoomOptions};
///
/// let source = LocalEventSource::new();
/// let mut pan_zoom = PanZoom::attach(source.clone(), PanZoomOptions::default()).unwrap();
///
/// source.dispatch(&InputEvent::PointerDown(Point::new(10.0, 10.0)));
/// source.dispatch(&InputEvent::PointerMove(Point::new(15.0, 12.0)));
/// source.dispatch(&InputEvent::PointerUp(Point::new(15.0, 12.0)));
///
/// let delta = pan_zoom.read();
/// assert_eq!((delta.dx, delta.dy), (5.0, 2.0));
///
/// pan_zoom.dispose();
/// assert_eq!(source.listener_count(), 0);
/// ```
#[derive(Debug)]
pub struct PanZoom<S: InputEventSource> {
    shared: Rc<RefCell<Shared>>,
    source: S,
    registrations: Vec<ListenerRegistration>,
    pixel_ratio: f64,
    ease_factor: f64,
}

#[cfg(feature = "std")]
impl PanZoom<crate::source::LocalEventSource> {
    /// Attaches to this thread's ambient source.
    ///
    /// See [`LocalEventSource::ambient`](crate::LocalEventSource::ambient).
    pub fn new(options: PanZoomOptions) -> Result<Self, ConfigError> {
        Self::attach(crate::source::LocalEventSource::ambient(), options)
    }
}

impl<S: InputEventSource> PanZoom<S> {
    /// Validates `options` and registers listeners on `source`.
    ///
    /// Nothing is registered if validation fails.
    pub fn attach(source: S, options: PanZoomOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let shared = Rc::new(RefCell::new(Shared {
            accumulator: TransformAccumulator::with_reference(options.transform_reference.clone()),
            interpreter: InputInterpreter::new(options.interpreter_config()),
        }));

        let mut kinds = Vec::new();
        if options.manage_pan {
            kinds.extend([
                InputEventKind::PointerDown,
                InputEventKind::PointerMove,
                InputEventKind::PointerUp,
            ]);
        }
        if options.manage_zoom {
            kinds.push(InputEventKind::Wheel);
        }

        let pixel_ratio = options.pixel_ratio;
        let registrations = kinds
            .into_iter()
            .map(|kind| {
                // The wheel listener has to be able to cancel page scrolling.
                let listener_options = ListenerOptions {
                    passive: kind != InputEventKind::Wheel,
                };
                let weak = Rc::downgrade(&shared);
                let id = source.add_listener(
                    kind,
                    Rc::new(move |event: &InputEvent| deliver(&weak, event.scaled(pixel_ratio))),
                    listener_options,
                );
                ListenerRegistration {
                    kind,
                    id,
                    options: listener_options,
                }
            })
            .collect::<Vec<_>>();

        log::debug!("pan/zoom attached with {} listeners", registrations.len());
        Ok(Self {
            shared,
            source,
            registrations,
            pixel_ratio,
            ease_factor: options.ease_factor,
        })
    }

    /// Drains the change since the last read and folds it into the total.
    ///
    /// Intended to be called at most once per frame.
    ///
    /// # Panics
    ///
    /// This and the other state queries panic if called from an
    /// [`External`](TransformReference::External) provider while this
    /// controller is handling an event.
    pub fn read(&self) -> TransformDelta {
        self.shared.borrow_mut().accumulator.read()
    }

    /// Drains like [`read`](Self::read) and returns the updated total.
    pub fn read_total(&self) -> ViewTransform {
        self.shared.borrow_mut().accumulator.read_total()
    }

    /// Cumulative transform as of the last read.
    #[must_use]
    pub fn total(&self) -> ViewTransform {
        self.shared.borrow().accumulator.total()
    }

    /// Current effective transform according to the configured reference.
    #[must_use]
    pub fn reference(&self) -> ViewTransform {
        self.shared.borrow().accumulator.reference()
    }

    /// Returns `true` while a drag gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.shared.borrow().interpreter.is_dragging()
    }

    /// Runs `f` with mutable access to the accumulator.
    ///
    /// Events dispatched from inside `f` are dropped.
    pub fn with_accumulator<R>(&self, f: impl FnOnce(&mut TransformAccumulator) -> R) -> R {
        f(&mut self.shared.borrow_mut().accumulator)
    }

    /// Device pixel ratio applied to incoming positions.
    #[must_use]
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Reserved ease factor; currently has no effect.
    #[must_use]
    pub fn ease_factor(&self) -> f64 {
        self.ease_factor
    }

    /// Live listener registrations. Empty after [`dispose`](Self::dispose).
    #[must_use]
    pub fn registrations(&self) -> &[ListenerRegistration] {
        &self.registrations
    }

    /// The source listeners are attached to.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Removes every registered listener. Calling it again does nothing.
    ///
    /// Accumulated state is kept as-is, including any drag in progress.
    pub fn dispose(&mut self) {
        if self.registrations.is_empty() {
            return;
        }
        log::debug!("pan/zoom disposing {} listeners", self.registrations.len());
        for registration in self.registrations.drain(..) {
            self.source.remove_listener(registration.id);
        }
    }
}

impl<S: InputEventSource> Drop for PanZoom<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn deliver(shared: &Weak<RefCell<Shared>>, event: InputEvent) -> EventResponse {
    let Some(shared) = shared.upgrade() else {
        return EventResponse::Continue;
    };
    let Ok(mut shared) = shared.try_borrow_mut() else {
        log::warn!("dropping {:?} dispatched while pan/zoom state is borrowed", event.kind());
        return EventResponse::Continue;
    };
    let Shared {
        accumulator,
        interpreter,
    } = &mut *shared;
    interpreter.handle(&event, accumulator)
}
