// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversion of raw pointer/wheel input into accumulator updates.

use kurbo::Point;

use crate::accumulator::TransformAccumulator;
use crate::drag::DragState;
use crate::source::{EventResponse, InputEvent};
use crate::zoom::{DEFAULT_WHEEL_SENSITIVITY, ZoomBounds, wheel_zoom_delta};

/// Settings for [`InputInterpreter`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterpreterConfig {
    /// Zoom change per unit of wheel `delta_y`.
    pub wheel_sensitivity: f64,
    /// Range the zoom is clamped into on wheel input.
    pub zoom_bounds: ZoomBounds,
    /// Whether pointer drags pan.
    pub manage_pan: bool,
    /// Whether the wheel zooms.
    pub manage_zoom: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            wheel_sensitivity: DEFAULT_WHEEL_SENSITIVITY,
            zoom_bounds: ZoomBounds::UNBOUNDED,
            manage_pan: true,
            manage_zoom: true,
        }
    }
}

/// Drag-to-pan and wheel-to-zoom state machine.
///
/// Pan deltas are added to the accumulator's pending delta with
/// [`TransformAccumulator::increment_delta`]; zoom deltas replace it with
/// [`TransformAccumulator::set_delta`], since each wheel step is derived from
/// the current reference transform rather than from earlier steps.
///
/// ```
/// use kurbo::Point;
/// use understory_pan_zoom::{InputInterpreter, TransformAccumulator};
///
/// let mut acc = TransformAccumulator::new();
/// let mut input = InputInterpreter::default();
///
/// input.pointer_down(Point::new(10.0, 10.0));
/// input.pointer_move(Point::new(15.0, 12.0), &mut acc);
/// input.pointer_up();
///
/// let delta = acc.read();
/// assert_eq!((delta.dx, delta.dy), (5.0, 2.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct InputInterpreter {
    config: InterpreterConfig,
    drag: DragState,
}

impl InputInterpreter {
    /// Creates an idle interpreter.
    #[must_use]
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            config,
            drag: DragState::default(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Returns `true` between pointer-down and pointer-up.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Starts a drag anchored at `pos`.
    pub fn pointer_down(&mut self, pos: Point) {
        if !self.config.manage_pan {
            return;
        }
        log::trace!("drag start at {pos:?}");
        self.drag.start(pos);
    }

    /// Pans by the pointer movement, converted to world units.
    ///
    /// The scale is read from the live reference on every call, so a zoom
    /// mid-drag is honoured. Returns `false` when no drag is active.
    pub fn pointer_move(&mut self, pos: Point, acc: &mut TransformAccumulator) -> bool {
        if !self.config.manage_pan {
            return false;
        }
        let Some(delta) = self.drag.update(pos) else {
            return false;
        };
        let z = acc.reference().z();
        acc.increment_delta(delta.x / z, delta.y / z, 0.0);
        true
    }

    /// Ends the current drag, if any.
    pub fn pointer_up(&mut self) {
        if self.drag.is_dragging() {
            log::trace!("drag end at {:?}", self.drag.anchor());
        }
        self.drag.end();
    }

    /// Zooms about `pos` by one wheel step.
    ///
    /// Returns `false` if zoom handling is disabled or the step was
    /// discarded because it would invert the zoom.
    pub fn wheel(&mut self, pos: Point, delta_y: f64, acc: &mut TransformAccumulator) -> bool {
        if !self.config.manage_zoom {
            return false;
        }
        let Some(delta) = wheel_zoom_delta(
            acc.reference(),
            pos,
            delta_y,
            self.config.wheel_sensitivity,
            self.config.zoom_bounds,
        ) else {
            return false;
        };
        acc.set_delta(Some(delta.dx), Some(delta.dy), Some(delta.dz));
        true
    }

    /// Routes `event` to the matching handler.
    ///
    /// Wheel events ask for the host's default scrolling to be suppressed
    /// whenever zoom handling is enabled.
    pub fn handle(&mut self, event: &InputEvent, acc: &mut TransformAccumulator) -> EventResponse {
        match *event {
            InputEvent::PointerDown(pos) => self.pointer_down(pos),
            InputEvent::PointerMove(pos) => {
                self.pointer_move(pos, acc);
            }
            InputEvent::PointerUp(_) => self.pointer_up(),
            InputEvent::Wheel { position, delta_y } => {
                if self.config.manage_zoom {
                    self.wheel(position, delta_y, acc);
                    return EventResponse::PreventDefault;
                }
            }
        }
        EventResponse::Continue
    }
}
