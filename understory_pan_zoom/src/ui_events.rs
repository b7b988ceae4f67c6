// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter from `ui-events` pointer events.
//!
//! Positions are taken in logical units; the [`PanZoom`](crate::PanZoom)
//! pixel ratio is applied afterwards, at the listener boundary.

use ::ui_events::ScrollDelta;
use ::ui_events::pointer::{PointerEvent, PointerScrollEvent};

use crate::source::{EventResponse, InputEvent, LocalEventSource};

/// Sizes used to turn line- and page-based wheel deltas into pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollResolution {
    /// Pixels per scrolled line.
    pub line_height: f64,
    /// Pixels per scrolled page.
    pub page_height: f64,
}

impl Default for ScrollResolution {
    fn default() -> Self {
        Self {
            line_height: 20.0,
            page_height: 600.0,
        }
    }
}

/// Converts a pointer event into an [`InputEvent`].
///
/// Returns `None` for events that do not affect pan or zoom (gestures,
/// enter/leave, cancel) and for scroll events without a vertical component.
#[must_use]
pub fn input_event_from_pointer(
    event: &PointerEvent,
    resolution: ScrollResolution,
) -> Option<InputEvent> {
    match event {
        PointerEvent::Down(e) => Some(InputEvent::PointerDown(e.state.logical_point())),
        PointerEvent::Move(e) => Some(InputEvent::PointerMove(e.current.logical_point())),
        PointerEvent::Up(e) => Some(InputEvent::PointerUp(e.state.logical_point())),
        PointerEvent::Scroll(e) => {
            let delta_y = scroll_delta_y(e, resolution);
            (delta_y != 0.0).then(|| InputEvent::Wheel {
                position: e.state.logical_point(),
                delta_y,
            })
        }
        _ => None,
    }
}

impl LocalEventSource {
    /// Converts and dispatches a pointer event.
    ///
    /// Events with no pan/zoom meaning are reported as
    /// [`EventResponse::Continue`] without reaching any listener.
    pub fn dispatch_pointer(
        &self,
        event: &PointerEvent,
        resolution: ScrollResolution,
    ) -> EventResponse {
        input_event_from_pointer(event, resolution)
            .map_or(EventResponse::Continue, |event| self.dispatch(&event))
    }
}

fn scroll_delta_y(event: &PointerScrollEvent, resolution: ScrollResolution) -> f64 {
    match &event.delta {
        ScrollDelta::PixelDelta(pos) => pos.to_logical(event.state.scale_factor).y,
        ScrollDelta::LineDelta(_, y) => f64::from(*y) * resolution.line_height,
        ScrollDelta::PageDelta(_, y) => f64::from(*y) * resolution.page_height,
    }
}
