// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag tracking for pan gestures.
//!
//! 1) [`DragState::start`] on pointer-down records the anchor.
//! 2) [`DragState::update`] on every pointer-move returns the screen-space
//!    movement since the previous tracked position.
//! 3) [`DragState::end`] on pointer-up returns to idle.

use kurbo::{Point, Vec2};

/// Idle/dragging state machine for a single pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    active: bool,
    anchor: Point,
}

impl DragState {
    /// Enters the dragging state with the anchor at `pos`.
    ///
    /// Starting while already dragging re-anchors the gesture.
    pub fn start(&mut self, pos: Point) {
        self.active = true;
        self.anchor = pos;
    }

    /// Returns the movement from the last tracked position and advances it.
    ///
    /// Returns `None` while idle.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        if !self.active {
            return None;
        }
        let delta = pos - self.anchor;
        self.anchor = pos;
        Some(delta)
    }

    /// Returns to idle. Safe to call while already idle.
    pub fn end(&mut self) {
        self.active = false;
    }

    /// Returns `true` while a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.active
    }

    /// Last tracked pointer position of the current (or last) drag.
    #[must_use]
    pub fn anchor(&self) -> Point {
        self.anchor
    }
}
