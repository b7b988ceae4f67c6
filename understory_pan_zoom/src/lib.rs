// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pan_zoom --heading-base-level=0

//! Understory Pan Zoom: incremental pan + zoom transforms from pointer input.
//!
//! This crate turns pointer drags and wheel steps into a uniform 2D
//! transform (translation + zoom) that a renderer applies to its surface.
//! It focuses on:
//! - Accumulating changes between frames and handing them out exactly once
//!   ([`TransformAccumulator`]).
//! - Drag-to-pan in world units and zoom-toward-cursor
//!   ([`InputInterpreter`]).
//! - Attaching to and detaching from an input source
//!   ([`PanZoom`], [`InputEventSource`]).
//!
//! It does **not** render, recognize multi-touch gestures, animate, or
//! persist anything.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_pan_zoom::{InputEvent, LocalEventSource, PanZoom, PanZoomOptions};
//!
//! let source = LocalEventSource::new();
//! let pan_zoom = PanZoom::attach(source.clone(), PanZoomOptions::default()).unwrap();
//!
//! // The host forwards its input events.
//! source.dispatch(&InputEvent::Wheel { position: Point::new(400.0, 300.0), delta_y: -120.0 });
//!
//! // Once per frame: take the change and apply it to the render transform.
//! let delta = pan_zoom.read();
//! let frame_transform = delta.to_affine();
//! assert!(delta.dz > 1.0);
//! # let _ = frame_transform;
//! ```
//!
//! ## Reading model
//!
//! [`TransformAccumulator::read`] returns the change since the previous read
//! and resets it to identity, so a frame that reads twice sees nothing the
//! second time. The running total is updated at the same moment by folding
//! the returned delta in translation-first:
//!
//! ```text
//! total.x += delta.dx * total.z
//! total.y += delta.dy * total.z
//! total.z *= delta.dz
//! ```
//!
//! Drag deltas accumulate additively between reads. Each wheel step
//! *replaces* the pending delta, because its anchoring translation is
//! derived from the current reference transform.
//!
//! ## Design notes
//!
//! - Zoom is always uniform. Matrices with unequal X/Y scale, rotation or
//!   skew are rejected with [`ConfigError`] instead of being approximated.
//! - The transform used for input math comes from a
//!   [`TransformReference`]: either the accumulator's own total, or a
//!   caller-provided query when the render transform is composed with other
//!   transforms.
//! - Everything is single-threaded; listeners share state through `Rc`.
//!
//! ## Features
//!
//! - `std` (default): thread-local ambient source
//!   (`LocalEventSource::ambient`) and `PanZoom::new`.
//! - `libm`: `no_std` float math for Kurbo.
//! - `ui_events_adapter` (default): conversion from `ui-events` pointer
//!   events.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod accumulator;
pub mod drag;
mod error;
pub mod interpreter;
mod pan_zoom;
pub mod source;
mod transform;
#[cfg(feature = "ui_events_adapter")]
pub mod ui_events;
pub mod zoom;

pub use accumulator::{AccumulatorState, TransformAccumulator, TransformReference};
pub use drag::DragState;
pub use error::ConfigError;
pub use interpreter::{InputInterpreter, InterpreterConfig};
pub use pan_zoom::{PanZoom, PanZoomOptions};
pub use source::{
    EventResponse, InputEvent, InputEventKind, InputEventSource, Listener, ListenerId,
    ListenerOptions, ListenerRegistration, LocalEventSource,
};
pub use transform::{TransformDelta, ViewTransform};
pub use zoom::{DEFAULT_WHEEL_SENSITIVITY, ZoomBounds, wheel_zoom_delta};
