// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_pan_zoom` crate.
//!
//! These drive a `PanZoom` through an in-memory event source the way a host
//! event loop would, and check the read/fold contract the renderer relies on.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Affine, Point};
use understory_pan_zoom::{
    ConfigError, InputEvent, LocalEventSource, PanZoom, PanZoomOptions, TransformAccumulator,
    TransformDelta, TransformReference, ViewTransform, ZoomBounds,
};

const EPSILON: f64 = 1e-9;

fn wheel(x: f64, y: f64, delta_y: f64) -> InputEvent {
    InputEvent::Wheel {
        position: Point::new(x, y),
        delta_y,
    }
}

#[test]
fn fresh_controller_reads_identity() {
    let source = LocalEventSource::new();
    let pan_zoom = PanZoom::attach(source, PanZoomOptions::default()).unwrap();
    assert_eq!(pan_zoom.read(), TransformDelta::IDENTITY);
    assert_eq!(pan_zoom.total(), ViewTransform::IDENTITY);
}

#[test]
fn drag_round_trip_then_dispose() {
    let source = LocalEventSource::new();
    let mut pan_zoom = PanZoom::attach(source.clone(), PanZoomOptions::default()).unwrap();

    source.dispatch(&InputEvent::PointerDown(Point::new(10.0, 10.0)));
    source.dispatch(&InputEvent::PointerMove(Point::new(15.0, 12.0)));
    let delta = pan_zoom.read();
    assert_eq!((delta.dx, delta.dy), (5.0, 2.0));

    source.dispatch(&InputEvent::PointerUp(Point::new(15.0, 12.0)));
    assert!(!pan_zoom.is_dragging());

    pan_zoom.dispose();
    assert_eq!(source.listener_count(), 0);
    assert!(pan_zoom.registrations().is_empty());

    // Disposing again is a no-op.
    pan_zoom.dispose();
    assert_eq!(source.listener_count(), 0);
}

#[test]
fn moves_accumulate_until_read() {
    let source = LocalEventSource::new();
    let pan_zoom = PanZoom::attach(source.clone(), PanZoomOptions::default()).unwrap();

    source.dispatch(&InputEvent::PointerDown(Point::new(0.0, 0.0)));
    for i in 1..=4 {
        source.dispatch(&InputEvent::PointerMove(Point::new(f64::from(i), 0.0)));
        assert_eq!(pan_zoom.total(), ViewTransform::IDENTITY);
    }
    assert_eq!(pan_zoom.read(), TransformDelta::new(4.0, 0.0, 1.0));
    assert_eq!(pan_zoom.read(), TransformDelta::IDENTITY);
    assert_eq!(pan_zoom.total().x(), 4.0);
}

#[test]
fn events_after_dispose_change_nothing() {
    let source = LocalEventSource::new();
    let mut pan_zoom = PanZoom::attach(source.clone(), PanZoomOptions::default()).unwrap();

    source.dispatch(&InputEvent::PointerDown(Point::new(0.0, 0.0)));
    pan_zoom.dispose();
    // Mid-drag disposal keeps whatever state was reached.
    assert!(pan_zoom.is_dragging());

    source.dispatch(&InputEvent::PointerMove(Point::new(50.0, 50.0)));
    source.dispatch(&wheel(0.0, 0.0, -100.0));
    assert_eq!(pan_zoom.read(), TransformDelta::IDENTITY);
}

#[test]
fn wheel_keeps_point_under_cursor_fixed() {
    let source = LocalEventSource::new();
    let pan_zoom = PanZoom::attach(source.clone(), PanZoomOptions::default()).unwrap();

    // Give the total a non-trivial starting point.
    source.dispatch(&InputEvent::PointerDown(Point::new(0.0, 0.0)));
    source.dispatch(&InputEvent::PointerMove(Point::new(30.0, -20.0)));
    source.dispatch(&InputEvent::PointerUp(Point::new(30.0, -20.0)));
    pan_zoom.read();

    for (x, y, delta_y) in [(400.0, 300.0, -120.0), (12.0, 640.0, 53.0), (-8.0, 0.5, -900.0)] {
        let cursor = Point::new(x, y);
        let before = pan_zoom.total().view_to_world(cursor);
        source.dispatch(&wheel(x, y, delta_y));
        let after = pan_zoom.read_total().view_to_world(cursor);
        assert!(
            (before.x - after.x).abs() < EPSILON && (before.y - after.y).abs() < EPSILON,
            "world point under cursor moved from {before:?} to {after:?}"
        );
    }
}

#[test]
fn wheel_zoom_stops_at_upper_bound() {
    let source = LocalEventSource::new();
    let options = PanZoomOptions::new().with_zoom_bounds(ZoomBounds::new(0.5, 2.0).unwrap());
    let pan_zoom = PanZoom::attach(source.clone(), options).unwrap();
    pan_zoom.with_accumulator(|acc| acc.reinitialize(ViewTransform::new(0.0, 0.0, 1.9).unwrap()));

    // Unclamped, this step would take the zoom to 2.5.
    let delta_y = -(2.5 / 1.9 - 1.0) / 0.0005;
    source.dispatch(&wheel(200.0, 100.0, delta_y));
    let zoom = pan_zoom.read_total().z();
    assert!((zoom - 2.0).abs() < EPSILON, "zoom {zoom} should land on the bound");

    // Further zooming in is pinned at the bound.
    source.dispatch(&wheel(200.0, 100.0, -500.0));
    let zoom = pan_zoom.read_total().z();
    assert!((zoom - 2.0).abs() < EPSILON, "zoom {zoom} should stay on the bound");
}

#[test]
fn large_zoom_out_lands_on_lower_bound() {
    let source = LocalEventSource::new();
    let options = PanZoomOptions::new().with_zoom_bounds(ZoomBounds::new(0.5, 2.0).unwrap());
    let pan_zoom = PanZoom::attach(source.clone(), options).unwrap();

    // The raw factor here is 1 - 4000 * 0.0005 = -1.
    source.dispatch(&wheel(120.0, 80.0, 4000.0));
    let zoom = pan_zoom.read_total().z();
    assert!((zoom - 0.5).abs() < EPSILON, "zoom {zoom} should land on the bound");
}

#[test]
fn rapid_wheel_steps_replace_each_other() {
    let source = LocalEventSource::new();
    let pan_zoom = PanZoom::attach(source.clone(), PanZoomOptions::default()).unwrap();

    source.dispatch(&wheel(100.0, 100.0, -100.0));
    source.dispatch(&wheel(100.0, 100.0, -100.0));
    let delta = pan_zoom.read();
    assert!((delta.dz - 1.05).abs() < EPSILON);
}

#[test]
fn drag_after_zoom_pans_in_world_units() {
    let source = LocalEventSource::new();
    let pan_zoom = PanZoom::attach(source.clone(), PanZoomOptions::default()).unwrap();
    pan_zoom.with_accumulator(|acc| acc.reinitialize(ViewTransform::new(0.0, 0.0, 2.0).unwrap()));

    source.dispatch(&InputEvent::PointerDown(Point::new(0.0, 0.0)));
    source.dispatch(&InputEvent::PointerMove(Point::new(10.0, 6.0)));
    assert_eq!(pan_zoom.read(), TransformDelta::new(5.0, 3.0, 1.0));
    // Folded at the old zoom: the view moved by the full 10x6 pixels.
    assert_eq!(pan_zoom.total(), ViewTransform::new(10.0, 6.0, 2.0).unwrap());
}

#[test]
fn external_reference_drives_input_math() {
    let zoom = Rc::new(Cell::new(4.0));
    let provider = zoom.clone();
    let options = PanZoomOptions::new().with_transform_reference(TransformReference::external(
        move || ViewTransform::new(0.0, 0.0, provider.get()).unwrap(),
    ));
    let source = LocalEventSource::new();
    let pan_zoom = PanZoom::attach(source.clone(), options).unwrap();
    assert_eq!(pan_zoom.reference().z(), 4.0);

    source.dispatch(&InputEvent::PointerDown(Point::new(0.0, 0.0)));
    source.dispatch(&InputEvent::PointerMove(Point::new(8.0, 4.0)));
    zoom.set(2.0);
    source.dispatch(&InputEvent::PointerMove(Point::new(12.0, 4.0)));
    assert_eq!(pan_zoom.read(), TransformDelta::new(4.0, 1.0, 1.0));
}

#[test]
fn non_uniform_scale_is_rejected_without_side_effects() {
    let mut acc = TransformAccumulator::with_total(ViewTransform::new(3.0, 4.0, 1.5).unwrap());
    let before = *acc.state();

    assert_eq!(
        acc.try_reinitialize_from_affine(Affine::scale_non_uniform(2.0, 1.0)),
        Err(ConfigError::NonUniformScale {
            scale_x: 2.0,
            scale_y: 1.0,
        })
    );
    assert!(acc.set_delta_affine(Affine::scale_non_uniform(1.0, 3.0)).is_err());
    assert_eq!(*acc.state(), before);

    assert!(ViewTransform::try_from(Affine::scale_non_uniform(1.0, 1.01)).is_err());
}

#[test]
fn ease_factor_is_stored_but_inert() {
    let source = LocalEventSource::new();
    let eased = PanZoom::attach(source.clone(), PanZoomOptions::new().with_ease_factor(0.25))
        .unwrap();
    assert_eq!(eased.ease_factor(), 0.25);

    source.dispatch(&InputEvent::PointerDown(Point::new(0.0, 0.0)));
    source.dispatch(&InputEvent::PointerMove(Point::new(8.0, 0.0)));
    assert_eq!(eased.read(), TransformDelta::new(8.0, 0.0, 1.0));
}

#[test]
fn controllers_on_one_source_are_independent() {
    let source = LocalEventSource::new();
    let first = PanZoom::attach(source.clone(), PanZoomOptions::default()).unwrap();
    let mut second = PanZoom::attach(source.clone(), PanZoomOptions::default()).unwrap();
    assert_eq!(source.listener_count(), 8);

    second.dispose();
    assert_eq!(source.listener_count(), 4);

    source.dispatch(&InputEvent::PointerDown(Point::new(0.0, 0.0)));
    source.dispatch(&InputEvent::PointerMove(Point::new(1.0, 1.0)));
    assert_eq!(first.read(), TransformDelta::new(1.0, 1.0, 1.0));
    assert_eq!(second.read(), TransformDelta::IDENTITY);
}
