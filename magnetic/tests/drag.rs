// Copyright 2025 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer routing: tap threshold, all-node and single-node drags, long
//! presses, and view coordinate conversion.

use kurbo::{Point, Rect};
use magnetic::{DragMode, Host, MagneticConfig, MagneticView, Phase};
use magnetic_ref::RefHost;

mod common;

use common::{CENTER, Event, FRAME, bubble, place, position, scene, settle};

#[test]
fn travel_below_forgiveness_distance_is_a_tap() {
    let (mut magnetic, recorder) = scene(MagneticConfig::default());
    magnetic.host_mut().set_speed(0.0);
    let id = place(&mut magnetic, "Rock", CENTER);

    magnetic.touch_began(CENTER, 0.0);
    magnetic.touch_moved(CENTER + (2.0, 2.0));
    magnetic.touch_ended(CENTER + (3.0, 3.0), 0.1);
    assert_eq!(recorder.take(), [Event::Select(id)]);

    magnetic.touch_began(CENTER, 1.0);
    magnetic.touch_moved(CENTER + (4.0, 4.0));
    magnetic.touch_ended(CENTER + (4.0, 4.0), 1.1);
    assert!(recorder.take().is_empty());
    assert!(!magnetic.is_dragging());
}

#[test]
fn dragging_empty_space_nudges_every_node() {
    let (mut magnetic, _) = scene(MagneticConfig::default());
    let id = place(&mut magnetic, "Rock", CENTER);

    magnetic.touch_began(Point::new(20.0, 20.0), 0.0);
    magnetic.touch_moved(Point::new(40.0, 20.0));
    assert_eq!(magnetic.drag_mode(), DragMode::All);
    magnetic.advance(FRAME);

    let body = magnetic.host().body(id).expect("present");
    assert!(body.velocity.x > 0.0);
    assert!(body.velocity.y.abs() < 1e-9);
}

#[test]
fn all_node_drags_can_be_disabled() {
    let (mut magnetic, _) = scene(MagneticConfig {
        moves_all_nodes: false,
        ..MagneticConfig::default()
    });
    let id = place(&mut magnetic, "Rock", CENTER);

    magnetic.touch_began(Point::new(20.0, 20.0), 0.0);
    magnetic.touch_moved(Point::new(40.0, 20.0));
    magnetic.advance(FRAME);
    assert_eq!(position(&magnetic, id), CENTER);
}

#[test]
fn single_node_drag_follows_the_finger() {
    let (mut magnetic, recorder) = scene(MagneticConfig {
        moves_single_node: true,
        ..MagneticConfig::default()
    });
    let id = place(&mut magnetic, "Rock", CENTER);
    let other = place(&mut magnetic, "Jazz", Point::new(150.0, 250.0));

    magnetic.touch_began(CENTER, 0.0);
    magnetic.touch_moved(CENTER + (20.0, 0.0));
    assert_eq!(magnetic.drag_mode(), DragMode::Single(id));
    assert_eq!(magnetic.host().active_timers(), 1);

    // The finger rests; the recurring force keeps pulling.
    settle(&mut magnetic, 10);
    assert!(position(&magnetic, id).x > CENTER.x);
    assert!((position(&magnetic, other).x - 150.0).abs() < 1e-9);

    magnetic.touch_ended(CENTER + (20.0, 0.0), 0.5);
    assert_eq!(magnetic.drag_mode(), DragMode::Idle);
    assert_eq!(magnetic.host().active_timers(), 0);
    assert!(recorder.take().is_empty());
}

#[test]
fn single_node_drags_off_a_node_move_everything() {
    let (mut magnetic, _) = scene(MagneticConfig {
        moves_single_node: true,
        ..MagneticConfig::default()
    });
    place(&mut magnetic, "Rock", CENTER);

    magnetic.touch_began(Point::new(20.0, 20.0), 0.0);
    magnetic.touch_moved(Point::new(30.0, 20.0));
    assert_eq!(magnetic.drag_mode(), DragMode::All);
}

#[test]
fn new_touches_cancel_stale_timers() {
    let (mut magnetic, _) = scene(MagneticConfig {
        moves_single_node: true,
        ..MagneticConfig::default()
    });
    place(&mut magnetic, "Rock", CENTER);

    magnetic.touch_began(CENTER, 0.0);
    magnetic.touch_moved(CENTER + (10.0, 0.0));
    magnetic.touch_moved(CENTER + (12.0, 0.0));
    assert_eq!(magnetic.host().active_timers(), 1);

    // The touch-up was lost; the next touch cleans up.
    magnetic.touch_began(Point::new(20.0, 20.0), 1.0);
    assert_eq!(magnetic.host().active_timers(), 0);
    assert_eq!(magnetic.drag_mode(), DragMode::Idle);
}

#[test]
fn removing_a_grabbed_node_ends_its_pull() {
    let (mut magnetic, recorder) = scene(MagneticConfig {
        moves_single_node: true,
        ..MagneticConfig::default()
    });
    magnetic.host_mut().set_speed(0.0);
    let id = place(&mut magnetic, "Rock", CENTER);

    magnetic.touch_began(CENTER, 0.0);
    magnetic.touch_moved(CENTER + (10.0, 0.0));
    assert_eq!(magnetic.host().active_timers(), 1);

    assert!(magnetic.remove(id));
    // The next tick finds the node leaving and drops the timer.
    magnetic.advance(FRAME);
    assert_eq!(magnetic.host().active_timers(), 0);

    magnetic.touch_moved(CENTER + (30.0, 0.0));
    assert_eq!(magnetic.host().active_timers(), 0);
    magnetic.advance(FRAME);
    assert_eq!(position(&magnetic, id), CENTER);

    magnetic.touch_ended(CENTER + (30.0, 0.0), 0.2);
    assert_eq!(magnetic.drag_mode(), DragMode::Idle);
    assert!(recorder.take().is_empty());

    settle(&mut magnetic, 30);
    assert_eq!(recorder.take(), [Event::Remove(id, Some("Rock".into()))]);
}

#[test]
fn cancelled_touches_never_select() {
    let (mut magnetic, recorder) = scene(MagneticConfig::default());
    magnetic.host_mut().set_speed(0.0);
    place(&mut magnetic, "Rock", CENTER);

    magnetic.touch_began(CENTER, 0.0);
    magnetic.touch_cancelled();
    magnetic.touch_ended(CENTER, 0.1);
    assert!(recorder.take().is_empty());
}

#[test]
fn long_press_removes_unselected_nodes() {
    let (mut magnetic, recorder) = scene(MagneticConfig {
        remove_on_long_press: true,
        ..MagneticConfig::default()
    });
    magnetic.host_mut().set_speed(0.0);
    let held = place(&mut magnetic, "held", Point::new(80.0, 150.0));
    let selected = place(&mut magnetic, "selected", Point::new(220.0, 150.0));
    magnetic.select(selected);
    recorder.take();

    // A quick tap still selects.
    magnetic.touch_began(Point::new(80.0, 150.0), 0.0);
    magnetic.touch_ended(Point::new(80.0, 150.0), 0.1);
    assert_eq!(recorder.take(), [Event::Select(held)]);
    magnetic.deselect(held);
    recorder.take();

    magnetic.touch_began(Point::new(80.0, 150.0), 1.0);
    magnetic.touch_ended(Point::new(80.0, 150.0), 1.4);
    assert_eq!(magnetic.node(held).map(|node| node.phase()), Some(Phase::Removing));

    // Selected nodes are deselected instead.
    magnetic.touch_began(Point::new(220.0, 150.0), 2.0);
    magnetic.touch_ended(Point::new(220.0, 150.0), 2.5);
    assert_eq!(recorder.take(), [Event::Deselect(selected)]);

    settle(&mut magnetic, 30);
    assert_eq!(recorder.take(), [Event::Remove(held, Some("held".into()))]);
}

#[test]
fn view_points_are_flipped_into_scene_space() {
    let mut view = MagneticView::new(RefHost::new(), Rect::new(0.0, 0.0, 300.0, 300.0));
    assert_eq!(view.to_scene(Point::new(100.0, 20.0)), Point::new(100.0, 280.0));

    let id = view.magnetic_mut().insert(bubble("Rock"));
    view.magnetic_mut().host_mut().set_speed(0.0);
    view.magnetic_mut().host_mut().place(id, Point::new(100.0, 280.0));

    view.touch_began(Point::new(100.0, 20.0), 0.0);
    view.touch_ended(Point::new(100.0, 20.0), 0.1);
    assert!(view.magnetic().node(id).expect("present").is_selected());

    view.layout(Rect::new(0.0, 0.0, 400.0, 200.0));
    assert_eq!(view.magnetic().size(), view.bounds().size());
    assert_eq!(view.to_scene(Point::new(0.0, 0.0)), Point::new(0.0, 200.0));
}
