use diagramkit_core::{CanvasError, GestureKind, Point, Rect, Vector};
use diagramkit_designer::{
    Connection, ConnectorSide, DesignerCanvas, Entity, GraphicalObject, Modifiers, MouseButton,
    ResizeHandle,
};
use diagramkit_settings::CanvasSettings;

use super::support::{assert_consistent, canvas, canvas_with, grid, show};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_drag_is_clamped_at_origin() {
    let (mut canvas, host) = canvas();
    let id = canvas.add_item(Entity::with_rect(5.0, 5.0, 10.0, 10.0)).unwrap();
    show(&mut canvas, 400.0, 300.0);

    canvas.begin_drag(id).unwrap();
    assert_eq!(canvas.active_gesture(), Some(GestureKind::Drag));
    let applied = canvas.update_drag(Vector::new(-20.0, 3.0)).unwrap();
    assert_eq!(applied, Vector::new(-5.0, 3.0));
    canvas.complete_gesture(Modifiers::NONE).unwrap();
    assert_eq!(canvas.active_gesture(), None);

    let entity = canvas.items().get_entity(id).unwrap();
    assert_eq!((entity.left(), entity.top()), (0.0, 8.0));
    canvas.run_pending().unwrap();
    assert_consistent(&canvas, &host);
}

#[test]
fn test_drag_moves_selection_and_connections() {
    let (mut canvas, _host) = canvas();
    let a = Entity::with_rect(100.0, 100.0, 20.0, 20.0);
    let b = Entity::with_rect(200.0, 100.0, 20.0, 20.0);
    let link = Connection::new(&a, ConnectorSide::Right, &b, ConnectorSide::Left);
    let (a_id, b_id, link_id) = (a.id(), b.id(), link.id());
    let objects: Vec<GraphicalObject> = vec![link.into(), a.into(), b.into()];
    canvas.add_items(objects).unwrap();
    let (a, b, link) = (a_id, b_id, link_id);

    canvas.select(a).unwrap();
    canvas.select(b).unwrap();
    canvas.begin_drag(a).unwrap();
    canvas.update_drag(Vector::new(10.0, 20.0)).unwrap();
    canvas.complete_gesture(Modifiers::NONE).unwrap();

    assert_eq!(canvas.items().get_entity(a).unwrap().left(), 110.0);
    assert_eq!(canvas.items().get_entity(b).unwrap().left(), 210.0);
    let connection = canvas.items().get_connection(link).unwrap();
    assert_eq!(connection.source_position(), Point::new(130.0, 130.0));
    assert_eq!(connection.sink_position(), Point::new(210.0, 130.0));
}

#[test]
fn test_batched_drag_applies_offset_on_completion() {
    let settings = CanvasSettings {
        instant_preview_threshold: 2,
        ..CanvasSettings::default()
    };
    let (mut canvas, _host) = canvas_with(settings);
    let a = canvas.add_item(Entity::with_rect(100.0, 100.0, 20.0, 20.0)).unwrap();
    let b = canvas.add_item(Entity::with_rect(200.0, 100.0, 20.0, 20.0)).unwrap();
    canvas.select(a).unwrap();
    canvas.select(b).unwrap();

    canvas.begin_drag(a).unwrap();
    canvas.update_drag(Vector::new(10.0, 0.0)).unwrap();
    canvas.update_drag(Vector::new(5.0, 0.0)).unwrap();
    // Only the item under the pointer follows live.
    assert_eq!(canvas.items().get_entity(a).unwrap().left(), 115.0);
    assert_eq!(canvas.items().get_entity(b).unwrap().left(), 200.0);

    canvas.complete_gesture(Modifiers::NONE).unwrap();
    assert_eq!(canvas.items().get_entity(b).unwrap().left(), 215.0);
}

#[test]
fn test_batched_drag_is_clamped_at_origin() {
    let settings = CanvasSettings {
        instant_preview_threshold: 2,
        ..CanvasSettings::default()
    };
    let (mut canvas, _host) = canvas_with(settings);
    let live = canvas.add_item(Entity::with_rect(100.0, 100.0, 20.0, 20.0)).unwrap();
    let trailing = canvas.add_item(Entity::with_rect(5.0, 50.0, 20.0, 20.0)).unwrap();
    canvas.select(live).unwrap();
    canvas.select(trailing).unwrap();

    canvas.begin_drag(live).unwrap();
    // The trailing item has not moved yet, but its pending offset counts.
    assert_eq!(
        canvas.update_drag(Vector::new(-20.0, 0.0)).unwrap(),
        Vector::new(-5.0, 0.0)
    );
    assert_eq!(
        canvas.update_drag(Vector::new(-20.0, 0.0)).unwrap(),
        Vector::default()
    );
    assert_eq!(canvas.items().get_entity(trailing).unwrap().left(), 5.0);

    canvas.complete_gesture(Modifiers::NONE).unwrap();
    assert_eq!(canvas.items().get_entity(trailing).unwrap().left(), 0.0);
    assert_eq!(canvas.items().get_entity(live).unwrap().left(), 95.0);
}

#[test]
fn test_cancelled_drag_restores_positions() {
    let (mut canvas, _host) = canvas();
    let id = canvas.add_item(Entity::with_rect(50.0, 50.0, 10.0, 10.0)).unwrap();
    canvas.begin_drag(id).unwrap();
    canvas.update_drag(Vector::new(30.0, -10.0)).unwrap();
    assert!(canvas.cancel_gesture().unwrap());
    let entity = canvas.items().get_entity(id).unwrap();
    assert_eq!((entity.left(), entity.top()), (50.0, 50.0));
    assert!(!canvas.cancel_gesture().unwrap());
}

#[test]
fn test_resize_group_respects_smallest_margin() {
    let (mut canvas, _host) = canvas();
    let a = canvas
        .add_item(Entity::with_rect(0.0, 0.0, 20.0, 20.0).with_min_size(10.0, 10.0))
        .unwrap();
    let b = canvas
        .add_item(Entity::with_rect(50.0, 0.0, 15.0, 20.0).with_min_size(10.0, 10.0))
        .unwrap();
    canvas.select(a).unwrap();
    canvas.select(b).unwrap();

    canvas.begin_resize(a, ResizeHandle::RIGHT).unwrap();
    canvas
        .update_resize(Vector::new(-8.0, 0.0), Modifiers::NONE)
        .unwrap();
    canvas.complete_gesture(Modifiers::NONE).unwrap();

    // The group may shrink by at most min(20 - 10, 15 - 10) = 5.
    assert_eq!(canvas.items().get_entity(a).unwrap().width(), 15.0);
    assert_eq!(canvas.items().get_entity(b).unwrap().width(), 10.0);
}

#[test]
fn test_resize_left_edge_stops_at_origin() {
    let (mut canvas, _host) = canvas();
    let id = canvas.add_item(Entity::with_rect(3.0, 0.0, 40.0, 20.0)).unwrap();

    canvas.begin_resize(id, ResizeHandle::LEFT).unwrap();
    canvas
        .update_resize(Vector::new(-10.0, 0.0), Modifiers::NONE)
        .unwrap();
    let entity = canvas.items().get_entity(id).unwrap();
    assert_eq!((entity.left(), entity.width()), (0.0, 43.0));

    assert!(canvas.cancel_gesture().unwrap());
    let entity = canvas.items().get_entity(id).unwrap();
    assert_eq!((entity.left(), entity.width()), (3.0, 40.0));
}

#[test]
fn test_resize_corner_keeps_aspect_with_shift() {
    let (mut canvas, _host) = canvas();
    let id = canvas.add_item(Entity::with_rect(0.0, 0.0, 40.0, 20.0)).unwrap();

    canvas.begin_resize(id, ResizeHandle::BOTTOM_RIGHT).unwrap();
    canvas
        .update_resize(Vector::new(3.0, 10.0), Modifiers::SHIFT)
        .unwrap();
    let entity = canvas.items().get_entity(id).unwrap();
    assert_eq!(entity.height(), 30.0);
    assert_eq!(entity.width(), 60.0);
}

#[test]
fn test_aspect_resize_left_edge_stops_at_origin() {
    let (mut canvas, _host) = canvas();
    let id = canvas.add_item(Entity::with_rect(0.0, 50.0, 40.0, 20.0)).unwrap();

    canvas.begin_resize(id, ResizeHandle::TOP_LEFT).unwrap();
    canvas
        .update_resize(Vector::new(0.0, -10.0), Modifiers::SHIFT)
        .unwrap();
    let entity = canvas.items().get_entity(id).unwrap();
    assert_eq!(entity.left(), 0.0);
    assert_eq!(entity.frame(), Rect::new(0.0, 50.0, 40.0, 20.0));
}

#[test]
fn test_aspect_resize_left_edge_grows_until_origin() {
    let (mut canvas, _host) = canvas();
    let id = canvas.add_item(Entity::with_rect(10.0, 50.0, 40.0, 20.0)).unwrap();

    // Growing the height by 10 would widen by 20 and push left to -10.
    canvas.begin_resize(id, ResizeHandle::BOTTOM_LEFT).unwrap();
    canvas
        .update_resize(Vector::new(0.0, 10.0), Modifiers::SHIFT)
        .unwrap();
    let entity = canvas.items().get_entity(id).unwrap();
    assert_close(entity.left(), 0.0);
    assert_close(entity.width(), 50.0);
    assert_close(entity.height(), 25.0);
}

#[test]
fn test_aspect_resize_keeps_derived_width_above_minimum() {
    let (mut canvas, _host) = canvas();
    let id = canvas.add_item(Entity::with_rect(0.0, 0.0, 12.0, 40.0)).unwrap();

    canvas.begin_resize(id, ResizeHandle::BOTTOM_RIGHT).unwrap();
    canvas
        .update_resize(Vector::new(0.0, -30.0), Modifiers::SHIFT)
        .unwrap();
    let entity = canvas.items().get_entity(id).unwrap();
    assert!(entity.width() >= entity.min_width() - 1e-9);
    assert_close(entity.width(), 10.0);
    assert_close(entity.height(), 100.0 / 3.0);
}

#[test]
fn test_aspect_resize_uses_ratio_at_gesture_start() {
    let (mut canvas, _host) = canvas();
    let id = canvas.add_item(Entity::with_rect(0.0, 0.0, 40.0, 20.0)).unwrap();

    canvas.begin_resize(id, ResizeHandle::BOTTOM_RIGHT).unwrap();
    canvas
        .update_resize(Vector::new(20.0, 0.0), Modifiers::NONE)
        .unwrap();
    assert_eq!(canvas.items().get_entity(id).unwrap().width(), 60.0);

    // Shift snaps back to the 2:1 ratio the gesture started with.
    canvas
        .update_resize(Vector::new(0.0, 10.0), Modifiers::SHIFT)
        .unwrap();
    let entity = canvas.items().get_entity(id).unwrap();
    assert_close(entity.height(), 30.0);
    assert_close(entity.width(), 60.0);
}

#[test]
fn test_non_resizable_items_are_skipped() {
    let (mut canvas, _host) = canvas();
    let id = canvas
        .add_item(Entity::with_rect(0.0, 0.0, 40.0, 20.0).with_resizeable(false))
        .unwrap();
    canvas.begin_resize(id, ResizeHandle::BOTTOM).unwrap();
    canvas
        .update_resize(Vector::new(0.0, 10.0), Modifiers::NONE)
        .unwrap();
    assert_eq!(canvas.items().get_entity(id).unwrap().height(), 20.0);
}

#[test]
fn test_rotate_moves_connectors_and_applies_to_group() {
    let (mut canvas, _host) = canvas();
    let a = Entity::with_rect(0.0, 0.0, 100.0, 100.0);
    let b = Entity::with_rect(300.0, 0.0, 100.0, 100.0);
    let link = Connection::new(&a, ConnectorSide::Right, &b, ConnectorSide::Left);
    let (a_id, b_id, link_id) = (a.id(), b.id(), link.id());
    canvas.add_item(a).unwrap();
    canvas.add_item(b).unwrap();
    canvas.add_item(link).unwrap();
    canvas.select(a_id).unwrap();
    canvas.select(b_id).unwrap();

    canvas.begin_rotate(a_id, Point::new(100.0, 50.0)).unwrap();
    let delta = canvas
        .update_rotate(Point::new(50.0, 100.0), Modifiers::NONE)
        .unwrap();
    assert_close(delta, 90.0);

    // The right connector now sits at the bottom center.
    let source = canvas.items().get_connection(link_id).unwrap().source_position();
    assert_close(source.x, 50.0);
    assert_close(source.y, 100.0);

    canvas.complete_gesture(Modifiers::NONE).unwrap();
    assert_close(canvas.items().get_entity(b_id).unwrap().angle(), 90.0);
}

#[test]
fn test_rotate_snaps_with_shift_and_cancels() {
    let (mut canvas, _host) = canvas();
    let id = canvas.add_item(Entity::with_rect(0.0, 0.0, 100.0, 100.0)).unwrap();

    canvas.begin_rotate(id, Point::new(100.0, 50.0)).unwrap();
    let radians = 40.0_f64.to_radians();
    let pointer = Point::new(50.0 + 50.0 * radians.cos(), 50.0 + 50.0 * radians.sin());
    let delta = canvas.update_rotate(pointer, Modifiers::SHIFT).unwrap();
    assert_close(delta, 45.0);
    assert_close(canvas.items().get_entity(id).unwrap().angle(), 45.0);

    canvas.cancel_gesture().unwrap();
    assert_close(canvas.items().get_entity(id).unwrap().angle(), 0.0);
}

#[test]
fn test_gestures_require_entities_and_exclusivity() {
    let (mut canvas, _host) = canvas();
    let a = Entity::with_rect(0.0, 0.0, 10.0, 10.0);
    let b = Entity::with_rect(50.0, 0.0, 10.0, 10.0);
    let link = Connection::new(&a, ConnectorSide::Right, &b, ConnectorSide::Left);
    let (a_id, link_id) = (a.id(), link.id());
    canvas.add_item(a).unwrap();
    canvas.add_item(b).unwrap();
    canvas.add_item(link).unwrap();

    assert_eq!(
        canvas.begin_drag(link_id),
        Err(CanvasError::NotAnEntity { id: link_id })
    );
    assert_eq!(
        canvas.update_drag(Vector::new(1.0, 1.0)),
        Err(CanvasError::NoActiveGesture)
    );
    assert_eq!(
        canvas.complete_gesture(Modifiers::NONE),
        Err(CanvasError::NoActiveGesture)
    );

    canvas.begin_drag(a_id).unwrap();
    assert_eq!(
        canvas.begin_resize(a_id, ResizeHandle::TOP),
        Err(CanvasError::GestureInProgress)
    );
    assert_eq!(
        canvas.update_resize(Vector::new(1.0, 1.0), Modifiers::NONE),
        Err(CanvasError::NoActiveGesture)
    );
}

#[test]
fn test_marquee_replaces_selection_and_removes_overlay() {
    let (mut canvas, host) = canvas();
    let inside = canvas.add_item(Entity::with_rect(10.0, 10.0, 20.0, 20.0)).unwrap();
    let partial = canvas.add_item(Entity::with_rect(90.0, 90.0, 20.0, 20.0)).unwrap();
    let outside = canvas.add_item(Entity::with_rect(200.0, 200.0, 20.0, 20.0)).unwrap();
    show(&mut canvas, 400.0, 300.0);
    canvas.select(outside).unwrap();

    canvas
        .pointer_down_on_background(Point::new(0.0, 0.0), MouseButton::Left)
        .unwrap();
    assert_eq!(host.borrow().overlay_count(), 0);
    canvas.update_marquee(Point::new(100.0, 100.0), true).unwrap();
    assert_eq!(host.borrow().overlay_count(), 1);
    canvas.update_marquee(Point::new(100.0, 100.0), true).unwrap();
    assert_eq!(host.borrow().overlay_count(), 1);

    canvas.complete_gesture(Modifiers::NONE).unwrap();
    assert_eq!(host.borrow().overlay_count(), 0);
    let mut selected: Vec<_> = canvas.selection().iter().collect();
    selected.sort();
    let mut expected = vec![inside, partial];
    expected.sort();
    assert_eq!(selected, expected);
    assert_consistent(&canvas, &host);
}

#[test]
fn test_marquee_modes() {
    let (mut canvas, host) = canvas();
    let a = canvas.add_item(Entity::with_rect(10.0, 10.0, 20.0, 20.0)).unwrap();
    let b = canvas.add_item(Entity::with_rect(200.0, 10.0, 20.0, 20.0)).unwrap();
    show(&mut canvas, 400.0, 300.0);
    canvas.select(a).unwrap();
    canvas.select(b).unwrap();

    // Shift toggles the hits.
    canvas
        .pointer_down_on_background(Point::new(0.0, 0.0), MouseButton::Left)
        .unwrap();
    canvas.update_marquee(Point::new(50.0, 50.0), true).unwrap();
    canvas.complete_gesture(Modifiers::SHIFT).unwrap();
    assert!(!canvas.selection().contains(a));
    assert!(canvas.selection().contains(b));

    // Control adds them.
    canvas
        .pointer_down_on_background(Point::new(0.0, 0.0), MouseButton::Left)
        .unwrap();
    canvas.update_marquee(Point::new(50.0, 50.0), true).unwrap();
    canvas.complete_gesture(Modifiers::CONTROL).unwrap();
    assert_eq!(canvas.selection().len(), 2);

    // A click on the background clears.
    canvas
        .pointer_down_on_background(Point::new(5.0, 5.0), MouseButton::Left)
        .unwrap();
    canvas.complete_gesture(Modifiers::NONE).unwrap();
    assert!(canvas.selection().is_empty());
    assert_consistent(&canvas, &host);
}

fn marquee(canvas: &mut DesignerCanvas, from: Point, to: Point, modifiers: Modifiers) {
    canvas
        .pointer_down_on_background(from, MouseButton::Left)
        .unwrap();
    canvas.update_marquee(to, true).unwrap();
    canvas.complete_gesture(modifiers).unwrap();
}

#[test]
fn test_marquee_modes_on_eight_items() {
    let (mut canvas, host) = canvas();
    // Items at x = 0, 40, .., 280, each 20 wide.
    let ids = grid(&mut canvas, 8, 1);
    show(&mut canvas, 400.0, 300.0);
    let original = [ids[0], ids[1], ids[2]];
    let reselect = |canvas: &mut DesignerCanvas| {
        canvas.clear_selection().unwrap();
        for id in original {
            canvas.select(id).unwrap();
        }
    };
    let sorted = |canvas: &DesignerCanvas| {
        let mut selected: Vec<_> = canvas.selection().iter().collect();
        selected.sort();
        selected
    };

    // Plain: four unselected items replace the selection.
    reselect(&mut canvas);
    marquee(&mut canvas, Point::new(115.0, 5.0), Point::new(275.0, 15.0), Modifiers::NONE);
    assert_eq!(sorted(&canvas), ids[3..7].to_vec());

    // Shift over two selected and two new items toggles all four.
    reselect(&mut canvas);
    marquee(&mut canvas, Point::new(35.0, 5.0), Point::new(175.0, 15.0), Modifiers::SHIFT);
    assert_eq!(sorted(&canvas), vec![ids[0], ids[3], ids[4]]);

    // Control over the same four adds the two new ones.
    reselect(&mut canvas);
    marquee(&mut canvas, Point::new(35.0, 5.0), Point::new(175.0, 15.0), Modifiers::CONTROL);
    assert_eq!(canvas.selection().len(), 5);
    assert_eq!(sorted(&canvas), ids[0..5].to_vec());
    assert_consistent(&canvas, &host);
}

#[test]
fn test_marquee_uses_transform_captured_at_start() {
    let (mut canvas, host) = canvas();
    for i in 0..20 {
        canvas
            .add_item(Entity::with_rect(i as f64 * 100.0, 0.0, 20.0, 20.0))
            .unwrap();
    }
    show(&mut canvas, 400.0, 300.0);
    canvas.set_horizontal_offset(500.0);
    canvas.run_pending().unwrap();

    canvas
        .pointer_down_on_background(Point::new(0.0, 0.0), MouseButton::Left)
        .unwrap();
    canvas.update_marquee(Point::new(150.0, 50.0), true).unwrap();
    assert_eq!(
        canvas.marquee_rect().unwrap(),
        Rect::new(500.0, 0.0, 150.0, 50.0)
    );
    // Scrolling mid-gesture does not move the anchor.
    canvas.set_horizontal_offset(0.0);
    canvas.update_marquee(Point::new(150.0, 50.0), true).unwrap();
    assert_eq!(canvas.marquee_rect().unwrap().x, 500.0);

    assert!(canvas.cancel_gesture().unwrap());
    assert_eq!(host.borrow().overlay_count(), 0);
    assert!(canvas.selection().is_empty());
}
