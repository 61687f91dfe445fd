use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use diagramkit_core::{CanvasEvent, EventCategory, EventFilter, Rect, Vector, ViewportEvent};
use diagramkit_designer::{DesignerCanvas, Entity, ObjectKind, ScrollCommand};

use super::support::{assert_consistent, canvas, grid, show};

#[test]
fn test_initial_refresh_materializes_only_visible_items() {
    let (mut canvas, host) = canvas();
    grid(&mut canvas, 50, 50);
    assert_eq!(canvas.generator().bound_count(), 0);

    show(&mut canvas, 400.0, 300.0);

    // Columns 0..=10 touch x <= 400, rows 0..=7 touch y <= 300.
    assert_eq!(canvas.items().len(), 2500);
    assert_eq!(canvas.generator().bound_count(), 11 * 8);
    assert_eq!(canvas.viewport().extent(), Rect::new(0.0, 0.0, 1990.0, 1990.0));
    assert_consistent(&canvas, &host);
}

#[test]
fn test_scrolling_keeps_containers_in_sync() {
    let (mut canvas, host) = canvas();
    grid(&mut canvas, 50, 50);
    show(&mut canvas, 400.0, 300.0);

    let steps: Vec<Box<dyn Fn(&mut DesignerCanvas)>> = vec![
        Box::new(|c: &mut DesignerCanvas| {
            c.set_horizontal_offset(150.0);
        }),
        Box::new(|c: &mut DesignerCanvas| {
            c.scroll(ScrollCommand::LineDown);
        }),
        Box::new(|c: &mut DesignerCanvas| {
            c.scroll(ScrollCommand::PageRight);
        }),
        Box::new(|c: &mut DesignerCanvas| {
            c.scroll(ScrollCommand::WheelDown);
        }),
        Box::new(|c: &mut DesignerCanvas| {
            c.set_vertical_offset(1.0e6);
        }),
        Box::new(|c: &mut DesignerCanvas| {
            c.set_horizontal_offset(0.0);
        }),
        Box::new(|c: &mut DesignerCanvas| {
            c.scroll(ScrollCommand::PageUp);
        }),
        Box::new(|c: &mut DesignerCanvas| {
            c.make_visible(Rect::new(1200.0, 900.0, 20.0, 20.0));
        }),
    ];

    for step in steps {
        step(&mut canvas);
        canvas.run_pending().unwrap();
        assert_consistent(&canvas, &host);
    }
}

#[test]
fn test_scroll_refresh_is_coalesced() {
    let (mut canvas, _host) = canvas();
    grid(&mut canvas, 50, 50);
    show(&mut canvas, 400.0, 300.0);

    let refreshes = Rc::new(Cell::new(0));
    let counter = refreshes.clone();
    canvas
        .bus()
        .subscribe(EventFilter::Categories(vec![EventCategory::Viewport]), move |event| {
            if let CanvasEvent::Viewport(ViewportEvent::Refreshed { .. }) = event {
                counter.set(counter.get() + 1);
            }
        });

    assert!(canvas.scroll(ScrollCommand::LineDown));
    assert!(canvas.scroll(ScrollCommand::LineDown));
    assert!(canvas.scroll(ScrollCommand::LineRight));
    assert!(canvas.has_pending_tasks());

    assert_eq!(canvas.run_pending().unwrap(), 1);
    assert_eq!(refreshes.get(), 1);
    assert_eq!(canvas.run_pending().unwrap(), 0);
}

#[test]
fn test_zoom_out_shows_more_items() {
    let (mut canvas, host) = canvas();
    grid(&mut canvas, 50, 50);
    show(&mut canvas, 400.0, 300.0);
    let before = canvas.generator().bound_count();

    assert!(canvas.set_zoom(50.0));
    // Measure, then the refresh it schedules.
    assert_eq!(canvas.run_pending().unwrap(), 2);

    assert_eq!(canvas.viewport().viewport(), Rect::new(0.0, 0.0, 800.0, 600.0));
    assert!(canvas.generator().bound_count() > before);
    assert_consistent(&canvas, &host);

    assert!(canvas.zoom_in());
    canvas.run_pending().unwrap();
    assert_consistent(&canvas, &host);
}

#[test]
fn test_pool_is_bounded() {
    let (mut canvas, host) = canvas();
    grid(&mut canvas, 50, 50);
    canvas.set_max_pooled_containers(10);
    show(&mut canvas, 400.0, 300.0);

    canvas.set_horizontal_offset(1200.0);
    canvas.set_vertical_offset(1200.0);
    canvas.run_pending().unwrap();

    assert!(canvas.generator().pooled_count(ObjectKind::Entity) <= 10);
    assert_consistent(&canvas, &host);
}

#[test]
fn test_pooled_containers_are_reused_when_scrolling() {
    let (mut canvas, host) = canvas();
    let ids = grid(&mut canvas, 50, 50);
    show(&mut canvas, 400.0, 300.0);

    let before: HashSet<_> = canvas
        .generator()
        .bound_items()
        .filter_map(|item| canvas.generator().container_from_item(item))
        .collect();
    let first = ids[0];
    assert!(canvas.generator().container_from_item(first).is_some());

    assert!(canvas.scroll(ScrollCommand::PageDown));
    canvas.run_pending().unwrap();

    assert!(canvas.generator().container_from_item(first).is_none());
    let reused = canvas
        .generator()
        .bound_items()
        .filter(|item| !ids[..50 * 8].contains(item))
        .filter_map(|item| canvas.generator().container_from_item(item))
        .filter(|container| before.contains(container))
        .count();
    assert!(reused > 0);
    assert_consistent(&canvas, &host);
}

#[test]
fn test_items_follow_membership_and_geometry_changes() {
    let (mut canvas, host) = canvas();
    grid(&mut canvas, 5, 5);
    show(&mut canvas, 400.0, 300.0);

    // Added inside the rendered view: materialized immediately.
    let near = canvas.add_item(Entity::with_rect(210.0, 10.0, 20.0, 20.0)).unwrap();
    assert!(canvas.generator().container_from_item(near).is_some());

    // Added far away: no container.
    let far = canvas.add_item(Entity::with_rect(1500.0, 1500.0, 20.0, 20.0)).unwrap();
    assert!(canvas.generator().container_from_item(far).is_none());
    canvas.run_pending().unwrap();
    assert_consistent(&canvas, &host);

    // Moving an item out of view recycles its container.
    canvas
        .modify_entity(near, |e| e.translate(Vector::new(2000.0, 0.0)))
        .unwrap();
    assert!(canvas.generator().container_from_item(near).is_none());

    // Scrolling to it brings it back.
    assert!(canvas.make_item_visible(far).unwrap());
    canvas.run_pending().unwrap();
    assert!(canvas.generator().container_from_item(far).is_some());
    assert_consistent(&canvas, &host);

    canvas.remove_item(far).unwrap();
    canvas.run_pending().unwrap();
    assert!(canvas.generator().container_from_item(far).is_none());
    assert_consistent(&canvas, &host);

    canvas.clear_items().unwrap();
    canvas.run_pending().unwrap();
    assert_eq!(host.borrow().child_count(), 0);
    assert_eq!(canvas.generator().bound_count(), 0);
}

#[test]
fn test_resizing_the_host_refreshes() {
    let (mut canvas, host) = canvas();
    grid(&mut canvas, 20, 20);
    show(&mut canvas, 200.0, 200.0);
    let small = canvas.generator().bound_count();

    show(&mut canvas, 600.0, 500.0);
    assert!(canvas.generator().bound_count() > small);
    assert_consistent(&canvas, &host);

    show(&mut canvas, 0.0, 0.0);
    assert_eq!(canvas.generator().bound_count(), 0);
    assert_consistent(&canvas, &host);
}
