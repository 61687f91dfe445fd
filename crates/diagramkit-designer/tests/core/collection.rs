use diagramkit_core::{CanvasError, CollectionChange, CollectionEvent, Rect, Vector};
use diagramkit_designer::{
    Connection, ConnectorDirection, ConnectorSide, Entity, GraphicalObject, GraphicalObjectCollection, HitTestResult,
    ItemSelectionOptions,
};

fn ids_in(collection: &GraphicalObjectCollection, region: Rect, options: ItemSelectionOptions) -> usize {
    collection.objects_in_region(region, options).count()
}

#[test]
fn test_add_records_change_then_count() {
    let mut collection = GraphicalObjectCollection::new();
    let entity = Entity::with_rect(0.0, 0.0, 10.0, 10.0);
    let id = collection.add(entity.clone()).unwrap();

    assert_eq!(
        collection.drain_events(),
        vec![
            CollectionEvent::Changed(CollectionChange::Add(vec![id])),
            CollectionEvent::CountChanged(1),
        ]
    );
    assert_eq!(
        collection.add(entity),
        Err(CanvasError::DuplicateItem { id })
    );
    assert!(collection.drain_events().is_empty());
}

#[test]
fn test_connection_endpoints_must_exist() {
    let mut collection = GraphicalObjectCollection::new();
    let a = Entity::with_rect(0.0, 0.0, 10.0, 10.0);
    let b = Entity::with_rect(50.0, 0.0, 10.0, 10.0);
    let link = Connection::new(&a, ConnectorSide::Right, &b, ConnectorSide::Left);
    let (link_id, a_id) = (link.id(), a.id());

    assert_eq!(
        collection.add(link.clone()),
        Err(CanvasError::UnknownEndpoint {
            connection: link_id,
            entity: a_id
        })
    );
    collection.add(a).unwrap();
    collection.add(b).unwrap();
    collection.add(link).unwrap();
    assert_eq!(collection.len(), 3);
    assert_eq!(collection.connections_of(a_id), &[link_id]);
}

#[test]
fn test_add_range_is_atomic_and_chunked() {
    let mut collection = GraphicalObjectCollection::new();
    collection.set_notification_batch_size(4);

    let entities: Vec<Entity> = (0..10)
        .map(|i| Entity::with_rect(i as f64 * 20.0, 0.0, 10.0, 10.0))
        .collect();
    let ids = collection.add_range(entities).unwrap();
    assert_eq!(ids.len(), 10);

    let events = collection.drain_events();
    let chunk_sizes: Vec<usize> = events
        .iter()
        .filter_map(|event| match event {
            CollectionEvent::Changed(CollectionChange::Add(chunk)) => Some(chunk.len()),
            _ => None,
        })
        .collect();
    assert_eq!(chunk_sizes, vec![4, 4, 2]);
    assert_eq!(events.last(), Some(&CollectionEvent::CountChanged(10)));

    // One bad object rejects the whole batch.
    let stray_a = Entity::with_rect(0.0, 0.0, 1.0, 1.0);
    let stray_b = Entity::with_rect(0.0, 0.0, 1.0, 1.0);
    let dangling = Connection::new(&stray_a, ConnectorSide::Top, &stray_b, ConnectorSide::Top);
    let fresh = Entity::with_rect(500.0, 0.0, 10.0, 10.0);
    let fresh_id = fresh.id();
    let batch: Vec<GraphicalObject> = vec![fresh.into(), dangling.into()];
    assert!(matches!(
        collection.add_range(batch),
        Err(CanvasError::UnknownEndpoint { .. })
    ));
    assert!(!collection.contains(fresh_id));
    assert_eq!(collection.len(), 10);
    assert!(collection.drain_events().is_empty());
}

#[test]
fn test_remove_and_clear() {
    let mut collection = GraphicalObjectCollection::new();
    let a = Entity::with_rect(0.0, 0.0, 10.0, 10.0);
    let b = Entity::with_rect(50.0, 0.0, 10.0, 10.0);
    let link = Connection::new(&a, ConnectorSide::Right, &b, ConnectorSide::Left);
    let (a_id, link_id) = (a.id(), link.id());
    collection.add(a).unwrap();
    collection.add(b).unwrap();
    collection.add(link).unwrap();
    collection.drain_events();

    assert!(collection.remove(a_id).is_some());
    assert!(collection.remove(a_id).is_none());
    assert_eq!(collection.dangling_connections(), vec![link_id]);
    assert_eq!(
        collection.drain_events(),
        vec![
            CollectionEvent::Changed(CollectionChange::Remove(vec![a_id])),
            CollectionEvent::CountChanged(2),
        ]
    );

    collection.clear();
    assert!(collection.is_empty());
    assert_eq!(collection.bounds(), Rect::EMPTY);
    assert_eq!(
        collection.drain_events(),
        vec![
            CollectionEvent::Changed(CollectionChange::Reset),
            CollectionEvent::CountChanged(0),
        ]
    );
}

#[test]
fn test_modify_entity_reanchors_connections() {
    let mut collection = GraphicalObjectCollection::new();
    let a = Entity::with_rect(0.0, 0.0, 10.0, 10.0);
    let b = Entity::with_rect(50.0, 0.0, 10.0, 10.0);
    let link = Connection::new(&a, ConnectorSide::Right, &b, ConnectorSide::Left);
    let (a_id, b_id, link_id) = (a.id(), b.id(), link.id());
    collection.add(a).unwrap();
    collection.add(b).unwrap();
    collection.add(link).unwrap();
    collection.drain_events();

    collection
        .modify_entity(a_id, |e| e.translate(Vector::new(0.0, 20.0)))
        .unwrap();
    let connection = collection.get_connection(link_id).unwrap();
    assert_eq!(connection.source_position().y, 25.0);
    assert_eq!(connection.bounds(), Rect::new(10.0, 5.0, 40.0, 20.0));

    let events = collection.drain_events();
    assert!(events.contains(&CollectionEvent::BoundsChanged(a_id)));
    assert!(events.contains(&CollectionEvent::BoundsChanged(link_id)));
    assert!(!events.contains(&CollectionEvent::BoundsChanged(b_id)));

    // No geometry change, no notification.
    collection.modify_entity(a_id, |e| e.translate(Vector::default())).unwrap();
    assert!(collection.drain_events().is_empty());

    assert_eq!(
        collection.modify_entity(link_id, |_| ()),
        Err(CanvasError::NotAnEntity { id: link_id })
    );
}

#[test]
fn test_connector_direction_change_reroutes_connections() {
    let mut collection = GraphicalObjectCollection::new();
    let a = Entity::with_rect(0.0, 0.0, 10.0, 10.0);
    let b = Entity::with_rect(50.0, 40.0, 10.0, 10.0);
    let link = Connection::new(&a, ConnectorSide::Right, &b, ConnectorSide::Left);
    let (a_id, link_id) = (a.id(), link.id());
    collection.add(a).unwrap();
    collection.add(b).unwrap();
    collection.add(link).unwrap();
    let before = collection.get_connection(link_id).unwrap().route();
    collection.drain_events();

    collection
        .modify_entity(a_id, |e| {
            e.set_connector_direction(ConnectorSide::Right, ConnectorDirection::Vertical)
        })
        .unwrap();
    let events = collection.drain_events();
    assert!(events.contains(&CollectionEvent::BoundsChanged(a_id)));
    assert!(events.contains(&CollectionEvent::BoundsChanged(link_id)));
    assert_ne!(collection.get_connection(link_id).unwrap().route(), before);
}

#[test]
fn test_objects_in_region_options() {
    let mut collection = GraphicalObjectCollection::new();
    collection.add(Entity::with_rect(10.0, 10.0, 20.0, 20.0)).unwrap();
    collection.add(Entity::with_rect(90.0, 10.0, 20.0, 20.0)).unwrap();
    collection.add(Entity::with_rect(0.0, 200.0, 400.0, 400.0)).unwrap();
    let region = Rect::new(0.0, 0.0, 100.0, 100.0);

    assert_eq!(ids_in(&collection, region, ItemSelectionOptions::NONE), 1);
    assert_eq!(
        ids_in(&collection, region, ItemSelectionOptions::INCLUDE_PARTIAL_SELECTION),
        2
    );
    assert_eq!(
        ids_in(
            &collection,
            region,
            ItemSelectionOptions::INCLUDE_PARTIAL_SELECTION | ItemSelectionOptions::PERFORM_HIT_TEST
        ),
        2
    );

    // A small rect inside the big entity finds the entity that encloses it.
    let spot = Rect::new(100.0, 300.0, 2.0, 2.0);
    let enclosing: Vec<_> = collection
        .objects_in_region(spot, ItemSelectionOptions::PERFORM_HIT_TEST)
        .collect();
    assert_eq!(enclosing.len(), 1);
    assert_eq!(enclosing[0].hit_test(&spot), HitTestResult::Contains);

    // Degenerate regions match nothing.
    assert_eq!(
        ids_in(
            &collection,
            Rect::new(0.0, 0.0, 0.0, 100.0),
            ItemSelectionOptions::INCLUDE_PARTIAL_SELECTION
        ),
        0
    );
}

#[test]
fn test_bounds_is_union() {
    let mut collection = GraphicalObjectCollection::new();
    assert_eq!(collection.bounds(), Rect::EMPTY);
    collection.add(Entity::with_rect(-10.0, 5.0, 20.0, 20.0)).unwrap();
    collection.add(Entity::with_rect(100.0, 50.0, 20.0, 20.0)).unwrap();
    assert_eq!(collection.bounds(), Rect::new(-10.0, 5.0, 130.0, 65.0));
}

#[test]
fn test_rotated_entity_bounds() {
    let entity = Entity::with_rect(0.0, 0.0, 40.0, 20.0).with_angle(90.0);
    let bounds = entity.bounds();
    assert!((bounds.x - 10.0).abs() < 1e-9);
    assert!((bounds.y + 10.0).abs() < 1e-9);
    assert!((bounds.width - 20.0).abs() < 1e-9);
    assert!((bounds.height - 40.0).abs() < 1e-9);
}

#[test]
fn test_add_then_remove_all_leaves_empty() {
    let mut collection = GraphicalObjectCollection::new();
    let ids = collection
        .add_range((0..25).map(|i| Entity::with_rect(i as f64 * 5.0, 0.0, 4.0, 4.0)))
        .unwrap();
    assert_eq!(collection.len(), 25);

    for id in &ids {
        assert!(collection.remove(*id).is_some());
    }
    assert_eq!(collection.len(), 0);
    assert_eq!(collection.bounds(), Rect::EMPTY);
}
