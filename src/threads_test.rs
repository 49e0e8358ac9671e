use super::*;

fn thread(id: ThreadId, x: f64, y: f64, resolved: bool, z_index: i64) -> RawThread {
    RawThread {
        id,
        metadata: serde_json::json!({"x": x, "y": y, "resolved": resolved, "zIndex": z_index}),
    }
}

fn ids(n: usize) -> Vec<ThreadId> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

// =============================================================
// well_formed
// =============================================================

#[test]
fn valid_metadata_parses() {
    let id = Uuid::new_v4();
    let parsed = well_formed(&thread(id, 10.0, 20.0, false, 3)).unwrap();
    assert_eq!(parsed.id, id);
    assert_eq!(parsed.position, Point::new(10.0, 20.0));
    assert!(!parsed.resolved);
    assert_eq!(parsed.z_index, 3);
}

#[test]
fn missing_field_excludes_thread() {
    let raw = RawThread { id: Uuid::new_v4(), metadata: serde_json::json!({"x": 1.0, "y": 2.0}) };
    assert!(well_formed(&raw).is_none());
}

#[test]
fn wrong_field_type_excludes_thread() {
    let raw = RawThread {
        id: Uuid::new_v4(),
        metadata: serde_json::json!({"x": 1.0, "y": 2.0, "resolved": "no", "zIndex": 0}),
    };
    assert!(well_formed(&raw).is_none());
}

#[test]
fn non_object_metadata_excludes_thread() {
    let raw = RawThread { id: Uuid::new_v4(), metadata: serde_json::json!(null) };
    assert!(well_formed(&raw).is_none());
}

#[test]
fn extra_metadata_fields_are_tolerated() {
    let raw = RawThread {
        id: Uuid::new_v4(),
        metadata: serde_json::json!({"x": 1.0, "y": 2.0, "resolved": false, "zIndex": 0, "color": "red"}),
    };
    assert!(well_formed(&raw).is_some());
}

// =============================================================
// overlay
// =============================================================

#[test]
fn overlay_projects_position_and_z() {
    let id = Uuid::new_v4();
    let out = overlay(&[thread(id, 40.0, 50.0, false, 7)]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, id);
    assert_eq!(out[0].translate, Point::new(40.0, 50.0));
    assert_eq!(out[0].z_index, 7);
}

#[test]
fn resolved_threads_never_rendered() {
    let ids = ids(2);
    let raw = vec![
        thread(ids[0], 0.0, 0.0, true, 100),
        thread(ids[1], 0.0, 0.0, false, 1),
    ];
    let out = overlay(&raw);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, ids[1]);
}

#[test]
fn malformed_threads_dropped_from_overlay() {
    let good = Uuid::new_v4();
    let raw = vec![
        RawThread { id: Uuid::new_v4(), metadata: serde_json::json!({"x": 1.0}) },
        thread(good, 0.0, 0.0, false, 1),
    ];
    let out = overlay(&raw);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, good);
}

// =============================================================
// max_z_index
// =============================================================

#[test]
fn max_over_all_well_formed_threads() {
    let ids = ids(3);
    let raw = vec![
        thread(ids[0], 0.0, 0.0, false, 3),
        thread(ids[1], 0.0, 0.0, true, 9),
        thread(ids[2], 0.0, 0.0, false, 5),
    ];
    assert_eq!(max_z_index(&raw), 9);
}

#[test]
fn max_of_empty_collection_is_zero() {
    assert_eq!(max_z_index(&[]), 0);
}

// =============================================================
// focus_update
// =============================================================

#[test]
fn focusing_non_max_thread_writes_max_plus_one() {
    let ids = ids(3);
    let raw = vec![
        thread(ids[0], 0.0, 0.0, false, 3),
        thread(ids[1], 0.0, 0.0, false, 5),
        thread(ids[2], 0.0, 0.0, false, 2),
    ];
    let update = focus_update(&raw, ids[2]).unwrap();
    assert_eq!(update.z_index, Some(6));
    assert_eq!(update.resolved, None);
}

#[test]
fn focusing_max_thread_is_a_no_op() {
    let ids = ids(2);
    let raw = vec![
        thread(ids[0], 0.0, 0.0, false, 3),
        thread(ids[1], 0.0, 0.0, false, 5),
    ];
    assert!(focus_update(&raw, ids[1]).is_none());
}

#[test]
fn focused_thread_becomes_unique_maximum() {
    let ids = ids(3);
    let mut raw = vec![
        thread(ids[0], 0.0, 0.0, false, 3),
        thread(ids[1], 0.0, 0.0, false, 5),
        thread(ids[2], 0.0, 0.0, false, 2),
    ];
    let update = focus_update(&raw, ids[2]).unwrap();
    let new_z = update.z_index.unwrap();
    raw[2] = thread(ids[2], 0.0, 0.0, false, new_z);

    let tops: Vec<ThreadId> = raw
        .iter()
        .filter_map(well_formed)
        .filter(|t| t.z_index == max_z_index(&raw))
        .map(|t| t.id)
        .collect();
    assert_eq!(tops, [ids[2]]);
}

#[test]
fn unknown_thread_yields_no_write() {
    let ids = ids(1);
    let raw = vec![thread(ids[0], 0.0, 0.0, false, 3)];
    assert!(focus_update(&raw, Uuid::new_v4()).is_none());
}

#[test]
fn malformed_thread_yields_no_write() {
    let id = Uuid::new_v4();
    let raw = vec![RawThread { id, metadata: serde_json::json!({"zIndex": "top"}) }];
    assert!(focus_update(&raw, id).is_none());
}

// =============================================================
// ThreadMetadataUpdate serde
// =============================================================

#[test]
fn update_serializes_camel_case_and_skips_unset() {
    let update = ThreadMetadataUpdate { z_index: Some(6), resolved: None };
    let json = serde_json::to_value(&update).unwrap();
    assert_eq!(json, serde_json::json!({"zIndex": 6}));
}

#[test]
fn resolved_only_update_serializes_alone() {
    let update = ThreadMetadataUpdate { z_index: None, resolved: Some(true) };
    let json = serde_json::to_value(&update).unwrap();
    assert_eq!(json, serde_json::json!({"resolved": true}));
}
