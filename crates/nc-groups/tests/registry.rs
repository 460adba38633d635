//! Tests against the bundled G-group table.

use nc_groups::{Effectiveness, GGroupRegistry, shared_registry};

#[test]
fn loads_embedded_table() {
    let registry = GGroupRegistry::embedded().expect("load embedded groups");
    assert!(!registry.is_empty());
    let numbers: Vec<u32> = registry.groups().iter().map(|g| g.nr).collect();
    let mut sorted = numbers.clone();
    sorted.sort_unstable();
    assert_eq!(numbers, sorted, "groups are ordered by number");
}

#[test]
fn motion_group_is_modal() {
    let registry = shared_registry().expect("load groups");
    let motion = registry.group_for_code("G01").expect("G01 is a motion code");
    assert_eq!(motion.short_name, "GG01_motion");
    assert!(registry.is_modal("GG01_motion").unwrap());
    assert_eq!(motion.entry("G1").map(|e| e.nr), Some(2));
}

#[test]
fn dwell_group_is_non_modal() {
    let registry = shared_registry().expect("load groups");
    let dwell = registry.group_for_code("G4").expect("G4 is a dwell code");
    assert_eq!(dwell.effectiveness, Effectiveness::NonModal);
    assert!(!registry.is_modal(&dwell.short_name).unwrap());
}

#[test]
fn is_modal_matches_effectiveness_for_every_group() {
    let registry = shared_registry().expect("load groups");
    for group in registry.groups() {
        assert_eq!(
            registry.is_modal(&group.short_name).unwrap(),
            group.effectiveness == Effectiveness::Modal,
            "group {}",
            group.short_name
        );
    }
}

#[test]
fn keyword_codes_resolve() {
    let registry = shared_registry().expect("load groups");
    assert_eq!(
        registry.group_for_code("cfc").map(|g| g.short_name.as_str()),
        Some("GG16_feed_override")
    );
    assert_eq!(
        registry.group_for_code("G90").map(|g| g.short_name.as_str()),
        Some("GG14_absolute_incremental")
    );
    assert!(registry.group_for_code("GOTOB").is_none());
    assert!(registry.group_for_code("X").is_none());
}

#[test]
fn groups_serialize_to_json() {
    let registry = shared_registry().expect("load groups");
    let plane = registry.group("GG06_plane").expect("plane group");
    let json = serde_json::to_value(plane).unwrap();
    assert_eq!(json["effectiveness"], "modal");
    assert_eq!(json["entries"][0]["id"], "G17");
}
