// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later

use smalltable_core::{Delta, EntityId, Reference, Revision};
use std::collections::BTreeMap;

fn revision(bindings: &[(&str, u64)], entities: &[(u64, u64)]) -> Revision {
    Revision::from_parts(
        bindings.iter().map(|(name, r)| (name.to_string(), Reference(*r))).collect(),
        entities.iter().map(|(r, id)| (Reference(*r), EntityId(*id))).collect(),
    )
}

#[test]
fn empty_diff() {
    let revisions = [
        Revision::new(),
        revision(&[("root", 1)], &[(1, 10)]),
        revision(&[("a", 1), ("b", 2)], &[(1, 10), (2, 20), (3, 30)]),
    ];
    for r in &revisions {
        let delta = r.diff(r);
        assert!(delta.is_empty());
        assert_eq!(&r.apply(&delta), r);
    }
}

#[test]
fn diff_records_only_differing_keys() {
    let a = revision(&[("kept", 1), ("changed", 2), ("dropped", 3)], &[(1, 10), (2, 20)]);
    let b = revision(&[("kept", 1), ("changed", 4), ("added", 5)], &[(1, 10), (2, 21)]);

    let delta = a.diff(&b);
    let bindings: BTreeMap<_, _> = delta.bindings().clone();
    assert_eq!(
        bindings,
        [
            ("added".to_string(), Some(Reference(5))),
            ("changed".to_string(), Some(Reference(4))),
            ("dropped".to_string(), None),
        ]
        .into_iter()
        .collect()
    );
    assert_eq!(
        delta.entities().clone(),
        [(Reference(2), Some(EntityId(21)))].into_iter().collect::<BTreeMap<_, _>>()
    );
}

#[test]
fn diff_apply_round_trip() {
    let cases = [
        (Revision::new(), Revision::new()),
        (Revision::new(), revision(&[("root", 1)], &[(1, 10)])),
        (revision(&[("root", 1)], &[(1, 10)]), Revision::new()),
        (
            revision(&[("a", 1), ("b", 2)], &[(1, 10), (2, 20)]),
            revision(&[("a", 3), ("c", 4)], &[(1, 11), (3, 30), (4, 40)]),
        ),
    ];
    for (a, b) in &cases {
        assert_eq!(&a.apply(&a.diff(b)), b);
        assert_eq!(&b.apply(&b.diff(a)), a);
    }
}

#[test]
fn apply_tombstone_removes_key() {
    let r = revision(&[("root", 1)], &[(1, 10)]);
    let delta = Delta::from_parts(
        [("root".to_string(), None)].into_iter().collect(),
        [(Reference(1), None)].into_iter().collect(),
    );
    let next = r.apply(&delta);
    assert_eq!(next, Revision::new());
}

#[test]
fn apply_composition_of_disjoint_deltas() {
    let r = revision(&[("a", 1)], &[(1, 10)]);
    let d1 = Delta::from_parts(
        [("b".to_string(), Some(Reference(2)))].into_iter().collect(),
        [(Reference(2), Some(EntityId(20)))].into_iter().collect(),
    );
    let d2 = Delta::from_parts(
        [("a".to_string(), None)].into_iter().collect(),
        [(Reference(1), Some(EntityId(11)))].into_iter().collect(),
    );

    let merged = d1.merge(&d2).expect("deltas are disjoint");
    assert_eq!(r.apply(&merged), r.apply(&d1).apply(&d2));
    assert_eq!(r.apply(&merged), r.apply(&d2).apply(&d1));
}
