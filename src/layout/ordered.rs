// SPDX-License-Identifier: MPL-2.0
//! Priority-ordered insertion and removal of overlay ids.
//!
//! A region list is kept sorted by [`SortKey`]: lower priority first, and on
//! equal priority the overlay created first comes first. Both helpers are
//! linear scans; region lists hold a handful of overlays.

use crate::domain::OverlayId;
use crate::surface::NodeHandle;

/// Ordering key of an overlay within its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey {
    pub priority: i32,
    pub created_at: u64,
}

impl SortKey {
    #[must_use]
    pub fn new(priority: i32, created_at: u64) -> Self {
        Self {
            priority,
            created_at,
        }
    }
}

/// Inserts `id` before the first element that sorts after `key`.
///
/// Elements whose key cannot be looked up are stepped over. Appends when no
/// element sorts after `key`.
pub fn insert<F>(id: OverlayId, key: SortKey, list: &mut Vec<OverlayId>, key_of: F)
where
    F: Fn(&OverlayId) -> Option<SortKey>,
{
    let index = list
        .iter()
        .position(|other| key_of(other).is_some_and(|other_key| other_key > key));
    match index {
        Some(index) => list.insert(index, id),
        None => list.push(id),
    }
}

/// Removes `id` from `list`, detaching `node` when the id was present.
///
/// Returns whether the id was found. An absent id leaves both untouched.
pub fn remove(id: &OverlayId, list: &mut Vec<OverlayId>, node: Option<&NodeHandle>) -> bool {
    let Some(index) = list.iter().position(|other| other == id) else {
        return false;
    };
    if let Some(node) = node {
        node.detach();
    }
    list.remove(index);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Region;
    use crate::surface::ContainerHandle;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn build(entries: &[(&str, i32, u64)]) -> (Vec<OverlayId>, HashMap<OverlayId, SortKey>) {
        let keys: HashMap<_, _> = entries
            .iter()
            .map(|&(id, priority, created_at)| {
                (OverlayId::from(id), SortKey::new(priority, created_at))
            })
            .collect();
        let mut list = Vec::new();
        for &(id, priority, created_at) in entries {
            insert(
                OverlayId::from(id),
                SortKey::new(priority, created_at),
                &mut list,
                |other| keys.get(other).copied(),
            );
        }
        (list, keys)
    }

    fn names(list: &[OverlayId]) -> Vec<&str> {
        list.iter().map(OverlayId::as_str).collect()
    }

    #[test]
    fn lower_priority_sorts_first() {
        let (list, _) = build(&[("low", 5, 1), ("high", 1, 2), ("mid", 3, 3)]);
        assert_eq!(names(&list), vec!["high", "mid", "low"]);
    }

    #[test]
    fn equal_priority_keeps_creation_order() {
        let (list, _) = build(&[("a", 1, 1), ("b", 1, 2), ("c", 1, 3)]);
        assert_eq!(names(&list), vec!["a", "b", "c"]);
    }

    #[test]
    fn equal_priority_created_earlier_goes_first_even_if_inserted_later() {
        let (list, _) = build(&[("late", 1, 9), ("early", 1, 2)]);
        assert_eq!(names(&list), vec!["early", "late"]);
    }

    #[test]
    fn unknown_elements_are_stepped_over() {
        let mut list = vec![OverlayId::from("ghost")];
        insert(OverlayId::from("a"), SortKey::new(0, 1), &mut list, |_| None);
        assert_eq!(names(&list), vec!["ghost", "a"]);
    }

    #[test]
    fn remove_detaches_node_of_present_id() {
        let container = ContainerHandle::new("root_TOP_LEFT", Region::TopLeft);
        let node = NodeHandle::new(OverlayId::from("a"));
        container.append(&node);
        let mut list = vec![OverlayId::from("a"), OverlayId::from("b")];

        assert!(remove(&OverlayId::from("a"), &mut list, Some(&node)));
        assert_eq!(names(&list), vec!["b"]);
        assert!(node.parent().is_none());
    }

    #[test]
    fn remove_missing_id_is_a_no_op() {
        let container = ContainerHandle::new("root_TOP_LEFT", Region::TopLeft);
        let node = NodeHandle::new(OverlayId::from("a"));
        container.append(&node);
        let mut list = vec![OverlayId::from("b")];

        assert!(!remove(&OverlayId::from("a"), &mut list, Some(&node)));
        assert_eq!(names(&list), vec!["b"]);
        assert!(container.contains(&node));
    }

    proptest! {
        #[test]
        fn insertion_keeps_region_sorted(priorities in prop::collection::vec(-3i32..3, 0..40)) {
            let entries: Vec<(String, i32, u64)> = priorities
                .iter()
                .enumerate()
                .map(|(n, &priority)| (format!("o{}", n), priority, n as u64 + 1))
                .collect();
            let borrowed: Vec<(&str, i32, u64)> = entries
                .iter()
                .map(|(id, priority, created_at)| (id.as_str(), *priority, *created_at))
                .collect();

            let (list, keys) = build(&borrowed);

            prop_assert_eq!(list.len(), entries.len());
            for pair in list.windows(2) {
                prop_assert!(keys[&pair[0]] < keys[&pair[1]]);
            }
        }

        #[test]
        fn insertion_order_does_not_change_result(priorities in prop::collection::vec(-3i32..3, 1..20)) {
            let forward: Vec<(String, i32, u64)> = priorities
                .iter()
                .enumerate()
                .map(|(n, &priority)| (format!("o{}", n), priority, n as u64 + 1))
                .collect();
            let mut backward = forward.clone();
            backward.reverse();

            let run = |entries: &[(String, i32, u64)]| {
                let borrowed: Vec<(&str, i32, u64)> = entries
                    .iter()
                    .map(|(id, priority, created_at)| (id.as_str(), *priority, *created_at))
                    .collect();
                build(&borrowed).0
            };

            prop_assert_eq!(run(&forward), run(&backward));
        }
    }
}
