//! Depth-bounded key occurrence counting
//!
//! Repeated key names are disambiguated by counting how many times the
//! name appears in the canonical tree at or above a nesting depth. The
//! count acts as a depth fingerprint: the extractor computes it from
//! raw-text indentation, the merge engine computes it from tree
//! recursion, and an annotation attaches where the two agree. The count
//! is global at-or-above-depth, not sibling-local, mirroring what a
//! line scanner can actually know about scope.

use crate::node::{Entry, Item, Mapping, Node};

/// Count entries anywhere in `tree` whose key equals `key`, restricted
/// to entries at depth <= `max_depth` (root entries are depth 0).
/// Sequence items add no depth of their own; the entries of a mapping
/// nested in a sequence sit one level below the sequence's key.
pub fn count_occurrences(tree: &Mapping, key: &str, max_depth: usize) -> usize {
    count_in_mapping(tree, key, 0, max_depth)
}

fn count_in_mapping(map: &Mapping, key: &str, depth: usize, max_depth: usize) -> usize {
    if depth > max_depth {
        return 0;
    }
    let mut count = 0;
    for entry in map.entries() {
        let Entry::Pair {
            key: entry_key,
            value,
        } = entry
        else {
            continue;
        };
        if entry_key == key {
            count += 1;
        }
        count += count_in_value(value, key, depth + 1, max_depth);
    }
    count
}

fn count_in_value(node: &Node, key: &str, depth: usize, max_depth: usize) -> usize {
    match node {
        Node::Mapping(map) => count_in_mapping(map, key, depth, max_depth),
        Node::Sequence(seq) => seq
            .items()
            .iter()
            .map(|item| match item {
                Item::Node(n) => count_in_value(n, key, depth, max_depth),
                _ => 0,
            })
            .sum(),
        Node::Scalar(_) => 0,
    }
}
