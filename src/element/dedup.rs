use std::collections::HashSet;

use crate::element::element_model::ElementDescriptor;
use crate::element::fingerprint::Fingerprint;

/// Container class whose structural descendants are always redundant
/// repetitions of the container itself.
pub const VARIANT_LIST_CONTAINER: &str = "variant-tabs__variant-list__item";

/// Collapse near-duplicate descriptors without discarding genuinely
/// distinct interactive elements.
///
/// Two passes:
/// 1. Structural pass: sorted by ascending xpath length (shorter path =
///    potential ancestor), a descendant exactly one level below an ancestor
///    sharing the same text or the same class string is dropped as a nested
///    wrapper duplicate. Descendants of a `VARIANT_LIST_CONTAINER` are
///    dropped at any depth.
/// 2. Fingerprint pass: remaining descriptors with an identical fingerprint
///    collapse to the first-seen representative, input order preserved.
///
/// The output is always a subset of the input.
pub fn deduplicate(elements: Vec<ElementDescriptor>) -> Vec<ElementDescriptor> {
    let mut discarded: HashSet<usize> = HashSet::new();

    let mut order: Vec<usize> = (0..elements.len()).collect();
    order.sort_by_key(|&i| elements[i].xpath.len());

    for a in 0..order.len() {
        for b in (a + 1)..order.len() {
            let parent_idx = order[a];
            let child_idx = order[b];
            if discarded.contains(&parent_idx) || discarded.contains(&child_idx) {
                continue;
            }
            let parent = &elements[parent_idx];
            let child = &elements[child_idx];
            if parent.xpath.is_empty() || child.xpath.is_empty() {
                continue;
            }
            if !is_strict_descendant(&parent.xpath, &child.xpath) {
                continue;
            }

            if parent.class_names.contains(VARIANT_LIST_CONTAINER) {
                discarded.insert(child_idx);
                continue;
            }

            let one_level_deeper =
                child.xpath.matches('/').count() == parent.xpath.matches('/').count() + 1;
            if one_level_deeper {
                let same_text = !parent.text.is_empty() && parent.text == child.text;
                let same_class =
                    !parent.class_names.is_empty() && parent.class_names == child.class_names;
                if same_text || same_class {
                    discarded.insert(child_idx);
                }
            }
        }
    }

    let mut seen: HashSet<Fingerprint> = HashSet::new();
    elements
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !discarded.contains(i))
        .map(|(_, e)| e)
        .filter(|e| seen.insert(e.fingerprint.clone()))
        .collect()
}

/// True when `child` is a strict xpath descendant of `parent`
/// (prefix match on a path-segment boundary).
fn is_strict_descendant(parent: &str, child: &str) -> bool {
    child != parent && child.starts_with(parent) && child[parent.len()..].starts_with('/')
}
