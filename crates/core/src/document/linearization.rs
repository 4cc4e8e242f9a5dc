//! Linearized ("fast web view") layout handling.
//!
//! A linearized file stores a small first-page xref at the front with
//! `startxref 0`, while the table describing the rest of the first version
//! sits near the end. Both belong to version 1, so after parsing the front
//! table is folded into the main one and the versions are renumbered.

use super::revision::PDFRevision;
use rustc_hash::FxHashSet;

/// Reorder and relabel revisions when the first one is a linearized header.
///
/// Slot 0 ends up holding the main table as version 1, augmented with the
/// header table's ids it does not already list. Slot 1 keeps the header
/// table as a version 0 linear placeholder so its entries and trailer stay
/// reachable for lookups. Later versions shift down by one.
///
/// Returns whether anything changed.
pub fn resolve_linearized(revisions: &mut [PDFRevision]) -> bool {
    let [first, second, ..] = revisions else {
        return false;
    };
    if !first.is_valid() || !first.is_linear || !second.is_valid() {
        return false;
    }

    revisions.swap(0, 1);
    let (head, tail) = revisions.split_at_mut(1);
    let main = &mut head[0];
    let linear = &mut tail[0];

    let known: FxHashSet<u32> = main.entries.iter().map(|e| e.obj_id).collect();
    let merged = linear
        .entries
        .iter()
        .filter(|e| !known.contains(&e.obj_id))
        .copied()
        .collect::<Vec<_>>();
    let merged_count = merged.len();
    main.entries.extend(merged);
    main.version = 1;
    linear.version = 0;
    linear.is_linear = true;
    linear.is_linear_half = true;

    for later in &mut tail[1..] {
        later.version = later.version.saturating_sub(1);
    }

    tracing::debug!(
        merged = merged_count,
        main_start = main.start,
        "folded linearized header table into version 1"
    );
    true
}
