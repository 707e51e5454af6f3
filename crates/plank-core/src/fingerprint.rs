//! Structural fingerprint of an item snapshot.
//!
//! Triage metrics depend only on item ids, priorities and blocking links.
//! The fingerprint captures exactly those, so a board can skip recomputation
//! when titles, labels or assignees change.
//!
//! Items are visited in input order (ranking ties are broken by input order,
//! so reordering must invalidate). Link lists are sorted so that the same
//! set of links written in a different order yields the same fingerprint.
//! Every id is length-prefixed, so ids containing the separators cannot
//! collide with a different link structure.

use crate::model::item::WorkItem;

/// Build the deterministic fingerprint string for `items`.
///
/// Format: `len:id|ordinal|blocked_by,..|blocking,..` per item, joined by
/// `;`, with every id written as `len:id`.
#[must_use]
pub fn structural_fingerprint(items: &[WorkItem]) -> String {
    let mut out = String::with_capacity(items.len() * 16);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        push_id(&mut out, &item.id);
        out.push('|');
        out.push_str(&item.priority.ordinal().to_string());
        out.push('|');
        push_sorted(&mut out, item.blockers());
        out.push('|');
        push_sorted(&mut out, item.blocked_items());
    }
    out
}

fn push_id(out: &mut String, id: &str) {
    out.push_str(&id.len().to_string());
    out.push(':');
    out.push_str(id);
}

fn push_sorted(out: &mut String, ids: &[String]) {
    let mut sorted: Vec<&str> = ids.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    for (i, id) in sorted.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_id(out, id);
    }
}
