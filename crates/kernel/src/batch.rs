//! List-level helpers the orchestrator runs every frame.
//!
//! Anything that may remove entries walks the list from the last index down,
//! so removing the current element never shifts one that is still pending.

use std::ops::ControlFlow;

use crate::collider::Collider;
use crate::entity::Entity;
use crate::event::EventSink;
use crate::visual::VisualSink;

/// Update every entity and evict the ones that report death.
///
/// `on_remove` sees each evicted entity with its index before removal.
/// Survivors keep their relative order.
pub fn update_list<S, F>(list: &mut Vec<Entity>, dt_ms: f32, sink: &mut S, mut on_remove: F)
where
    S: EventSink,
    F: FnMut(&Entity, usize),
{
    for i in (0..list.len()).rev() {
        if !list[i].update(dt_ms, sink) {
            on_remove(&list[i], i);
            let gone = list.remove(i);
            tracing::trace!(id = %gone.id(), kind = %gone.kind(), index = i, "evicted");
        }
    }
}

/// Render in list order.
pub fn render_list(list: &[Entity], out: &mut impl VisualSink) {
    for entity in list {
        entity.render(out);
    }
}

/// Overlap test using live positions. False when either side has no collider.
pub fn test_hit(a: &Entity, b: &Entity) -> bool {
    match (a.collider(), b.collider()) {
        (Some(ca), Some(cb)) => Collider::hit(ca, a.position(), cb, b.position()),
        _ => false,
    }
}

/// Test `a` against every member of `list`, last index first.
///
/// Returns the number of hits found. `on_hit` receives `a` and the member it
/// overlaps; returning `Break` ends the scan immediately.
pub fn test_hit_list<F>(a: &mut Entity, list: &mut [Entity], mut on_hit: F) -> usize
where
    F: FnMut(&mut Entity, &mut Entity) -> ControlFlow<()>,
{
    let mut hits = 0;
    for i in (0..list.len()).rev() {
        if test_hit(a, &list[i]) {
            hits += 1;
            if on_hit(a, &mut list[i]).is_break() {
                return hits;
            }
        }
    }
    hits
}

/// Pairwise test of two lists, both walked last index first.
///
/// `Break` from `on_hit` only ends the inner scan for the current element of
/// `list_a`; the outer scan always visits every element, so each bullet gets
/// its own evaluation against the targets.
pub fn test_hit_lists<F>(list_a: &mut [Entity], list_b: &mut [Entity], mut on_hit: F) -> usize
where
    F: FnMut(&mut Entity, &mut Entity) -> ControlFlow<()>,
{
    let mut hits = 0;
    for i in (0..list_a.len()).rev() {
        for j in (0..list_b.len()).rev() {
            if test_hit(&list_a[i], &list_b[j]) {
                hits += 1;
                if on_hit(&mut list_a[i], &mut list_b[j]).is_break() {
                    break;
                }
            }
        }
    }
    hits
}
