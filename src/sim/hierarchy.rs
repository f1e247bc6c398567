//! Parent/child resolution order
//!
//! A block is a *parent* when any block active this frame names its id;
//! everything else is *simple*. Parents resolve first, in waves: roots,
//! then blocks whose parent already resolved, until the set is done. A
//! wave that makes no progress (dangling ids, reference cycles) resolves
//! the stragglers as roots so a frame can never hang. Simple blocks then
//! look their parent up among the resolved parents, falling back to root
//! behavior when the id matches nothing.

use std::collections::{HashMap, HashSet};

/// One evaluation step: which arena slot to resolve and, for child-style
/// evaluation, the already-resolved slot of its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveStep {
    pub slot: usize,
    pub parent_slot: Option<usize>,
}

/// Complete evaluation order for one frame's active set.
#[derive(Debug, Clone, Default)]
pub struct ResolvePlan {
    /// Every active slot exactly once, parents before their children.
    pub steps: Vec<ResolveStep>,
    /// Passes over the parent set it took to order it.
    pub waves: u32,
    /// Parent references that matched no resolved block this frame.
    pub missing_parents: u32,
}

/// Split an active set into parents and simple blocks.
///
/// Returns indices into the input slices, parents first (input order kept
/// within each group), plus the parent count.
pub fn classify(ids: &[u32], parent_ids: &[u32]) -> (Vec<usize>, usize) {
    let referenced: HashSet<u32> = parent_ids.iter().copied().filter(|&p| p != 0).collect();
    let mut order = Vec::with_capacity(ids.len());
    order.extend((0..ids.len()).filter(|&i| referenced.contains(&ids[i])));
    let parent_count = order.len();
    order.extend((0..ids.len()).filter(|&i| !referenced.contains(&ids[i])));
    (order, parent_count)
}

/// Build the evaluation order for arena arrays where slots
/// `0..parent_count` hold the parent set (see [`classify`]).
pub fn resolve_order(ids: &[u32], parent_ids: &[u32], parent_count: usize) -> ResolvePlan {
    let mut plan = ResolvePlan {
        steps: Vec::with_capacity(ids.len()),
        waves: 0,
        missing_parents: 0,
    };
    // id -> arena slot, filled as parent blocks resolve
    let mut slot_of: HashMap<u32, usize> = HashMap::with_capacity(parent_count);
    let mut resolved = vec![false; parent_count];
    let mut remaining = parent_count;

    if parent_count > 0 {
        plan.waves = 1;
    }
    for slot in 0..parent_count {
        if parent_ids[slot] == 0 {
            plan.steps.push(ResolveStep {
                slot,
                parent_slot: None,
            });
            slot_of.insert(ids[slot], slot);
            resolved[slot] = true;
            remaining -= 1;
        }
    }

    while remaining > 0 {
        plan.waves += 1;
        let mut progressed = false;
        for slot in 0..parent_count {
            if resolved[slot] {
                continue;
            }
            if let Some(&parent_slot) = slot_of.get(&parent_ids[slot]) {
                plan.steps.push(ResolveStep {
                    slot,
                    parent_slot: Some(parent_slot),
                });
                slot_of.insert(ids[slot], slot);
                resolved[slot] = true;
                remaining -= 1;
                progressed = true;
            }
        }
        if !progressed {
            for slot in 0..parent_count {
                if !resolved[slot] {
                    plan.steps.push(ResolveStep {
                        slot,
                        parent_slot: None,
                    });
                    slot_of.insert(ids[slot], slot);
                    resolved[slot] = true;
                    remaining -= 1;
                    plan.missing_parents += 1;
                }
            }
        }
    }

    for slot in parent_count..ids.len() {
        let parent_slot = slot_of.get(&parent_ids[slot]).copied();
        if parent_slot.is_none() && parent_ids[slot] != 0 {
            plan.missing_parents += 1;
        }
        plan.steps.push(ResolveStep { slot, parent_slot });
    }
    plan
}
