// Drag-and-drop project reordering
//
// idle → dragging(source) → over(target)* → dropped | cancelled
//
// The new order is applied locally at drop time. Each persisted order gets a
// sequence number so that when a save fails, only the newest one rolls the
// list back; older failures are already superseded.

use crate::api::ProjectId;

/// Move `source` to `target`'s index (splice, not swap)
///
/// Unknown ids and `source == target` leave the order untouched.
pub fn move_item(order: &[ProjectId], source: &str, target: &str) -> Vec<ProjectId> {
    let mut result = order.to_vec();
    if source == target {
        return result;
    }
    let (Some(from), Some(to)) = (
        order.iter().position(|id| id == source),
        order.iter().position(|id| id == target),
    ) else {
        return result;
    };

    let item = result.remove(from);
    result.insert(to, item);
    result
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: ProjectId,
    },
    Over {
        source: ProjectId,
        target: ProjectId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing to persist (self-drop, no target, or not dragging)
    NoOp,
    Reordered(Vec<ProjectId>),
}

impl DragState {
    pub fn begin(&mut self, source: &str) {
        *self = Self::Dragging {
            source: source.to_string(),
        };
    }

    /// Hover over a project row while dragging
    pub fn hover(&mut self, target: &str) {
        let source = match self {
            Self::Idle => return,
            Self::Dragging { source } | Self::Over { source, .. } => source.clone(),
        };
        *self = Self::Over {
            source,
            target: target.to_string(),
        };
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Dragging { source } | Self::Over { source, .. } => Some(source),
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Over { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Finish the drag against the current `order`; always returns to idle
    pub fn drop_on(&mut self, order: &[ProjectId]) -> DropOutcome {
        let state = std::mem::take(self);
        match state {
            Self::Over { source, target } if source != target => {
                let reordered = move_item(order, &source, &target);
                if reordered.as_slice() == order {
                    DropOutcome::NoOp
                } else {
                    DropOutcome::Reordered(reordered)
                }
            }
            _ => DropOutcome::NoOp,
        }
    }
}

/// Tracks in-flight order saves for rollback
#[derive(Debug, Default)]
pub struct ReorderLedger {
    next_seq: u64,
    latest: Option<PendingSave>,
}

/// Newest save not yet answered
#[derive(Debug)]
struct PendingSave {
    seq: u64,
    /// Order before the save was applied
    previous: Vec<ProjectId>,
    /// Order that was sent
    sent: Vec<ProjectId>,
}

impl ReorderLedger {
    /// Record a save about to be sent; `previous` is the order it replaces
    pub fn begin(&mut self, previous: Vec<ProjectId>, sent: Vec<ProjectId>) -> u64 {
        self.next_seq += 1;
        self.latest = Some(PendingSave {
            seq: self.next_seq,
            previous,
            sent,
        });
        self.next_seq
    }

    pub fn succeeded(&mut self, seq: u64) {
        if self.latest.as_ref().is_some_and(|save| save.seq == seq) {
            self.latest = None;
        }
    }

    /// Returns the order to restore if `seq` is still the newest save
    pub fn failed(&mut self, seq: u64) -> Option<Vec<ProjectId>> {
        match self.latest.take() {
            Some(save) if save.seq == seq => Some(save.previous),
            other => {
                self.latest = other;
                None
            }
        }
    }

    pub fn in_flight(&self) -> bool {
        self.latest.is_some()
    }

    /// Order of the newest unanswered save; a list fetched meanwhile may
    /// predate it
    pub fn pending_order(&self) -> Option<&[ProjectId]> {
        self.latest.as_ref().map(|save| save.sent.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<ProjectId> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sorted(mut v: Vec<ProjectId>) -> Vec<ProjectId> {
        v.sort();
        v
    }

    #[test]
    fn drag_first_onto_third_splices() {
        let order = ids(&["A", "B", "C", "D"]);
        assert_eq!(move_item(&order, "A", "C"), ids(&["B", "C", "A", "D"]));
    }

    #[test]
    fn drag_upwards_shifts_items_down() {
        let order = ids(&["A", "B", "C", "D"]);
        assert_eq!(move_item(&order, "D", "B"), ids(&["A", "D", "B", "C"]));
    }

    #[test]
    fn self_drop_is_noop() {
        let order = ids(&["A", "B", "C"]);
        for id in ["A", "B", "C"] {
            assert_eq!(move_item(&order, id, id), order);
        }
    }

    #[test]
    fn every_move_is_a_permutation() {
        let order = ids(&["A", "B", "C", "D", "E"]);
        for source in &order {
            for target in &order {
                let moved = move_item(&order, source, target);
                assert_eq!(moved.len(), order.len());
                assert_eq!(sorted(moved), sorted(order.clone()));
            }
        }
    }

    #[test]
    fn unknown_ids_leave_order_alone() {
        let order = ids(&["A", "B"]);
        assert_eq!(move_item(&order, "Z", "A"), order);
        assert_eq!(move_item(&order, "A", "Z"), order);
    }

    #[test]
    fn drag_state_machine_drop() {
        let order = ids(&["A", "B", "C", "D"]);
        let mut drag = DragState::default();

        drag.begin("A");
        assert_eq!(drag.source(), Some("A"));
        drag.hover("B");
        drag.hover("C");
        assert_eq!(drag.target(), Some("C"));

        assert_eq!(
            drag.drop_on(&order),
            DropOutcome::Reordered(ids(&["B", "C", "A", "D"]))
        );
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn drop_on_self_or_without_target_is_noop() {
        let order = ids(&["A", "B"]);
        let mut drag = DragState::default();

        drag.begin("A");
        assert_eq!(drag.drop_on(&order), DropOutcome::NoOp);

        drag.begin("A");
        drag.hover("A");
        assert_eq!(drag.drop_on(&order), DropOutcome::NoOp);
        assert!(!drag.is_active());
    }

    #[test]
    fn hover_while_idle_is_ignored() {
        let mut drag = DragState::default();
        drag.hover("B");
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut drag = DragState::default();
        drag.begin("A");
        drag.hover("B");
        drag.cancel();
        assert_eq!(drag.drop_on(&ids(&["A", "B"])), DropOutcome::NoOp);
    }

    #[test]
    fn failed_latest_save_rolls_back() {
        let mut ledger = ReorderLedger::default();
        let seq = ledger.begin(ids(&["A", "B", "C"]), ids(&["B", "A", "C"]));

        assert_eq!(ledger.failed(seq), Some(ids(&["A", "B", "C"])));
        assert!(!ledger.in_flight());
        assert_eq!(ledger.pending_order(), None);
    }

    #[test]
    fn superseded_failure_does_not_roll_back() {
        let mut ledger = ReorderLedger::default();
        let first = ledger.begin(ids(&["A", "B", "C"]), ids(&["B", "A", "C"]));
        let second = ledger.begin(ids(&["B", "A", "C"]), ids(&["B", "C", "A"]));

        // The older save fails after the newer one was sent
        assert_eq!(ledger.failed(first), None);
        assert!(ledger.in_flight());
        assert_eq!(ledger.pending_order(), Some(ids(&["B", "C", "A"]).as_slice()));

        assert_eq!(ledger.failed(second), Some(ids(&["B", "A", "C"])));
    }

    #[test]
    fn success_clears_only_matching_save() {
        let mut ledger = ReorderLedger::default();
        let first = ledger.begin(ids(&["A", "B"]), ids(&["B", "A"]));
        let second = ledger.begin(ids(&["B", "A"]), ids(&["A", "B"]));

        ledger.succeeded(first);
        assert!(ledger.in_flight());
        ledger.succeeded(second);
        assert!(!ledger.in_flight());
    }
}
