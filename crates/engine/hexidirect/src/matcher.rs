//! Rule matching against a cell and its six neighbors
//!
//! A rule matches when three gates pass:
//!
//! 1. state: the cell's state equals the rule's source state
//! 2. direction: the cell's facing satisfies [`SourceDirection`](crate::SourceDirection)
//! 3. conditions: every AND-group can be satisfied by one of its options,
//!    with non-negated options binding distinct neighbor slots
//!
//! The condition gate is a recursive search over group index carrying a
//! bitset of consumed slots. Because the bitset is passed by value, returning
//! from a failed branch undoes its slot assignment.

use crate::{Condition, HexCell, Rule, RuleContext};
use glam::IVec2;

/// Bitset of consumed neighbor slots (bit `i` = direction `i + 1`)
type Slots = u8;

/// Check whether `rule` fires on `cell` at `position`
pub fn matches<C: RuleContext + ?Sized>(
    ctx: &C,
    position: IVec2,
    cell: &HexCell,
    rule: &Rule,
) -> bool {
    if cell.state() != rule.source_state() {
        return false;
    }
    if !rule.source_facing().accepts(cell.direction()) {
        return false;
    }
    if !rule.has_conditions() {
        return true;
    }
    conditions_hold(rule.conditions(), &ctx.neighbors(position))
}

/// Condition gate over an explicit neighbor ring (direction order 1..=6)
pub fn conditions_hold(groups: &[Vec<Condition>], neighbors: &[HexCell; 6]) -> bool {
    satisfy(groups, neighbors, 0)
}

fn satisfy(groups: &[Vec<Condition>], neighbors: &[HexCell; 6], used: Slots) -> bool {
    let Some((group, rest)) = groups.split_first() else {
        return true;
    };

    group.iter().any(|option| match (option.slot, option.negated) {
        // Absence in a fixed slot; never consumes it
        (Some(slot), true) => {
            !option.accepts(&neighbors[slot.index()]) && satisfy(rest, neighbors, used)
        }

        (Some(slot), false) => {
            let bit = 1 << slot.index();
            used & bit == 0
                && option.accepts(&neighbors[slot.index()])
                && satisfy(rest, neighbors, used | bit)
        }

        // No neighbor anywhere may match, consumed or not
        (None, true) => {
            neighbors.iter().all(|n| !option.accepts(n)) && satisfy(rest, neighbors, used)
        }

        (None, false) => (0..6).any(|i| {
            let bit = 1 << i;
            used & bit == 0
                && option.accepts(&neighbors[i])
                && satisfy(rest, neighbors, used | bit)
        }),
    })
}
