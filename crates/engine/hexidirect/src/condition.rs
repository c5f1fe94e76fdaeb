//! Neighbor conditions for rule matching

use crate::{Direction, HexCell};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One acceptable neighbor pattern
///
/// A rule's conditions are a list of AND-groups, each holding one or more
/// OR-options of this type. Written inside brackets as
/// `[-? slot? state (pointing | %)?]`, e.g. `[x]`, `[1x]`, `[-t4]`, `[2t5]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// State the neighbor must have
    pub state: char,

    /// Fixed neighbor slot to test (`None` = any free slot)
    pub slot: Option<Direction>,

    /// Direction the neighbor must face
    pub pointing: Option<Direction>,

    /// Satisfied by the absence of a match
    pub negated: bool,

    /// The neighbor must face some direction (written `x%`)
    pub random_direction: bool,
}

impl Condition {
    /// A condition matching `state` in any slot
    pub fn state(state: char) -> Self {
        Condition {
            state,
            slot: None,
            pointing: None,
            negated: false,
            random_direction: false,
        }
    }

    /// Restrict this condition to a fixed neighbor slot
    pub fn in_slot(mut self, slot: Direction) -> Self {
        self.slot = Some(slot);
        self
    }

    /// Require the neighbor to face `direction`
    pub fn pointing(mut self, direction: Direction) -> Self {
        self.pointing = Some(direction);
        self.random_direction = false;
        self
    }

    /// Require the neighbor to face any direction
    pub fn any_direction(mut self) -> Self {
        self.random_direction = true;
        self.pointing = None;
        self
    }

    /// Negate this condition
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Test a neighbor cell against the state and facing requirements
    ///
    /// Negation is not applied here; the matcher decides what a negated
    /// option means for slot bookkeeping.
    pub fn accepts(&self, neighbor: &HexCell) -> bool {
        if neighbor.state() != self.state {
            return false;
        }
        match self.pointing {
            Some(d) => neighbor.direction() == Some(d),
            None => !self.random_direction || neighbor.direction().is_some(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "-")?;
        }
        if let Some(slot) = self.slot {
            write!(f, "{slot}")?;
        }
        write!(f, "{}", self.state)?;
        if let Some(pointing) = self.pointing {
            write!(f, "{pointing}")?;
        } else if self.random_direction {
            write!(f, "%")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(n: u8) -> Direction {
        Direction::new(n).unwrap()
    }

    #[test]
    fn test_condition_builders() {
        let c = Condition::state('x').in_slot(dir(1)).negate();
        assert_eq!(c.slot, Some(dir(1)));
        assert!(c.negated);
        assert_eq!(c.to_string(), "-1x");

        let c = Condition::state('t').in_slot(dir(2)).pointing(dir(5));
        assert_eq!(c.to_string(), "2t5");

        assert_eq!(Condition::state('y').any_direction().to_string(), "y%");
    }

    #[test]
    fn test_condition_accepts() {
        let plain = Condition::state('x');
        assert!(plain.accepts(&HexCell::plain('x')));
        assert!(plain.accepts(&HexCell::facing('x', dir(3))));
        assert!(!plain.accepts(&HexCell::plain('y')));

        let pointing = Condition::state('t').pointing(dir(4));
        assert!(pointing.accepts(&HexCell::facing('t', dir(4))));
        assert!(!pointing.accepts(&HexCell::facing('t', dir(1))));
        assert!(!pointing.accepts(&HexCell::plain('t')));

        let any = Condition::state('t').any_direction();
        assert!(any.accepts(&HexCell::facing('t', dir(6))));
        assert!(!any.accepts(&HexCell::plain('t')));
    }

    #[test]
    fn test_condition_serialization() {
        let condition = Condition::state('x').in_slot(dir(2)).negate();

        let json = serde_json::to_string(&condition).unwrap();
        let deserialized: Condition = serde_json::from_str(&json).unwrap();

        assert_eq!(condition, deserialized);
    }
}
