//! Rule definition

use crate::{Condition, Direction, Error, HexCell};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction requirement on the cell a rule rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceDirection {
    /// The cell must have no direction (`a`)
    #[default]
    None,
    /// The cell must face exactly this direction (`a3`)
    Fixed(Direction),
    /// The cell must face some direction (`a%`)
    Any,
}

impl SourceDirection {
    /// Direction gate: does a cell's facing satisfy this requirement?
    pub fn accepts(self, direction: Option<Direction>) -> bool {
        match self {
            SourceDirection::None => direction.is_none(),
            SourceDirection::Fixed(d) => direction == Some(d),
            SourceDirection::Any => direction.is_some(),
        }
    }
}

/// Facing of the cell a rule produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetDirection {
    /// Direction is cleared (`b`)
    #[default]
    Clear,
    /// Absolute direction (`b2` or `b.2`)
    Fixed(Direction),
    /// Rotate the source facing clockwise by 0..=5 steps (`b%`, `b%2`)
    Rotate(u8),
}

/// A single canonical transformation rule: `source[conditions] => target`
///
/// Rules are immutable once built. The text a rule was parsed from is kept
/// for diagnostics; equality compares meaning only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Text this rule was compiled from
    raw_text: String,

    /// State the cell must have
    source_state: char,

    /// Facing the cell must have
    source_direction: SourceDirection,

    /// State written on match
    target_state: char,

    /// Facing written on match
    target_direction: TargetDirection,

    /// AND-groups of OR-options over the six neighbors
    conditions: Vec<Vec<Condition>>,
}

impl Rule {
    /// Create an unconditional `source => target` rule between directionless states
    pub fn new(source_state: char, target_state: char) -> Self {
        Rule {
            raw_text: String::new(),
            source_state,
            source_direction: SourceDirection::None,
            target_state,
            target_direction: TargetDirection::Clear,
            conditions: Vec::new(),
        }
        .refresh_text()
    }

    pub(crate) fn from_parts(
        raw_text: &str,
        source_state: char,
        source_direction: SourceDirection,
        conditions: Vec<Vec<Condition>>,
        target_state: char,
        target_direction: TargetDirection,
    ) -> Self {
        Rule {
            raw_text: raw_text.to_string(),
            source_state,
            source_direction,
            target_state,
            target_direction,
            conditions,
        }
    }

    /// Set the source direction requirement (builder pattern)
    pub fn with_source_direction(mut self, direction: SourceDirection) -> Self {
        self.source_direction = direction;
        self.refresh_text()
    }

    /// Set the target facing (builder pattern)
    pub fn with_target_direction(mut self, direction: TargetDirection) -> Self {
        self.target_direction = match direction {
            TargetDirection::Rotate(n) => TargetDirection::Rotate(n % 6),
            other => other,
        };
        self.refresh_text()
    }

    /// Add an AND-group with a single option (builder pattern)
    pub fn when(self, condition: Condition) -> Self {
        self.when_any([condition])
    }

    /// Add an AND-group satisfied by any of `options` (builder pattern)
    pub fn when_any(mut self, options: impl IntoIterator<Item = Condition>) -> Self {
        let group: Vec<Condition> = options.into_iter().collect();
        if !group.is_empty() {
            self.conditions.push(group);
        }
        self.refresh_text()
    }

    fn refresh_text(mut self) -> Self {
        self.raw_text = self.to_string();
        self
    }

    /// The text this rule was compiled from
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Source state symbol
    pub fn source_state(&self) -> char {
        self.source_state
    }

    /// Source direction requirement
    pub fn source_facing(&self) -> SourceDirection {
        self.source_direction
    }

    /// Fixed source direction, if the rule requires one
    pub fn source_direction(&self) -> Option<Direction> {
        match self.source_direction {
            SourceDirection::Fixed(d) => Some(d),
            _ => None,
        }
    }

    /// Whether the source accepts any non-null direction
    pub fn source_random_direction(&self) -> bool {
        self.source_direction == SourceDirection::Any
    }

    /// Target state symbol
    pub fn target_state(&self) -> char {
        self.target_state
    }

    /// Target facing
    pub fn target_facing(&self) -> TargetDirection {
        self.target_direction
    }

    /// Fixed target direction, if any
    pub fn target_direction(&self) -> Option<Direction> {
        match self.target_direction {
            TargetDirection::Fixed(d) => Some(d),
            _ => None,
        }
    }

    /// Target rotation amount, if any
    pub fn target_rotation(&self) -> Option<u8> {
        match self.target_direction {
            TargetDirection::Rotate(n) => Some(n),
            _ => None,
        }
    }

    /// Condition groups (all must hold; any option within a group may)
    pub fn conditions(&self) -> &[Vec<Condition>] {
        &self.conditions
    }

    /// Check if this rule has any conditions
    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    /// The cell this rule writes when it fires on `cell`
    ///
    /// Rotating a directionless cell leaves it directionless.
    pub fn produce(&self, cell: &HexCell) -> HexCell {
        let direction = match self.target_direction {
            TargetDirection::Clear => None,
            TargetDirection::Fixed(d) => Some(d),
            TargetDirection::Rotate(n) => cell.direction().map(|d| d.rotate(n)),
        };
        HexCell::new(self.target_state, direction)
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.source_state == other.source_state
            && self.source_direction == other.source_direction
            && self.target_state == other.target_state
            && self.target_direction == other.target_direction
            && self.conditions == other.conditions
    }
}

impl Eq for Rule {}

impl fmt::Display for Rule {
    /// Canonical text; parsing it yields an equal rule
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source_state)?;
        match self.source_direction {
            SourceDirection::None => {}
            SourceDirection::Fixed(d) => write!(f, "{d}")?,
            SourceDirection::Any => write!(f, "%")?,
        }
        for group in &self.conditions {
            write!(f, "[")?;
            for (i, option) in group.iter().enumerate() {
                if i > 0 {
                    write!(f, "|")?;
                }
                write!(f, "{option}")?;
            }
            write!(f, "]")?;
        }
        write!(f, " => {}", self.target_state)?;
        match self.target_direction {
            TargetDirection::Clear => Ok(()),
            TargetDirection::Fixed(d) => write!(f, "{d}"),
            TargetDirection::Rotate(0) => write!(f, "%"),
            TargetDirection::Rotate(n) => write!(f, "%{n}"),
        }
    }
}

impl FromStr for Rule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse_rule(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(n: u8) -> Direction {
        Direction::new(n).unwrap()
    }

    #[test]
    fn test_rule_builder() {
        let rule = Rule::new('a', 'b')
            .with_source_direction(SourceDirection::Fixed(dir(3)))
            .when(Condition::state('x'))
            .when_any([Condition::state('a'), Condition::state('_')])
            .with_target_direction(TargetDirection::Rotate(8));

        assert_eq!(rule.source_direction(), Some(dir(3)));
        assert!(!rule.source_random_direction());
        assert_eq!(rule.target_rotation(), Some(2));
        assert_eq!(rule.target_direction(), None);
        assert_eq!(rule.conditions().len(), 2);
        assert_eq!(rule.raw_text(), "a3[x][a|_] => b%2");
    }

    #[test]
    fn test_direction_gate_branches() {
        let none = SourceDirection::None;
        let fixed = SourceDirection::Fixed(dir(2));
        let any = SourceDirection::Any;

        assert!(none.accepts(None));
        assert!(!none.accepts(Some(dir(2))));
        assert!(fixed.accepts(Some(dir(2))));
        assert!(!fixed.accepts(Some(dir(3))));
        assert!(!fixed.accepts(None));
        assert!(any.accepts(Some(dir(5))));
        assert!(!any.accepts(None));
    }

    #[test]
    fn test_produce() {
        let facing3 = HexCell::facing('a', dir(3));

        let clear = Rule::new('a', 'b');
        assert_eq!(clear.produce(&facing3), HexCell::plain('b'));

        let fixed = Rule::new('a', 'b').with_target_direction(TargetDirection::Fixed(dir(6)));
        assert_eq!(fixed.produce(&facing3), HexCell::facing('b', dir(6)));

        let rotate = Rule::new('a', 'b').with_target_direction(TargetDirection::Rotate(2));
        assert_eq!(rotate.produce(&facing3), HexCell::facing('b', dir(5)));
        assert_eq!(rotate.produce(&HexCell::plain('a')), HexCell::plain('b'));
    }

    #[test]
    fn test_rule_serialization() {
        let rule = Rule::new('_', 'a').when(Condition::state('t').in_slot(dir(1)).pointing(dir(4)));

        let json = serde_json::to_string(&rule).unwrap();
        let deserialized: Rule = serde_json::from_str(&json).unwrap();

        assert_eq!(rule, deserialized);
        assert_eq!(deserialized.raw_text(), "_[1t4] => a");
    }
}
