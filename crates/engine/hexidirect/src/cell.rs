//! Cell values: a state symbol plus an optional facing direction

use crate::{Error, Result};
use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The empty state symbol
pub const EMPTY: char = '_';

/// Symbols offered by the editing front ends, in palette order
pub const SYMBOLIC_STATES: [char; 8] = ['_', 'a', 'b', 'c', 'x', 't', 'y', 'z'];

/// Axial offsets of the six neighbors, indexed by `direction - 1`
///
/// Directions run clockwise starting at the upper right:
///
/// ```text
///   2   1
///  3  C  6
///   4   5
/// ```
pub const NEIGHBOR_OFFSETS: [IVec2; 6] = [
    IVec2::new(1, 0),
    IVec2::new(1, -1),
    IVec2::new(0, -1),
    IVec2::new(-1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, 1),
];

/// Check whether a character is a valid state symbol (`_` or `a`-`z`)
pub fn is_symbol(c: char) -> bool {
    c == EMPTY || c.is_ascii_lowercase()
}

/// A facing direction in 1..=6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Direction(u8);

impl Direction {
    /// All six directions in neighbor order
    pub const ALL: [Direction; 6] = [
        Direction(1),
        Direction(2),
        Direction(3),
        Direction(4),
        Direction(5),
        Direction(6),
    ];

    /// Create a direction, returning `None` outside 1..=6
    pub fn new(value: u8) -> Option<Self> {
        (1..=6).contains(&value).then_some(Direction(value))
    }

    /// Parse a single digit character
    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).and_then(|d| Self::new(d as u8))
    }

    /// Numeric value (1..=6)
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based neighbor slot index
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// Rotate clockwise by `amount` steps: `((d + n - 1) mod 6) + 1`
    pub fn rotate(self, amount: u8) -> Self {
        Direction((self.0 + amount % 6 - 1) % 6 + 1)
    }

    /// The direction pointing the opposite way
    pub fn opposite(self) -> Self {
        self.rotate(3)
    }

    /// Axial offset of the neighbor in this direction
    pub fn offset(self) -> IVec2 {
        NEIGHBOR_OFFSETS[self.index()]
    }
}

impl TryFrom<u8> for Direction {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Direction::new(value).ok_or(Error::InvalidDirection(value))
    }
}

impl From<Direction> for u8 {
    fn from(d: Direction) -> u8 {
        d.0
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single grid cell
///
/// Cells are plain values: two cells are equal iff state and direction match.
/// Mutating the grid replaces a cell wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCell {
    state: char,
    direction: Option<Direction>,
}

impl HexCell {
    /// The empty, directionless cell
    pub const EMPTY: HexCell = HexCell {
        state: EMPTY,
        direction: None,
    };

    /// Create a cell
    pub fn new(state: char, direction: Option<Direction>) -> Self {
        HexCell { state, direction }
    }

    /// Create a directionless cell
    pub fn plain(state: char) -> Self {
        HexCell::new(state, None)
    }

    /// Create a cell facing `direction`
    pub fn facing(state: char, direction: Direction) -> Self {
        HexCell::new(state, Some(direction))
    }

    /// State symbol
    pub fn state(&self) -> char {
        self.state
    }

    /// Facing direction, if any
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Whether the state is the empty symbol
    pub fn is_empty(&self) -> bool {
        self.state == EMPTY
    }
}

impl Default for HexCell {
    fn default() -> Self {
        HexCell::EMPTY
    }
}

impl fmt::Display for HexCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Some(d) => write!(f, "{}{}", self.state, d),
            None => write!(f, "{}", self.state),
        }
    }
}

impl FromStr for HexCell {
    type Err = Error;

    /// Parse cell text such as `"_"`, `"a"` or `"t4"`
    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        let state = chars
            .next()
            .filter(|c| is_symbol(*c))
            .ok_or_else(|| Error::InvalidCell(s.to_string()))?;
        let direction = match (chars.next(), chars.next()) {
            (None, _) => None,
            (Some(c), None) => {
                Some(Direction::from_char(c).ok_or_else(|| Error::InvalidCell(s.to_string()))?)
            }
            _ => return Err(Error::InvalidCell(s.to_string())),
        };
        Ok(HexCell::new(state, direction))
    }
}
