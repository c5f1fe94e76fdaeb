//! Bounded hexagonal grid in axial coordinates

use crate::cell::NEIGHBOR_OFFSETS;
use crate::HexCell;
use glam::IVec2;
use std::collections::{HashMap, HashSet};

/// Read access to cells for rule evaluation
///
/// This trait lets the matcher query neighbor state without depending on
/// a specific grid implementation.
pub trait RuleContext {
    /// Get the cell at an axial position (`x` = q, `y` = r)
    ///
    /// Positions without a stored cell read as [`HexCell::EMPTY`].
    fn cell(&self, position: IVec2) -> HexCell;

    /// The six neighbors in direction order 1..=6
    fn neighbors(&self, position: IVec2) -> [HexCell; 6] {
        std::array::from_fn(|i| self.cell(position + NEIGHBOR_OFFSETS[i]))
    }
}

/// A hexagon of cells with `|q|, |r|, |q + r| <= radius`
///
/// Every in-bounds position holds an explicit cell. Cells are kept in a fixed
/// enumeration order (q, then r, ascending) so a full scan visits them
/// deterministically.
#[derive(Debug, Clone)]
pub struct HexGrid {
    radius: u32,

    /// In-bounds positions in scan order
    positions: Vec<IVec2>,

    /// Position -> slot in `cells`
    index: HashMap<IVec2, usize>,

    cells: Vec<HexCell>,
}

impl HexGrid {
    /// Create a grid of empty cells
    pub fn new(radius: u32) -> Self {
        let r = radius as i32;
        let positions: Vec<IVec2> = (-r..=r)
            .flat_map(|q| ((-r).max(-q - r)..=r.min(r - q)).map(move |s| IVec2::new(q, s)))
            .collect();
        let index = positions.iter().enumerate().map(|(i, p)| (*p, i)).collect();
        let cells = vec![HexCell::EMPTY; positions.len()];

        HexGrid {
            radius,
            positions,
            index,
            cells,
        }
    }

    /// Grid radius
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Number of in-bounds cells (`3r(r+1) + 1`)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A grid always holds at least the origin
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check if a position is within the radius
    pub fn contains(&self, position: IVec2) -> bool {
        let (q, r) = (position.x, position.y);
        q.unsigned_abs() <= self.radius
            && r.unsigned_abs() <= self.radius
            && (q + r).unsigned_abs() <= self.radius
    }

    /// Get the cell at a position; out-of-range positions read as empty
    pub fn get(&self, position: IVec2) -> HexCell {
        self.index
            .get(&position)
            .map_or(HexCell::EMPTY, |&i| self.cells[i])
    }

    /// Replace the cell at a position
    ///
    /// Returns `false` (and stores nothing) if the position is out of range.
    pub fn set(&mut self, position: IVec2, cell: HexCell) -> bool {
        match self.index.get(&position) {
            Some(&i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Reset every cell to empty
    pub fn clear(&mut self) {
        self.cells.fill(HexCell::EMPTY);
    }

    /// In-bounds positions in scan order
    pub fn positions(&self) -> &[IVec2] {
        &self.positions
    }

    /// Iterate over all cells in scan order
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, HexCell)> + '_ {
        self.positions.iter().copied().zip(self.cells.iter().copied())
    }

    /// Positions of all cells whose state is not empty
    pub fn active_cells(&self) -> HashSet<IVec2> {
        self.iter()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(position, _)| position)
            .collect()
    }

    /// Cells in scan order
    pub(crate) fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    /// Swap in a complete next generation (same scan order)
    pub(crate) fn replace_cells(&mut self, cells: Vec<HexCell>) {
        debug_assert_eq!(cells.len(), self.cells.len());
        self.cells = cells;
    }
}

impl RuleContext for HexGrid {
    fn cell(&self, position: IVec2) -> HexCell {
        self.get(position)
    }
}
