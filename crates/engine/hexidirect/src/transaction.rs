//! Step transactions: the next generation, staged and committed at once

use crate::{HexCell, HexGrid};
use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A cell rewritten during a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxChange {
    /// Axial position of the cell
    pub position: IVec2,

    /// Cell before the step
    pub old_cell: HexCell,

    /// Cell after the step
    pub new_cell: HexCell,

    /// Text of the rule that produced the new cell
    pub rule: String,
}

/// One generation's worth of pending writes
///
/// The next generation is built in a separate buffer while every rule reads
/// the current grid. Committing swaps the buffer in, so no evaluation within
/// a step observes a partially updated grid.
#[derive(Debug, Default)]
pub struct StepTx {
    /// Next-generation cells in grid scan order
    next: Vec<HexCell>,

    /// Cells whose value differs after the step
    changes: Vec<TxChange>,

    /// Cells where at least one rule matched
    matched: usize,

    /// Whether the buffer has been swapped into a grid
    committed: bool,
}

impl StepTx {
    /// Start a step from the current contents of `grid`
    pub(crate) fn begin(grid: &HexGrid) -> Self {
        StepTx {
            next: grid.cells().to_vec(),
            ..StepTx::default()
        }
    }

    /// Stage the chosen result for the cell at scan index `index`
    pub(crate) fn stage(
        &mut self,
        index: usize,
        position: IVec2,
        old_cell: HexCell,
        new_cell: HexCell,
        rule: &str,
    ) {
        self.matched += 1;
        self.next[index] = new_cell;
        if old_cell != new_cell {
            self.changes.push(TxChange {
                position,
                old_cell,
                new_cell,
                rule: rule.to_string(),
            });
        }
    }

    /// Swap the staged generation into `grid`
    pub(crate) fn commit(&mut self, grid: &mut HexGrid) {
        grid.replace_cells(std::mem::take(&mut self.next));
        self.committed = true;
    }

    /// Check if the step changed no cell
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Cells changed by the step, in scan order
    pub fn changes(&self) -> &[TxChange] {
        &self.changes
    }

    /// Number of cells where some rule fired (changed or not)
    pub fn matched_count(&self) -> usize {
        self.matched
    }

    /// Check if the transaction has been committed
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Take ownership of changes and return them
    pub fn take_changes(self) -> Vec<TxChange> {
        self.changes
    }
}
