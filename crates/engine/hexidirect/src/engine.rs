//! The automaton: a grid, its compiled rules and a random source

use crate::expand::expand_rule;
use crate::{matcher, Direction, Error, HexCell, HexGrid, Rule, StepTx};
use glam::IVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::{debug, warn};

/// A rule entry dropped while installing a rule set
#[derive(Debug)]
pub struct SkippedRule {
    /// Authored or expanded text that failed
    pub text: String,

    /// Why it was dropped
    pub error: Error,
}

/// Outcome of [`HexAutomaton::set_rules`]
#[derive(Debug, Default)]
pub struct RuleSetReport {
    /// Number of authored entries given
    pub authored: usize,

    /// Number of canonical rules installed
    pub installed: usize,

    /// Entries that failed expansion or parsing
    pub skipped: Vec<SkippedRule>,
}

impl RuleSetReport {
    /// Check if every entry compiled
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Expand and parse authored rules, keeping whatever compiles
///
/// A failing entry never aborts the batch: an authored string that cannot be
/// expanded is skipped whole, and each expanded string that cannot be parsed
/// is skipped on its own.
pub fn compile_rules<I, S>(authored: I) -> (Vec<Rule>, Vec<SkippedRule>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut rules = Vec::new();
    let mut skipped = Vec::new();

    for entry in authored {
        let entry = entry.as_ref();
        let expanded = match expand_rule(entry) {
            Ok(expanded) => expanded,
            Err(error) => {
                warn!("Skipping invalid rule '{}': {}", entry, error);
                skipped.push(SkippedRule {
                    text: entry.to_string(),
                    error,
                });
                continue;
            }
        };

        for text in expanded {
            match text.parse::<Rule>() {
                Ok(rule) => rules.push(rule),
                Err(error) => {
                    warn!("Skipping invalid expanded rule '{}': {}", text, error);
                    skipped.push(SkippedRule { text, error });
                }
            }
        }
    }

    (rules, skipped)
}

/// A symbolic hexagonal automaton driven by HexiDirect rules
///
/// Each step evaluates every rule against every cell of the current
/// generation. When several rules match a cell one is picked uniformly at
/// random; the whole next generation is then swapped in at once.
#[derive(Debug, Clone)]
pub struct HexAutomaton {
    grid: HexGrid,
    rules: Vec<Rule>,
    rng: StdRng,
}

impl HexAutomaton {
    /// Create an empty automaton seeded from OS entropy
    pub fn new(radius: u32) -> Self {
        HexAutomaton::with_rng(radius, StdRng::from_os_rng())
    }

    /// Create an empty automaton with a reproducible random source
    pub fn with_seed(radius: u32, seed: u64) -> Self {
        HexAutomaton::with_rng(radius, StdRng::seed_from_u64(seed))
    }

    /// Create an empty automaton using `rng` for tie-breaking
    pub fn with_rng(radius: u32, rng: StdRng) -> Self {
        HexAutomaton {
            grid: HexGrid::new(radius),
            rules: Vec::new(),
            rng,
        }
    }

    /// Reseed the internal random source
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Grid radius
    pub fn radius(&self) -> u32 {
        self.grid.radius()
    }

    /// The current generation
    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    /// Installed canonical rules, in expansion order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of installed canonical rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Replace the rule set with the compiled form of `authored`
    pub fn set_rules<I, S>(&mut self, authored: I) -> RuleSetReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let authored: Vec<S> = authored.into_iter().collect();
        let (rules, skipped) = compile_rules(&authored);
        self.rules = rules;

        let report = RuleSetReport {
            authored: authored.len(),
            installed: self.rules.len(),
            skipped,
        };
        debug!(
            "Installed {} rule(s) from {} entries ({} skipped)",
            report.installed,
            report.authored,
            report.skipped.len()
        );
        report
    }

    /// Get the cell at axial `(q, r)`; out-of-range reads are empty
    pub fn get_cell(&self, q: i32, r: i32) -> HexCell {
        self.grid.get(IVec2::new(q, r))
    }

    /// Set the cell at axial `(q, r)`; out-of-range writes are ignored
    pub fn set_cell(&mut self, q: i32, r: i32, state: char, direction: Option<Direction>) {
        self.put(IVec2::new(q, r), HexCell::new(state, direction));
    }

    /// Replace the cell at `position`; out-of-range writes are ignored
    pub fn put(&mut self, position: IVec2, cell: HexCell) {
        if !self.grid.set(position, cell) {
            warn!(
                "Ignoring write to ({}, {}) outside radius {}",
                position.x,
                position.y,
                self.grid.radius()
            );
        }
    }

    /// Flip a cell between empty and `a` facing direction 1
    pub fn toggle_cell(&mut self, q: i32, r: i32) {
        let cell = if self.get_cell(q, r).is_empty() {
            HexCell::facing('a', Direction::ALL[0])
        } else {
            HexCell::EMPTY
        };
        self.put(IVec2::new(q, r), cell);
    }

    /// Reset every cell to empty (rules are kept)
    pub fn clear(&mut self) {
        self.grid.clear();
    }

    /// Positions of all non-empty cells
    pub fn active_cells(&self) -> HashSet<IVec2> {
        self.grid.active_cells()
    }

    /// Rules matching the cell at `position`, each with the cell it would produce
    pub fn candidates(&self, position: IVec2) -> Vec<(&Rule, HexCell)> {
        candidates(&self.grid, &self.rules, position, self.grid.get(position))
    }

    /// Advance one generation using the internal random source
    pub fn step(&mut self) -> StepTx {
        let mut tx = plan_step(&self.grid, &self.rules, &mut self.rng);
        tx.commit(&mut self.grid);
        debug!("Step changed {} cell(s)", tx.changes().len());
        tx
    }

    /// Advance one generation using an injected random source
    pub fn step_with<R: Rng>(&mut self, rng: &mut R) -> StepTx {
        let mut tx = plan_step(&self.grid, &self.rules, rng);
        tx.commit(&mut self.grid);
        debug!("Step changed {} cell(s)", tx.changes().len());
        tx
    }
}

fn candidates<'r>(
    grid: &HexGrid,
    rules: &'r [Rule],
    position: IVec2,
    cell: HexCell,
) -> Vec<(&'r Rule, HexCell)> {
    rules
        .iter()
        .filter(|rule| matcher::matches(grid, position, &cell, rule))
        .map(|rule| (rule, rule.produce(&cell)))
        .collect()
}

/// Compute the next generation from the current one without touching it
fn plan_step<R: Rng>(grid: &HexGrid, rules: &[Rule], rng: &mut R) -> StepTx {
    let mut tx = StepTx::begin(grid);

    for (index, (position, cell)) in grid.iter().enumerate() {
        let found = candidates(grid, rules, position, cell);
        let chosen = match found.len() {
            0 => continue,
            1 => found[0],
            n => found[rng.random_range(0..n)],
        };
        tx.stage(index, position, cell, chosen.1, chosen.0.raw_text());
    }

    tx
}
