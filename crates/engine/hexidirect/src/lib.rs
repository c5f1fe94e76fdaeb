//! HexiDirect - symbolic rule language for hexagonal cellular automata
//!
//! This crate compiles authored HexiDirect rules into canonical rules and
//! runs them over a bounded hexagonal grid with simultaneous updates.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Rule Pipeline                         │
//! ├─────────────────────────────────────────────────────────┤
//! │  Expander (authored text -> canonical text)              │
//! │  ├── Presets (B3/S23, life-like B<n>/S<n>)               │
//! │  ├── Brackets, repeats, alternatives                     │
//! │  └── Wildcards, rotation, pointing                       │
//! ├─────────────────────────────────────────────────────────┤
//! │  Parser (canonical text -> Rule)                         │
//! │  ├── Source state and facing                             │
//! │  ├── Condition groups (AND of ORs)                       │
//! │  └── Target state and facing                             │
//! ├─────────────────────────────────────────────────────────┤
//! │  Automaton                                               │
//! │  ├── Matcher (slot-binding backtracking search)          │
//! │  ├── Random choice among matching rules                  │
//! │  └── Step transactions (snapshot, then commit)           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use hexidirect::{Direction, HexAutomaton};
//!
//! let mut automaton = HexAutomaton::with_seed(4, 42);
//! let report = automaton.set_rules(["a[x] => b", "t% => t%1"]);
//! assert_eq!(report.installed, 7);
//!
//! automaton.set_cell(0, 0, 'a', None);
//! automaton.set_cell(1, 0, 'x', None);
//! automaton.set_cell(-2, 1, 't', Direction::new(6));
//!
//! let tx = automaton.step();
//! assert_eq!(tx.changes().len(), 2);
//! assert_eq!(automaton.get_cell(0, 0).state(), 'b');
//! assert_eq!(automaton.get_cell(-2, 1).direction(), Direction::new(1));
//! ```

mod cell;
mod condition;
mod config;
mod engine;
mod error;
mod grid;
mod parser;
mod rule;
mod transaction;

pub mod expand;
pub mod matcher;
pub mod preset;

pub use cell::{Direction, HexCell, EMPTY, NEIGHBOR_OFFSETS, SYMBOLIC_STATES};
pub use condition::Condition;
pub use config::{load_config, WorldConfig};
pub use engine::{compile_rules, HexAutomaton, RuleSetReport, SkippedRule};
pub use error::{Error, Result};
pub use expand::{expand_rule, split_rules_text};
pub use grid::{HexGrid, RuleContext};
pub use matcher::matches;
pub use parser::parse_rule;
pub use preset::EXAMPLE_RULE_SETS;
pub use rule::{Rule, SourceDirection, TargetDirection};
pub use transaction::{StepTx, TxChange};

// Re-export glam for convenience
pub use glam;
