//! World configuration loaded from TOML

use crate::expand::split_rules_text;
use crate::{HexAutomaton, Result, RuleSetReport};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Automaton setup loaded from a TOML file
///
/// ```toml
/// name = "hex life"
/// radius = 10
/// seed = 42
/// rules = ["B3/S23"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Display name, used in log output
    #[serde(default = "default_name")]
    pub name: String,

    /// Grid radius in rings around the origin
    #[serde(default = "default_radius")]
    pub radius: u32,

    /// Seed for rule selection (absent = OS entropy)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Authored rules; an entry may hold several separated by `;` or newlines
    #[serde(default)]
    pub rules: Vec<String>,
}

fn default_name() -> String {
    "untitled".to_string()
}

fn default_radius() -> u32 {
    8
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            radius: default_radius(),
            seed: None,
            rules: Vec::new(),
        }
    }
}

impl WorldConfig {
    /// Decode a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Every authored rule, with multi-rule entries split apart
    pub fn rule_lines(&self) -> Vec<String> {
        self.rules
            .iter()
            .flat_map(|entry| split_rules_text(entry))
            .collect()
    }

    /// Create an empty automaton with this configuration's rules installed
    pub fn build(&self) -> (HexAutomaton, RuleSetReport) {
        let mut automaton = match self.seed {
            Some(seed) => HexAutomaton::with_seed(self.radius, seed),
            None => HexAutomaton::new(self.radius),
        };
        let report = automaton.set_rules(self.rule_lines());
        tracing::info!(
            "Built '{}': radius {}, {} rule(s)",
            self.name,
            self.radius,
            report.installed
        );
        (automaton, report)
    }
}

/// Load a configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<WorldConfig> {
    let text = std::fs::read_to_string(path)?;
    WorldConfig::from_toml_str(&text)
}
