//! JSON run configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::harness::{default_strategies, StrategySpec};
use crate::patterns::Pattern;
use crate::EvalError;

/// Everything one evaluation run needs.
///
/// Every field is optional in JSON; missing ones take the defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Test image to synthesize.
    pub pattern: Pattern,
    /// Strategies to run, in report order.
    pub strategies: Vec<StrategySpec>,
    /// Timed segmentations per strategy.
    pub repeats: usize,
    /// Append an ASCII rendering of each binarization to the text report.
    pub preview: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            pattern: Pattern::Gradient,
            strategies: default_strategies(),
            repeats: 1,
            preview: false,
        }
    }
}

impl EvalConfig {
    pub fn load(path: &Path) -> Result<Self, EvalError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
