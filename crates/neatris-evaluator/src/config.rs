use serde::{Deserialize, Serialize};

/// Tunables of a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Consecutive decisions allowed for one piece without a drop before the
    /// evaluation is abandoned with fitness 0.
    pub max_moves_per_piece: usize,
}

impl EvaluatorConfig {
    pub const DEFAULT_MAX_MOVES_PER_PIECE: usize = 20;
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_moves_per_piece: Self::DEFAULT_MAX_MOVES_PER_PIECE,
        }
    }
}
