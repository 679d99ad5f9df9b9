//! The value fields a valuation proposal carries and a commit writes.

use crate::scores::{ScoreError, Scores};
use serde::{Deserialize, Serialize};

/// Estimated value, comparable value and assessment scores.
///
/// Amounts are raw integer units; currency conversion happens outside the core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Valuation {
    pub estimated_value: u128,
    pub comparable_value: u128,
    pub scores: Scores,
}

impl Valuation {
    pub fn new(estimated_value: u128, comparable_value: u128, scores: Scores) -> Self {
        Self {
            estimated_value,
            comparable_value,
            scores,
        }
    }

    pub fn validate(&self) -> Result<(), ScoreError> {
        self.scores.validate()
    }
}
