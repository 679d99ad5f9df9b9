//! Workflow thresholds.

use serde::{Deserialize, Serialize};

/// Vote thresholds for both voting stages.
///
/// A transition fires when a counter first reaches its threshold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowParams {
    /// Approvals that mark a submitted record verified.
    #[serde(default = "default_approval_threshold")]
    pub submission_approval_threshold: u32,

    /// Rejections that close a pending submission as rejected.
    #[serde(default = "default_rejection_threshold")]
    pub submission_rejection_threshold: u32,

    /// Approvals that mark a valuation proposal verified (awaiting confirm).
    #[serde(default = "default_approval_threshold")]
    pub valuation_approval_threshold: u32,

    /// Rejections that delete a valuation proposal.
    #[serde(default = "default_rejection_threshold")]
    pub valuation_rejection_threshold: u32,
}

fn default_approval_threshold() -> u32 {
    3
}

fn default_rejection_threshold() -> u32 {
    2
}

impl WorkflowParams {
    /// Name of the first zero threshold, if any.
    pub fn zero_threshold(&self) -> Option<&'static str> {
        [
            ("submission_approval_threshold", self.submission_approval_threshold),
            ("submission_rejection_threshold", self.submission_rejection_threshold),
            ("valuation_approval_threshold", self.valuation_approval_threshold),
            ("valuation_rejection_threshold", self.valuation_rejection_threshold),
        ]
        .into_iter()
        .find(|(_, v)| *v == 0)
        .map(|(name, _)| name)
    }
}

impl Default for WorkflowParams {
    fn default() -> Self {
        Self {
            submission_approval_threshold: default_approval_threshold(),
            submission_rejection_threshold: default_rejection_threshold(),
            valuation_approval_threshold: default_approval_threshold(),
            valuation_rejection_threshold: default_rejection_threshold(),
        }
    }
}
