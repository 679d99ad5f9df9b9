//! Bounded valuation scores.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound (inclusive) for every score.
pub const MAX_SCORE: u32 = 100;

/// A score outside `[0, MAX_SCORE]`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("score `{field}` is {value}, must be at most {MAX_SCORE}")]
pub struct ScoreError {
    pub field: &'static str,
    pub value: u32,
}

/// The five assessment scores carried by a record and by a valuation proposal.
///
/// Values arrive unchecked from callers; [`Scores::validate`] enforces the bound
/// before anything is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scores {
    pub location: u32,
    pub size: u32,
    pub condition: u32,
    pub age: u32,
    pub renovation: u32,
}

impl Scores {
    pub const FIELD_NAMES: [&'static str; 5] = ["location", "size", "condition", "age", "renovation"];

    /// Build from `[location, size, condition, age, renovation]`.
    pub fn from_array(values: [u32; 5]) -> Self {
        let [location, size, condition, age, renovation] = values;
        Self {
            location,
            size,
            condition,
            age,
            renovation,
        }
    }

    pub fn as_array(&self) -> [u32; 5] {
        [
            self.location,
            self.size,
            self.condition,
            self.age,
            self.renovation,
        ]
    }

    /// Check every score against [`MAX_SCORE`], reporting the first offender.
    pub fn validate(&self) -> Result<(), ScoreError> {
        Self::FIELD_NAMES
            .iter()
            .zip(self.as_array())
            .find(|(_, value)| *value > MAX_SCORE)
            .map_or(Ok(()), |(field, value)| Err(ScoreError { field: *field, value }))
    }
}
