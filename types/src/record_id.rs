//! Record identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic identifier of a property record, allocated from zero.
///
/// Ids are indexes into the registry's record table. Other components hold
/// them as non-owning references and re-validate before use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(u64);

impl RecordId {
    pub const FIRST: Self = Self(0);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Table index for this id.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
