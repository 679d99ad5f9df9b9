//! Error taxonomy shared by every component.
//!
//! Each crate defines its own `thiserror` enum and maps every variant onto one
//! of these kinds, so callers can decide how to present a failure without
//! matching on component-specific variants.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input: out-of-range score, duplicate address, empty field.
    Validation,
    /// The caller is not the required identity.
    Authorization,
    /// The operation is invalid for the current state.
    State,
    /// A required cross-component call failed.
    Integration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::State => "state",
            Self::Integration => "integration",
        };
        f.write_str(name)
    }
}
