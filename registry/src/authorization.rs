//! Writer authorization for valuation commits.
//!
//! At most one identity may write value fields into the registry at a time.
//! The designation is an administrative action; the voting workflows only
//! ever read it.

use estate_types::Identity;
use serde::{Deserialize, Serialize};

/// Read-only view of who may commit valuations.
pub trait AuthorizationGate {
    /// Whether `writer` is the currently designated writer.
    fn is_authorized(&self, writer: &Identity) -> bool;
}

/// The registry's administrative state: its administrator and the single
/// designated writer, if any.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationState {
    administrator: Identity,
    writer: Option<Identity>,
}

impl AuthorizationState {
    pub fn new(administrator: Identity) -> Self {
        Self {
            administrator,
            writer: None,
        }
    }

    pub fn administrator(&self) -> &Identity {
        &self.administrator
    }

    pub fn writer(&self) -> Option<&Identity> {
        self.writer.as_ref()
    }

    pub fn is_administrator(&self, identity: &Identity) -> bool {
        &self.administrator == identity
    }

    /// Replace the designated writer. Returns the previous one.
    pub(crate) fn designate(&mut self, writer: Identity) -> Option<Identity> {
        self.writer.replace(writer)
    }

    /// Clear the designation. Returns the previous writer.
    pub(crate) fn revoke(&mut self) -> Option<Identity> {
        self.writer.take()
    }

    pub(crate) fn set_administrator(&mut self, administrator: Identity) -> Identity {
        std::mem::replace(&mut self.administrator, administrator)
    }
}

impl AuthorizationGate for AuthorizationState {
    fn is_authorized(&self, writer: &Identity) -> bool {
        self.writer.as_ref() == Some(writer)
    }
}
