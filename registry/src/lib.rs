//! Property registry.
//!
//! Owns property records and their identity, ownership and submission voting.
//! A submitted record starts unverified; independent identities vote on it and
//! reaching the approval threshold marks it verified for good.
//!
//! Value fields change only through [`PropertyRegistry::commit_valuation`],
//! which is gated on the single authorized writer held in the registry's
//! [`AuthorizationState`].

pub mod authorization;
pub mod error;
pub mod record;
pub mod registry;

pub use authorization::{AuthorizationGate, AuthorizationState};
pub use error::RegistryError;
pub use record::{NewRecord, PropertyRecord, SubmissionStatus};
pub use registry::PropertyRegistry;
