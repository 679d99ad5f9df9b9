use estate_registry::RegistryError;
use estate_types::ErrorKind;
use estate_valuation::ValuationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("valuation error: {0}")]
    Valuation(#[from] ValuationError),

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NodeError {
    /// Taxonomy kind reported to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Registry(e) => e.kind(),
            Self::Valuation(e) => e.kind(),
            Self::Config(_) => ErrorKind::Validation,
            Self::Snapshot(_) | Self::Io(_) => ErrorKind::Integration,
        }
    }
}
