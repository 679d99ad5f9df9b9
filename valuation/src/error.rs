use estate_registry::RegistryError;
use estate_types::{ErrorKind, RecordId, ScoreError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuationError {
    #[error("record {0} not found")]
    NotFound(RecordId),

    #[error("{0} may not propose a valuation for this record")]
    Unauthorized(String),

    #[error(transparent)]
    InvalidScore(#[from] ScoreError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no valuation proposal for record {0}")]
    NoProposal(RecordId),

    #[error("the proposal for record {0} is already verified")]
    AlreadyFinalized(RecordId),

    #[error("the owner of a record cannot vote on its valuation")]
    SelfVote,

    #[error("{0} has already voted on this proposal")]
    AlreadyVoted(String),

    #[error("{0} is not the owner of this record")]
    NotOwner(String),

    #[error("the proposal for record {0} is not verified yet")]
    NotYetVerified(RecordId),

    #[error("committing the valuation of record {id} failed")]
    CommitFailed {
        id: RecordId,
        #[source]
        source: RegistryError,
    },
}

impl ValuationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidScore(_) | Self::InvalidInput(_) => ErrorKind::Validation,
            Self::Unauthorized(_) | Self::SelfVote | Self::NotOwner(_) => {
                ErrorKind::Authorization
            }
            Self::NotFound(_)
            | Self::NoProposal(_)
            | Self::AlreadyFinalized(_)
            | Self::AlreadyVoted(_)
            | Self::NotYetVerified(_) => ErrorKind::State,
            Self::CommitFailed { .. } => ErrorKind::Integration,
        }
    }
}
