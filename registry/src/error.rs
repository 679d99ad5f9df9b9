use estate_types::{ErrorKind, RecordId, ScoreError};
use thiserror::Error;

use crate::record::SubmissionStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("address {0:?} is already registered")]
    DuplicateAddress(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    InvalidScore(#[from] ScoreError),

    #[error("record {0} not found")]
    NotFound(RecordId),

    #[error("the owner of a record cannot vote on it")]
    SelfVote,

    #[error("{0} has already voted on this record")]
    AlreadyVoted(String),

    #[error("record {id} is {status:?}, submission voting is closed")]
    AlreadyFinalized { id: RecordId, status: SubmissionStatus },

    #[error("{0} is not the owner of this record")]
    NotOwner(String),

    #[error("{0} is not the authorized writer")]
    Unauthorized(String),

    #[error("{0} is not the registry administrator")]
    NotAdministrator(String),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateAddress(_) | Self::InvalidInput(_) | Self::InvalidScore(_) => {
                ErrorKind::Validation
            }
            Self::SelfVote
            | Self::NotOwner(_)
            | Self::Unauthorized(_)
            | Self::NotAdministrator(_) => ErrorKind::Authorization,
            Self::NotFound(_) | Self::AlreadyVoted(_) | Self::AlreadyFinalized { .. } => {
                ErrorKind::State
            }
        }
    }
}
