use thiserror::Error;

use gloam_engine::error::PersistError;

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("unknown curve {0:?}")]
    UnknownCurve(String),
    #[error("cannot encode transition state: {0}")]
    Encode(#[from] ron::Error),
    #[error("cannot decode transition state: {0}")]
    Decode(#[from] ron::error::SpannedError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}
