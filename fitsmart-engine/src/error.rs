use crate::session::Step;
use fitsmart_core::decode::DecodeFailure;
use thiserror::Error;

/// Why one analysis request produced no result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("completion request failed: {0:#}")]
    Request(anyhow::Error),
    #[error(transparent)]
    Decode(#[from] DecodeFailure),
}

/// An event the session refused to apply. State is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("an analysis request is already in flight")]
    Busy,
    #[error("expected step {expected:?}, session is at {actual:?}")]
    WrongStep { expected: Step, actual: Step },
    #[error("routine input is empty")]
    EmptyInput,
    #[error("no routine input has been submitted")]
    MissingInput,
    #[error("a coach persona must be selected first")]
    MissingPersona,
    #[error("completion outcome does not match the request in flight")]
    OutcomeMismatch,
}
