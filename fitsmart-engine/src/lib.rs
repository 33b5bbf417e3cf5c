pub mod error;
pub mod orchestrator;
pub mod session;
pub mod traits;

pub use error::{AnalysisError, TransitionError};
pub use orchestrator::Orchestrator;
pub use session::{FailureKind, SessionError, SessionState, Step};
pub use traits::CompletionProvider;
