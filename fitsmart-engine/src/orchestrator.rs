use crate::error::{AnalysisError, TransitionError};
use crate::session::{Completion, Effect, Event, Outcome, SessionState, transition};
use crate::traits::CompletionProvider;
use fitsmart_core::decode::decode;
use fitsmart_core::persona::PersonaId;
use fitsmart_core::prompt::{CompletionRequest, RequestKind};
use fitsmart_core::types::{ProfileAnswers, RoutineInput};
use fitsmart_core::upload::{Upload, acquire};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type StatusHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Drives one analysis session.
///
/// State changes only go through `session::transition`. The lock is released
/// while a request is outstanding, so `reset` and `snapshot` stay responsive;
/// the in-flight ticket makes sure a late response is dropped after a reset.
pub struct Orchestrator {
    provider: Arc<dyn CompletionProvider>,
    state: Mutex<SessionState>,
    on_status: Option<StatusHook>,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            state: Mutex::new(SessionState::default()),
            on_status: None,
        }
    }

    /// Registers a callback for progress captions. It must be fast.
    pub fn with_status_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_status = Some(Arc::new(hook));
        self
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Acquires a picked file and submits it. Oversized or empty files are
    /// recorded as the session error without any request being issued.
    pub async fn submit_upload(&self, upload: &Upload) -> Result<SessionState, TransitionError> {
        match acquire(upload) {
            Ok(input) => self.submit_input(input).await,
            Err(e) => {
                log::warn!("upload rejected: {e}");
                self.dispatch(Event::InputRejected(e)).await
            }
        }
    }

    pub async fn submit_input(&self, input: RoutineInput) -> Result<SessionState, TransitionError> {
        self.dispatch(Event::SubmitInput(input)).await
    }

    pub async fn select_persona(&self, persona: PersonaId) -> Result<SessionState, TransitionError> {
        self.dispatch(Event::SelectPersona(persona)).await
    }

    pub async fn complete_profile(
        &self,
        answers: ProfileAnswers,
    ) -> Result<SessionState, TransitionError> {
        self.dispatch(Event::CompleteProfile(answers)).await
    }

    /// Drops every entity and bumps the generation, so a response still in
    /// flight is discarded when it lands.
    pub async fn reset(&self) -> Result<SessionState, TransitionError> {
        let mut state = self.state.lock().await;
        commit(&mut state, Event::Reset)?;
        log::info!("session reset (generation {})", state.generation);
        Ok(state.clone())
    }

    async fn dispatch(&self, event: Event) -> Result<SessionState, TransitionError> {
        let effect = {
            let mut state = self.state.lock().await;
            commit(&mut state, event)?
        };

        let Some(Effect::Request { ticket, request }) = effect else {
            return Ok(self.snapshot().await);
        };

        if let Some(hook) = &self.on_status {
            hook(ticket.kind.status_message());
        }

        let outcome = self.perform(ticket.kind, &request).await;

        let mut state = self.state.lock().await;
        commit(&mut state, Event::Completed(Completion { ticket, outcome }))?;
        Ok(state.clone())
    }

    async fn perform(&self, kind: RequestKind, request: &CompletionRequest) -> Outcome {
        log::info!("issuing {} request ({:?} model)", kind.as_str(), request.tier);
        let raw = self.provider.complete(request).await;
        match kind {
            RequestKind::PreAnalysis => Outcome::PreAnalysis(decode_raw(raw)),
            RequestKind::FullAnalysis => Outcome::FullAnalysis(decode_raw(raw)),
            RequestKind::Video => Outcome::Video(decode_raw(raw)),
        }
    }
}

/// The only place session state is replaced.
fn commit(state: &mut SessionState, event: Event) -> Result<Option<Effect>, TransitionError> {
    let next = transition(state, event)?;
    if next.state.step != state.step {
        log::info!("session step: {:?} -> {:?}", state.step, next.state.step);
    }
    *state = next.state;
    Ok(next.effect)
}

fn decode_raw<T: DeserializeOwned>(raw: anyhow::Result<String>) -> Result<T, AnalysisError> {
    let text = raw.map_err(AnalysisError::Request)?;
    Ok(decode::<T>(&text)?)
}
