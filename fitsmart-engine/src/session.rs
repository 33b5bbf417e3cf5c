//! Session state and its pure transition function.
//!
//! `transition` never performs I/O: it returns the next state plus at most one
//! effect (an analysis request) for the caller to run. The result of that
//! request comes back as `Event::Completed` tagged with the ticket it was
//! issued under; completions for a ticket that is no longer in flight (for
//! example after a reset) leave the state untouched.

use crate::error::{AnalysisError, TransitionError};
use fitsmart_core::persona::PersonaId;
use fitsmart_core::prompt::{
    CompletionRequest, RequestKind, build_full_analysis_request, build_pre_analysis_request,
    build_video_request,
};
use fitsmart_core::types::{
    BiomechanicalAnalysis, PreAnalysisResult, ProfileAnswers, RoutineInput, UserProfile,
    VideoAnalysisResult,
};
use fitsmart_core::upload::AcquireError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Step {
    #[default]
    CollectingInput,
    CollectingPersona,
    Questionnaire,
    Results,
    VideoResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    InputTooLarge,
    EmptyFile,
    Request,
    Decode,
}

/// What the error banner shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionError {
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub generation: u64,
    pub kind: RequestKind,
}

/// Bookkeeping for the single outstanding request.
///
/// Persona and profile are only committed to the session once the request
/// they belong to succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InFlight {
    pub ticket: Ticket,
    pub persona: Option<PersonaId>,
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub step: Step,
    pub in_flight: Option<InFlight>,
    pub status: Option<String>,
    pub error: Option<SessionError>,
    pub input: Option<RoutineInput>,
    pub persona: Option<PersonaId>,
    pub pre_analysis: Option<PreAnalysisResult>,
    pub profile: Option<UserProfile>,
    pub analysis: Option<BiomechanicalAnalysis>,
    pub video: Option<VideoAnalysisResult>,
    /// Bumped on every reset so late completions can be recognised.
    pub generation: u64,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Fresh session: every entity dropped, nothing in flight.
    pub fn reset(&self) -> SessionState {
        SessionState {
            generation: self.generation.wrapping_add(1),
            ..SessionState::default()
        }
    }

    fn expect_idle_at(&self, expected: Step) -> Result<(), TransitionError> {
        if self.is_loading() {
            return Err(TransitionError::Busy);
        }
        if self.step != expected {
            return Err(TransitionError::WrongStep {
                expected,
                actual: self.step,
            });
        }
        Ok(())
    }

    fn begin(
        &mut self,
        kind: RequestKind,
        persona: Option<PersonaId>,
        profile: Option<UserProfile>,
    ) -> Ticket {
        let ticket = Ticket {
            generation: self.generation,
            kind,
        };
        self.in_flight = Some(InFlight {
            ticket,
            persona,
            profile,
        });
        self.status = Some(kind.status_message().into());
        self.error = None;
        ticket
    }
}

#[derive(Debug)]
pub enum Outcome {
    PreAnalysis(Result<PreAnalysisResult, AnalysisError>),
    FullAnalysis(Result<BiomechanicalAnalysis, AnalysisError>),
    Video(Result<VideoAnalysisResult, AnalysisError>),
}

impl Outcome {
    fn kind(&self) -> RequestKind {
        match self {
            Outcome::PreAnalysis(_) => RequestKind::PreAnalysis,
            Outcome::FullAnalysis(_) => RequestKind::FullAnalysis,
            Outcome::Video(_) => RequestKind::Video,
        }
    }
}

#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub enum Event {
    SubmitInput(RoutineInput),
    InputRejected(AcquireError),
    SelectPersona(PersonaId),
    CompleteProfile(ProfileAnswers),
    Completed(Completion),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Request {
        ticket: Ticket,
        request: CompletionRequest,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SessionState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn settle(state: SessionState) -> Self {
        Self {
            state,
            effect: None,
        }
    }
}

pub fn transition(state: &SessionState, event: Event) -> Result<Transition, TransitionError> {
    match event {
        Event::Reset => Ok(Transition::settle(state.reset())),

        Event::InputRejected(err) => {
            state.expect_idle_at(Step::CollectingInput)?;
            let mut next = state.clone();
            next.error = Some(SessionError {
                kind: match err {
                    AcquireError::InputTooLarge { .. } => FailureKind::InputTooLarge,
                    AcquireError::Empty => FailureKind::EmptyFile,
                },
                message: err.user_message(),
            });
            Ok(Transition::settle(next))
        }

        Event::SubmitInput(input) => {
            state.expect_idle_at(Step::CollectingInput)?;
            if input.is_empty() {
                return Err(TransitionError::EmptyInput);
            }

            let mut next = state.clone();
            next.error = None;

            if input.is_video() {
                let request = build_video_request(&input);
                next.input = Some(input);
                let ticket = next.begin(RequestKind::Video, None, None);
                return Ok(Transition {
                    state: next,
                    effect: Some(Effect::Request { ticket, request }),
                });
            }

            next.input = Some(input);
            next.step = Step::CollectingPersona;
            Ok(Transition::settle(next))
        }

        Event::SelectPersona(persona) => {
            state.expect_idle_at(Step::CollectingPersona)?;
            let input = state.input.as_ref().ok_or(TransitionError::MissingInput)?;

            let request = build_pre_analysis_request(input, persona);
            let mut next = state.clone();
            let ticket = next.begin(RequestKind::PreAnalysis, Some(persona), None);
            Ok(Transition {
                state: next,
                effect: Some(Effect::Request { ticket, request }),
            })
        }

        Event::CompleteProfile(answers) => {
            state.expect_idle_at(Step::Questionnaire)?;
            let input = state.input.as_ref().ok_or(TransitionError::MissingInput)?;
            let persona = state.persona.ok_or(TransitionError::MissingPersona)?;

            let profile = UserProfile::from_answers(answers, persona);
            let request =
                build_full_analysis_request(&profile, input, state.pre_analysis.as_ref());
            let mut next = state.clone();
            let ticket = next.begin(RequestKind::FullAnalysis, Some(persona), Some(profile));
            Ok(Transition {
                state: next,
                effect: Some(Effect::Request { ticket, request }),
            })
        }

        Event::Completed(completion) => apply_completion(state, completion),
    }
}

fn apply_completion(
    state: &SessionState,
    completion: Completion,
) -> Result<Transition, TransitionError> {
    let Some(in_flight) = state
        .in_flight
        .as_ref()
        .filter(|f| f.ticket == completion.ticket)
    else {
        log::info!(
            "discarding stale {} response (generation {}, session at {})",
            completion.ticket.kind.as_str(),
            completion.ticket.generation,
            state.generation
        );
        return Ok(Transition::settle(state.clone()));
    };

    if completion.outcome.kind() != in_flight.ticket.kind {
        return Err(TransitionError::OutcomeMismatch);
    }

    let kind = in_flight.ticket.kind;
    let persona = in_flight.persona;
    let profile = in_flight.profile.clone();

    let mut next = state.clone();
    next.in_flight = None;
    next.status = None;

    let failure = |err: AnalysisError| {
        log::warn!("{} request failed: {err}", kind.as_str());
        SessionError {
            kind: match err {
                AnalysisError::Request(_) => FailureKind::Request,
                AnalysisError::Decode(_) => FailureKind::Decode,
            },
            message: kind.failure_message(persona),
        }
    };

    match completion.outcome {
        Outcome::PreAnalysis(Ok(pre)) => {
            next.persona = persona;
            next.pre_analysis = Some(pre);
            next.step = Step::Questionnaire;
        }
        Outcome::FullAnalysis(Ok(analysis)) => {
            next.profile = profile;
            next.analysis = Some(analysis);
            next.step = Step::Results;
        }
        Outcome::Video(Ok(video)) => {
            next.video = Some(video);
            next.step = Step::VideoResults;
        }
        Outcome::PreAnalysis(Err(e)) | Outcome::FullAnalysis(Err(e)) | Outcome::Video(Err(e)) => {
            next.error = Some(failure(e));
        }
    }

    Ok(Transition::settle(next))
}
