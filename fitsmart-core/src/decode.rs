//! Best-effort recovery of structured data from model output.
//!
//! Generative endpoints regularly wrap a valid JSON payload in markdown fences
//! or a sentence of prose. The decoder runs an ordered list of extraction
//! strategies and keeps the first candidate that also deserializes into the
//! requested type. Malformed JSON is never repaired.

use crate::text::{outer_brace_span, strip_code_fences};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub const DECODE_FAILURE_MESSAGE: &str =
    "No he podido interpretar la respuesta de la IA. Reinténtalo en unos segundos.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DecodeFailure {
    pub message: String,
    /// Names of the strategies that produced a JSON value which then failed
    /// to match the requested shape.
    pub shape_mismatches: Vec<&'static str>,
}

impl DecodeFailure {
    fn new(shape_mismatches: Vec<&'static str>) -> Self {
        Self {
            message: DECODE_FAILURE_MESSAGE.into(),
            shape_mismatches,
        }
    }
}

pub type ExtractionFn = fn(&str) -> Option<Value>;

#[derive(Debug, Clone, Copy)]
pub struct ExtractionStrategy {
    pub name: &'static str,
    pub extract: ExtractionFn,
}

/// Tried in order; first success wins.
pub const STRATEGIES: [ExtractionStrategy; 3] = [
    ExtractionStrategy {
        name: "direct",
        extract: parse_direct,
    },
    ExtractionStrategy {
        name: "strip_fences",
        extract: parse_without_fences,
    },
    ExtractionStrategy {
        name: "brace_span",
        extract: parse_brace_span,
    },
];

fn parse_direct(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

fn parse_without_fences(text: &str) -> Option<Value> {
    serde_json::from_str(&strip_code_fences(text)).ok()
}

fn parse_brace_span(text: &str) -> Option<Value> {
    serde_json::from_str(outer_brace_span(text)?).ok()
}

/// Runs the default strategy chain and deserializes into `T`.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, DecodeFailure> {
    decode_with(text, &STRATEGIES)
}

pub fn decode_with<T: DeserializeOwned>(
    text: &str,
    strategies: &[ExtractionStrategy],
) -> Result<T, DecodeFailure> {
    let mut mismatches = Vec::new();

    for strategy in strategies {
        let Some(value) = (strategy.extract)(text) else {
            log::debug!("decoder strategy {} found no JSON", strategy.name);
            continue;
        };

        match serde_json::from_value::<T>(value) {
            Ok(decoded) => {
                if strategy.name != "direct" {
                    log::debug!("decoder recovered payload via {}", strategy.name);
                }
                return Ok(decoded);
            }
            Err(e) => {
                log::debug!("decoder strategy {} shape mismatch: {e}", strategy.name);
                mismatches.push(strategy.name);
            }
        }
    }

    log::warn!(
        "could not decode model output ({} bytes) with any strategy",
        text.len()
    );
    Err(DecodeFailure::new(mismatches))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BiomechanicalAnalysis, FeedbackKind, PreAnalysisResult, VideoAnalysisResult};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Reps {
        reps: u32,
    }

    #[test]
    fn parses_plain_json() {
        let r: Reps = decode(r#"{"reps":3}"#).unwrap();
        assert_eq!(r, Reps { reps: 3 });
    }

    #[test]
    fn fenced_payload_matches_bare_payload() {
        let bare = r#"{"goal":"hypertrophy","trainingType":"split"}"#;
        let fenced = format!("```json\n{bare}\n```");
        let a: PreAnalysisResult = decode(bare).unwrap();
        let b: PreAnalysisResult = decode(&fenced).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn recovers_object_wrapped_in_prose() {
        let text = "Claro, aquí tienes el análisis: {\"reps\": 12} ¡A darle!";
        let r: Reps = decode(text).unwrap();
        assert_eq!(r.reps, 12);
    }

    #[test]
    fn recovers_fenced_payload_after_prose() {
        let text = "Here you go:\n```json\n{\"repCount\":8,\"confidence\":92}\n```";
        let r: VideoAnalysisResult = decode(text).unwrap();
        assert_eq!(r.rep_count, 8);
        assert_eq!(r.confidence, 92.0);
        assert!(r.feedback.is_none());
    }

    #[test]
    fn empty_text_fails() {
        let err = decode::<PreAnalysisResult>("").unwrap_err();
        assert_eq!(err.message, DECODE_FAILURE_MESSAGE);
        assert!(err.shape_mismatches.is_empty());
    }

    #[test]
    fn whitespace_text_fails() {
        assert!(decode::<PreAnalysisResult>("  \n\t ").is_err());
    }

    #[test]
    fn multiple_objects_use_outermost_span_only() {
        // The outermost span `{...} and {...}` is not valid JSON; no attempt is
        // made to pick one of the inner objects.
        let text = "first {\"reps\":1} and then {\"reps\":2}";
        assert!(decode::<Reps>(text).is_err());
    }

    #[test]
    fn malformed_json_is_not_repaired() {
        assert!(decode::<Reps>("{\"reps\": 3,}").is_err());
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let err = decode::<Reps>(r#"{"sets":3}"#).unwrap_err();
        assert_eq!(err.shape_mismatches, vec!["direct", "strip_fences", "brace_span"]);
    }

    #[test]
    fn custom_strategy_list_is_respected() {
        let only_direct = [STRATEGIES[0]];
        let text = "prefix {\"reps\":1}";
        assert!(decode_with::<Reps>(text, &only_direct).is_err());
        assert!(decode::<Reps>(text).is_ok());
    }

    #[test]
    fn drifting_video_shapes_still_decode() {
        let r: VideoAnalysisResult = decode(r#"{"repCount":null,"confidence":85}"#).unwrap();
        assert_eq!((r.rep_count, r.confidence), (0, 85.0));

        let r: VideoAnalysisResult = decode(r#"{"repCount":8.0,"confidence":90}"#).unwrap();
        assert_eq!(r.rep_count, 8);

        let r: VideoAnalysisResult =
            decode(r#"{"repCount":4,"feedback":{"type":"warning","text":"Baja más"}}"#).unwrap();
        assert_eq!(r.feedback.map(|f| f.kind), Some(FeedbackKind::Other));
    }

    #[test]
    fn drifting_analysis_shapes_still_decode() {
        let r: BiomechanicalAnalysis =
            decode(r#"{"exercises":["Sentadilla","Press banca"]}"#).unwrap();
        assert_eq!(r.exercises.len(), 2);
        assert_eq!(r.exercises[1].name, "Press banca");

        let r: BiomechanicalAnalysis = decode(r#"{"safetyScore":"82"}"#).unwrap();
        assert_eq!(r.safety_score, Some(82.0));
    }
}
