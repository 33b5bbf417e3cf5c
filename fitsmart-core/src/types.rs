use crate::lenient;
use crate::persona::PersonaId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Pdf,
    Video,
    Text,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Pdf => "pdf",
            MediaKind::Video => "video",
            MediaKind::Text => "text",
        }
    }
}

/// A routine as handed to the analyzer.
///
/// `content` is base64 for binary kinds and literal text for `MediaKind::Text`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineInput {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl std::fmt::Debug for RoutineInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Payloads run into megabytes of base64.
        f.debug_struct("RoutineInput")
            .field("kind", &self.kind)
            .field("content_len", &self.content.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

impl RoutineInput {
    pub fn new(kind: MediaKind, content: impl Into<String>, mime_type: Option<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            mime_type,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(MediaKind::Text, content, Some("text/plain".into()))
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// First-pass guess at what the routine is for.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreAnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Raw questionnaire answers, before the persona is attached.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAnswers {
    pub experience: String,
    pub goal: String,
    pub injuries: String,
    pub custom_answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub experience: String,
    pub goal: String,
    pub injuries: String,
    pub custom_answer: String,
    pub persona: PersonaId,
}

impl UserProfile {
    pub fn from_answers(answers: ProfileAnswers, persona: PersonaId) -> Self {
        Self {
            experience: answers.experience,
            goal: answers.goal,
            injuries: answers.injuries,
            custom_answer: answers.custom_answer,
            persona,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseReview {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub verdict: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub risk: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
}

/// Final report for the document/image path.
///
/// The model decides most of the shape, so every field is optional, known
/// fields tolerate the usual type drift, and anything unrecognised is kept in
/// `extra` for rendering. Any JSON object decodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiomechanicalAnalysis {
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub summary: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub safety_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::exercises")]
    pub exercises: Vec<ExerciseReview>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub optimizations: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub warnings: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Anything other than `correction` is shown as an optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Correction,
    Optimization,
    #[default]
    #[serde(other)]
    Other,
}

impl FeedbackKind {
    pub fn is_correction(self) -> bool {
        self == FeedbackKind::Correction
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFeedback {
    #[serde(rename = "type", default)]
    pub kind: FeedbackKind,
    #[serde(default, deserialize_with = "lenient::text")]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysisResult {
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub exercise: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub rep_count: u32,
    #[serde(default, deserialize_with = "lenient::score")]
    pub confidence: f64,
    #[serde(
        default,
        deserialize_with = "lenient::feedback",
        skip_serializing_if = "Option::is_none"
    )]
    pub feedback: Option<VideoFeedback>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routine_input_uses_type_on_the_wire() {
        let input = RoutineInput::new(MediaKind::Pdf, "AAAA", Some("application/pdf".into()));
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["type"], "pdf");
        assert_eq!(json["mimeType"], "application/pdf");
    }

    #[test]
    fn blank_content_is_empty() {
        assert!(RoutineInput::text("  \n").is_empty());
        assert!(!RoutineInput::text("sentadilla 5x5").is_empty());
    }

    #[test]
    fn debug_omits_payload() {
        let input = RoutineInput::new(MediaKind::Image, "c2VjcmV0LXBheWxvYWQ=", None);
        let s = format!("{input:?}");
        assert!(!s.contains("c2VjcmV0"));
        assert!(s.contains("content_len"));
    }

    #[test]
    fn pre_analysis_keeps_unknown_fields() {
        let pre: PreAnalysisResult =
            serde_json::from_str(r#"{"goal":"hypertrophy","daysPerWeek":4}"#).unwrap();
        assert_eq!(pre.goal.as_deref(), Some("hypertrophy"));
        assert_eq!(pre.training_type, None);
        assert_eq!(pre.extra["daysPerWeek"], 4);
    }

    #[test]
    fn video_result_defaults_missing_fields() {
        let res: VideoAnalysisResult = serde_json::from_str("{}").unwrap();
        assert_eq!(res.rep_count, 0);
        assert_eq!(res.confidence, 0.0);
        assert!(res.feedback.is_none());
    }

    #[test]
    fn video_feedback_decodes_type_tag() {
        let res: VideoAnalysisResult = serde_json::from_str(
            r#"{"repCount":5,"confidence":80,"feedback":{"type":"correction","text":"Baja más."}}"#,
        )
        .unwrap();
        let feedback = res.feedback.unwrap();
        assert_eq!(feedback.kind, FeedbackKind::Correction);
        assert_eq!(feedback.text, "Baja más.");
    }

    #[test]
    fn video_counts_tolerate_null_floats_and_strings() {
        let res: VideoAnalysisResult =
            serde_json::from_str(r#"{"repCount":null,"confidence":85}"#).unwrap();
        assert_eq!(res.rep_count, 0);
        assert_eq!(res.confidence, 85.0);

        let res: VideoAnalysisResult =
            serde_json::from_str(r#"{"repCount":8.0,"confidence":"92%"}"#).unwrap();
        assert_eq!(res.rep_count, 8);
        assert_eq!(res.confidence, 92.0);

        let res: VideoAnalysisResult =
            serde_json::from_str(r#"{"repCount":"10","confidence":"alta"}"#).unwrap();
        assert_eq!(res.rep_count, 10);
        assert_eq!(res.confidence, 0.0);

        let res: VideoAnalysisResult = serde_json::from_str(r#"{"repCount":-3}"#).unwrap();
        assert_eq!(res.rep_count, 0);
    }

    #[test]
    fn unknown_feedback_type_is_kept_as_other() {
        let res: VideoAnalysisResult = serde_json::from_str(
            r#"{"repCount":6,"feedback":{"type":"warning","text":"Baja más"}}"#,
        )
        .unwrap();
        let feedback = res.feedback.unwrap();
        assert_eq!(feedback.kind, FeedbackKind::Other);
        assert!(!feedback.kind.is_correction());
        assert_eq!(feedback.text, "Baja más");
    }

    #[test]
    fn bare_string_feedback_is_accepted() {
        let res: VideoAnalysisResult =
            serde_json::from_str(r#"{"feedback":"Mantén el core firme"}"#).unwrap();
        assert_eq!(res.feedback.unwrap().text, "Mantén el core firme");

        let res: VideoAnalysisResult = serde_json::from_str(r#"{"feedback":""}"#).unwrap();
        assert!(res.feedback.is_none());
    }

    #[test]
    fn exercises_accept_bare_names() {
        let res: BiomechanicalAnalysis =
            serde_json::from_str(r#"{"exercises":["Sentadilla",{"name":"Press banca","risk":"alto"}]}"#)
                .unwrap();
        assert_eq!(res.exercises.len(), 2);
        assert_eq!(res.exercises[0].name, "Sentadilla");
        assert_eq!(res.exercises[0].verdict, None);
        assert_eq!(res.exercises[1].name, "Press banca");
        assert_eq!(res.exercises[1].risk.as_deref(), Some("alto"));
    }

    #[test]
    fn safety_score_accepts_numeric_strings() {
        let res: BiomechanicalAnalysis =
            serde_json::from_str(r#"{"safetyScore":"82"}"#).unwrap();
        assert_eq!(res.safety_score, Some(82.0));

        let res: BiomechanicalAnalysis =
            serde_json::from_str(r#"{"safetyScore":null,"summary":"Bien"}"#).unwrap();
        assert_eq!(res.safety_score, None);
        assert_eq!(res.summary.as_deref(), Some("Bien"));
    }

    #[test]
    fn text_lists_accept_single_strings_and_objects() {
        let res: BiomechanicalAnalysis = serde_json::from_str(
            r#"{"optimizations":"Añade descanso","warnings":[{"text":"Cuidado lumbar"},null,7],"level":"pro"}"#,
        )
        .unwrap();
        assert_eq!(res.optimizations, vec!["Añade descanso".to_string()]);
        assert_eq!(res.warnings, vec!["Cuidado lumbar".to_string(), "7".to_string()]);
        assert_eq!(res.extra["level"], "pro");
    }
}
