use crate::persona::PersonaId;
use crate::types::{MediaKind, PreAnalysisResult, RoutineInput, UserProfile};
use serde::{Deserialize, Serialize};

const DEFAULT_DOCUMENT_MIME: &str = "application/pdf";
const DEFAULT_VIDEO_MIME: &str = "video/mp4";

const PRE_ANALYSIS_TASK: &str = "TAREA: Detecta el objetivo y el tipo de entrenamiento de la rutina. \
Responde solo JSON con los campos goal y trainingType.";
const FULL_ANALYSIS_TASK: &str = "TAREA: Auditoría biomecánica completa. Evalúa la seguridad de cada \
ejercicio y optimiza la rutina. Responde solo JSON con los campos summary, safetyScore (0-100), \
exercises (name, verdict, risk, notes), optimizations y warnings.";
const VIDEO_INSTRUCTION: &str = "ERES UN EXPERTO EN BIOMECÁNICA. Analiza el vídeo: detecta el \
ejercicio, cuenta las repeticiones válidas y evalúa profundidad, trayectoria de la barra y \
estabilidad. Responde exclusivamente JSON con los campos exercise, repCount, confidence (0-100) y \
feedback ({type: correction|optimization, text}).";

const DOCUMENT_HINT: &str = "Analiza este documento.";
const VIDEO_HINT: &str = "Analiza mi técnica en este vídeo de entrenamiento.";

/// Which endpoint model a request should run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelTier {
    /// Quick classification and video scanning.
    Fast,
    /// The full biomechanical audit.
    Deep,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentPart {
    Text(String),
    InlineData { mime_type: String, data: String },
}

impl std::fmt::Debug for ContentPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentPart::Text(t) => f.debug_tuple("Text").field(t).finish(),
            ContentPart::InlineData { mime_type, data } => f
                .debug_struct("InlineData")
                .field("mime_type", mime_type)
                .field("data_len", &data.len())
                .finish(),
        }
    }
}

/// Provider-agnostic description of one completion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub tier: ModelTier,
    pub system_instruction: Option<String>,
    pub parts: Vec<ContentPart>,
    pub json_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    PreAnalysis,
    FullAnalysis,
    Video,
}

impl RequestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::PreAnalysis => "pre_analysis",
            RequestKind::FullAnalysis => "full_analysis",
            RequestKind::Video => "video",
        }
    }

    /// Progress caption while the request is in flight.
    pub fn status_message(self) -> &'static str {
        match self {
            RequestKind::PreAnalysis => "Realizando pre-análisis biomecánico...",
            RequestKind::FullAnalysis => "Generando diagnóstico profundo y optimizaciones...",
            RequestKind::Video => "Escaneando los fotogramas del vídeo...",
        }
    }

    /// Banner text after a failed request, voiced by the coach when one is chosen.
    pub fn failure_message(self, persona: Option<PersonaId>) -> String {
        let body = match self {
            RequestKind::PreAnalysis => {
                "no he podido procesar el archivo. Prueba con una captura más nítida."
            }
            RequestKind::FullAnalysis => "he tenido un problema al generar el informe. Inténtalo de nuevo.",
            RequestKind::Video => {
                "el análisis del vídeo ha fallado. Comprueba que el archivo no supere los 15 MB."
            }
        };
        let opener = persona.map(|p| p.persona().failure_opener).unwrap_or("");
        capitalize_first(&format!("{opener}{body}"))
    }
}

pub const DOCUMENT_STATUS_MESSAGE: &str = "Leyendo documento...";

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

fn routine_parts(routine: &RoutineInput, document_hint: bool) -> Vec<ContentPart> {
    // Acquisition never yields `Text`; only the CLI's --as-text path does.
    if routine.kind == MediaKind::Text {
        return vec![ContentPart::Text(routine.content.clone())];
    }

    let mut parts = vec![ContentPart::InlineData {
        mime_type: routine
            .mime_type
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DOCUMENT_MIME.into()),
        data: routine.content.clone(),
    }];
    if document_hint {
        parts.push(ContentPart::Text(DOCUMENT_HINT.into()));
    }
    parts
}

pub fn build_pre_analysis_request(routine: &RoutineInput, persona: PersonaId) -> CompletionRequest {
    CompletionRequest {
        tier: ModelTier::Fast,
        system_instruction: Some(format!("{} {}", persona.persona().prompt, PRE_ANALYSIS_TASK)),
        parts: routine_parts(routine, true),
        json_output: true,
    }
}

pub fn profile_context(profile: &UserProfile) -> String {
    format!(
        "Contexto: Nivel {}, Objetivo {}, Lesiones: {}. Respuesta de usuario: {}",
        profile.experience, profile.goal, profile.injuries, profile.custom_answer
    )
}

pub fn build_full_analysis_request(
    profile: &UserProfile,
    routine: &RoutineInput,
    pre_analysis: Option<&PreAnalysisResult>,
) -> CompletionRequest {
    let mut parts = routine_parts(routine, false);
    parts.push(ContentPart::Text(profile_context(profile)));

    if let Some(pre) = pre_analysis {
        // Serializing a map-backed struct cannot fail; skip the hint if it somehow does.
        if let Ok(json) = serde_json::to_string(pre) {
            parts.push(ContentPart::Text(format!("Pre-análisis: {json}")));
        }
    }

    CompletionRequest {
        tier: ModelTier::Deep,
        system_instruction: Some(format!(
            "{} {}",
            profile.persona.persona().prompt,
            FULL_ANALYSIS_TASK
        )),
        parts,
        json_output: true,
    }
}

pub fn build_video_request(video: &RoutineInput) -> CompletionRequest {
    let mime_type = video
        .mime_type
        .clone()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_VIDEO_MIME.into());

    CompletionRequest {
        tier: ModelTier::Fast,
        system_instruction: Some(VIDEO_INSTRUCTION.into()),
        parts: vec![
            ContentPart::InlineData {
                mime_type,
                data: video.content.clone(),
            },
            ContentPart::Text(VIDEO_HINT.into()),
        ],
        json_output: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            experience: "intermedio".into(),
            goal: "hipertrofia".into(),
            injuries: "ninguna".into(),
            custom_answer: "entreno 4 días".into(),
            persona: PersonaId::Sara,
        }
    }

    #[test]
    fn pre_analysis_sends_document_inline_with_hint() {
        let routine = RoutineInput::new(MediaKind::Pdf, "QUJD", None);
        let req = build_pre_analysis_request(&routine, PersonaId::Raul);

        assert_eq!(req.tier, ModelTier::Fast);
        assert!(req.json_output);
        assert!(req.system_instruction.as_deref().unwrap().contains("Raúl"));
        assert_eq!(
            req.parts[0],
            ContentPart::InlineData {
                mime_type: "application/pdf".into(),
                data: "QUJD".into()
            }
        );
        assert_eq!(req.parts[1], ContentPart::Text(DOCUMENT_HINT.into()));
    }

    #[test]
    fn text_routine_is_sent_literally() {
        let routine = RoutineInput::text("Press banca 4x8");
        let req = build_pre_analysis_request(&routine, PersonaId::Sara);
        assert_eq!(req.parts, vec![ContentPart::Text("Press banca 4x8".into())]);
    }

    #[test]
    fn full_analysis_carries_profile_and_pre_analysis() {
        let routine = RoutineInput::new(MediaKind::Image, "SU1H", Some("image/png".into()));
        let pre = PreAnalysisResult {
            goal: Some("hypertrophy".into()),
            ..Default::default()
        };
        let req = build_full_analysis_request(&profile(), &routine, Some(&pre));

        assert_eq!(req.tier, ModelTier::Deep);
        assert_eq!(req.parts.len(), 3);
        match &req.parts[0] {
            ContentPart::InlineData { mime_type, .. } => assert_eq!(mime_type, "image/png"),
            other => panic!("expected inline data, got {other:?}"),
        }
        match &req.parts[1] {
            ContentPart::Text(t) => {
                assert!(t.contains("Nivel intermedio"));
                assert!(t.contains("Lesiones: ninguna"));
                assert!(t.contains("entreno 4 días"));
            }
            other => panic!("expected text, got {other:?}"),
        }
        match &req.parts[2] {
            ContentPart::Text(t) => assert!(t.contains("\"goal\":\"hypertrophy\"")),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn full_analysis_without_pre_analysis_has_no_hint() {
        let routine = RoutineInput::new(MediaKind::Image, "SU1H", None);
        let req = build_full_analysis_request(&profile(), &routine, None);
        assert_eq!(req.parts.len(), 2);
    }

    #[test]
    fn video_defaults_to_mp4() {
        let video = RoutineInput::new(MediaKind::Video, "AAAA", None);
        let req = build_video_request(&video);
        assert_eq!(
            req.parts[0],
            ContentPart::InlineData {
                mime_type: "video/mp4".into(),
                data: "AAAA".into()
            }
        );
        assert!(req.system_instruction.is_some());
    }

    #[test]
    fn failure_message_is_voiced_by_persona() {
        let voiced = RequestKind::PreAnalysis.failure_message(Some(PersonaId::Sara));
        assert!(voiced.starts_with("Illo, no he podido"));

        let plain = RequestKind::Video.failure_message(None);
        assert!(plain.starts_with("El análisis del vídeo"));
    }

    #[test]
    fn inline_debug_hides_payload() {
        let part = ContentPart::InlineData {
            mime_type: "video/mp4".into(),
            data: "c2VjcmV0".into(),
        };
        assert!(!format!("{part:?}").contains("c2VjcmV0"));
    }
}
