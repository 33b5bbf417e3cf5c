use std::fmt::Write as _;
use std::path::Path;

use fitsmart_core::config::{AnalyzerSettings, SETTING_KEYS};
use fitsmart_core::persona::PERSONAS;
use fitsmart_core::types::{BiomechanicalAnalysis, PreAnalysisResult, VideoAnalysisResult};
use fitsmart_engine::session::SessionError;

pub const NO_FEEDBACK_FALLBACK: &str = "No se pudo generar feedback específico.";

pub fn error_banner(error: &SessionError) -> String {
    format!("[!] {}", error.message)
}

pub fn persona_table() -> String {
    let mut out = String::new();
    for persona in &PERSONAS {
        let _ = writeln!(
            out,
            "  {:<6} {:<10} {}",
            persona.id.as_str(),
            persona.display_name,
            persona.tagline
        );
    }
    out
}

pub fn settings(path: &Path, settings: &AnalyzerSettings) -> String {
    let mut out = format!("# {}\n", path.display());
    for key in SETTING_KEYS {
        let value = settings.get(key).ok().flatten();
        let _ = writeln!(out, "{key} = {}", value.as_deref().unwrap_or("(default)"));
    }
    out
}

pub fn pre_analysis(result: &PreAnalysisResult) -> String {
    let mut out = String::from("PRE-ANÁLISIS\n");
    let _ = writeln!(
        out,
        "  Objetivo detectado: {}",
        result.goal.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "  Tipo de entrenamiento: {}",
        result.training_type.as_deref().unwrap_or("-")
    );
    out
}

pub fn analysis(result: &BiomechanicalAnalysis) -> String {
    let mut out = String::from("DIAGNÓSTICO BIOMECÁNICO\n");

    if let Some(summary) = &result.summary {
        let _ = writeln!(out, "\n{summary}");
    }
    if let Some(score) = result.safety_score {
        let _ = writeln!(out, "\nSEGURIDAD: {score:.0}/100");
    }

    if !result.exercises.is_empty() {
        out.push_str("\nEJERCICIOS\n");
        for ex in &result.exercises {
            let _ = write!(out, "  - {}", ex.name);
            if let Some(verdict) = &ex.verdict {
                let _ = write!(out, " [{verdict}]");
            }
            if let Some(risk) = &ex.risk {
                let _ = write!(out, " riesgo: {risk}");
            }
            out.push('\n');
            if let Some(notes) = &ex.notes {
                let _ = writeln!(out, "      {notes}");
            }
        }
    }

    bullet_section(&mut out, "OPTIMIZACIONES", &result.optimizations);
    bullet_section(&mut out, "ADVERTENCIAS", &result.warnings);

    // Fields the model added on its own are shown as-is.
    for (key, value) in &result.extra {
        let rendered = match value {
            serde_json::Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        };
        let _ = writeln!(out, "\n{}\n{rendered}", key.to_uppercase());
    }

    out
}

fn bullet_section(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{title}");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

pub fn video_results(result: &VideoAnalysisResult) -> String {
    let mut out = String::new();
    if let Some(exercise) = &result.exercise {
        let _ = writeln!(out, "EJERCICIO  {exercise}");
    }
    let _ = writeln!(out, "REPS       {}", result.rep_count);
    let _ = writeln!(out, "SCORE      {:.0}%", result.confidence);

    match &result.feedback {
        Some(feedback) => {
            let title = if feedback.kind.is_correction() {
                "CORRECCIÓN REQUERIDA"
            } else {
                "OPTIMIZACIÓN TÉCNICA"
            };
            let _ = writeln!(out, "\n{title}\n{}", feedback.text);
        }
        None => {
            let _ = writeln!(out, "\n{NO_FEEDBACK_FALLBACK}");
        }
    }
    out
}
