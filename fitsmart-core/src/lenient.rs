//! Tolerant field deserializers for model-authored JSON.
//!
//! Models drift from the requested shape: counts arrive as `8.0` or `"8"`,
//! scores as `"82%"`, lists as bare strings. These helpers accept any JSON
//! value for a field and fall back to the field's empty value instead of
//! failing the whole document. Use with `#[serde(default, deserialize_with = "...")]`.

use crate::types::{ExerciseReview, FeedbackKind, VideoFeedback};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn number_of(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim_end().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        // Objects usually carry their prose under one of these keys.
        Value::Object(map) => ["text", "name", "description"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str).map(str::to_string))
            .or_else(|| Some(Value::Object(map).to_string())),
        other => Some(other.to_string()),
    }
}

/// Non-negative whole count; anything unusable becomes 0.
pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(number_of(&value)
        .filter(|n| *n >= 0.0)
        .map(|n| n.round().min(u32::MAX as f64) as u32)
        .unwrap_or(0))
}

pub fn score<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(number_of(&value).unwrap_or(0.0))
}

pub fn opt_score<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(number_of(&value))
}

pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(text_of(Value::deserialize(d)?).unwrap_or_default())
}

pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(text_of(Value::deserialize(d)?).filter(|s| !s.trim().is_empty()))
}

/// A list of prose items; a single string counts as a one-item list.
pub fn text_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let items = match Value::deserialize(d)? {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    };
    Ok(items
        .into_iter()
        .filter_map(text_of)
        .filter(|s| !s.trim().is_empty())
        .collect())
}

/// Exercise reviews, accepting bare names in place of objects.
pub fn exercises<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<ExerciseReview>, D::Error> {
    let items = match Value::deserialize(d)? {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(_) => serde_json::from_value::<ExerciseReview>(item).ok(),
            other => text_of(other).map(|name| ExerciseReview {
                name,
                ..Default::default()
            }),
        })
        .collect())
}

/// Video feedback; a bare string becomes untyped feedback text.
pub fn feedback<'de, D: Deserializer<'de>>(d: D) -> Result<Option<VideoFeedback>, D::Error> {
    let parsed = match Value::deserialize(d)? {
        Value::Null => None,
        Value::String(text) => Some(VideoFeedback {
            kind: FeedbackKind::Other,
            text,
        }),
        other => serde_json::from_value::<VideoFeedback>(other).ok(),
    };
    Ok(parsed.filter(|f| !f.text.trim().is_empty()))
}
