use regex::Regex;
use std::sync::OnceLock;

fn code_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // A fence marker plus its optional language tag (```json, ```JSON5, ```).
        Regex::new(r"```[A-Za-z0-9_+\-]*").expect("valid code fence regex")
    })
}

/// Removes every markdown code-fence marker and trims the result.
///
/// Only the markers are removed; prose outside the fence stays in place.
pub fn strip_code_fences(text: &str) -> String {
    code_fence_re().replace_all(text, "").trim().to_string()
}

/// Returns the span from the first `{` to the last `}` (inclusive), if any.
pub fn outer_brace_span(text: &str) -> Option<&str> {
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    if close > open {
        Some(&text[open..=close])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences_with_language_tag() {
        let input = "```json\n{\"a\":1}\n```";
        assert_eq!(strip_code_fences(input), "{\"a\":1}");
    }

    #[test]
    fn strips_bare_fences() {
        assert_eq!(strip_code_fences("```\n[]\n```  "), "[]");
    }

    #[test]
    fn keeps_surrounding_prose() {
        assert_eq!(
            strip_code_fences("Aquí va:\n```json\n{}\n```"),
            "Aquí va:\n\n{}"
        );
    }

    #[test]
    fn brace_span_is_outermost() {
        assert_eq!(
            outer_brace_span("x {\"a\":{\"b\":1}} y {\"c\":2} z"),
            Some("{\"a\":{\"b\":1}} y {\"c\":2}")
        );
    }

    #[test]
    fn brace_span_requires_close_after_open() {
        assert_eq!(outer_brace_span("} nothing {"), None);
        assert_eq!(outer_brace_span("no braces"), None);
        assert_eq!(outer_brace_span("{ unclosed"), None);
    }
}
