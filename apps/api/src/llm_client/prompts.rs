// Shared prompt fragments.
// Each feature module that needs LLM calls defines its own prompts.rs alongside it.
// This file contains the cross-cutting output directives.

/// Appended to every prompt that expects structured output.
/// The normalizer only understands leading/trailing ``` fences, so preambles must be forbidden outright.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Respond ONLY with valid JSON. \
Do NOT wrap the JSON in markdown code fences. \
Do NOT include any intro text, explanations or apologies before or after the JSON.";

/// Appended to prompts that expect a single block of prose.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
Output: just the rewritten paragraph. \
No intro text, no quotes, no markdown, no alternatives.";

/// Fills `{name}` placeholders in one left-to-right pass.
///
/// Substituted values are never rescanned, so user text that happens to contain
/// `{jd_text}` or another placeholder is inserted literally. Unknown
/// placeholders and stray braces are copied through unchanged.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let hit = vars.iter().find(|(name, _)| {
            after
                .strip_prefix(name)
                .is_some_and(|tail| tail.starts_with('}'))
        });
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_known_placeholders() {
        let out = render("Role: {jd_text}\n{count} questions", &[("jd_text", "SRE"), ("count", "3")]);
        assert_eq!(out, "Role: SRE\n3 questions");
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let out = render(
            "{current_text} / {jd_text}",
            &[("current_text", "I led {jd_text} work"), ("jd_text", "Go {current_text}")],
        );
        assert_eq!(out, "I led {jd_text} work / Go {current_text}");
    }

    #[test]
    fn test_render_keeps_json_braces_and_unknown_names() {
        let template = r#"[{ "question": "...", "tip": "..." }] {unknown} {"#;
        assert_eq!(render(template, &[("count", "3")]), template);
    }
}
