//! Turns raw model text into either a typed value or clean prose.
//!
//! Structured replies are parsed strictly: a reply that does not match the
//! requested shape is a `NormalizeError`, never a partially filled value.

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::analysis::models::{AnalysisResult, MAX_SCORE};
use crate::generation::models::{InterviewQuestion, INTERVIEW_QUESTION_COUNT};

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("model reply was empty after cleanup")]
    Empty,

    #[error("model reply is not valid for the requested schema: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model reply has the wrong shape: {0}")]
    Shape(String),
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text)
        .trim();
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Cleans `raw` and parses it as `T`.
pub fn normalize_structured<T: DeserializeOwned>(raw: &str) -> Result<T, NormalizeError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(NormalizeError::Empty);
    }
    Ok(serde_json::from_str(cleaned)?)
}

/// Cleans `raw` and returns it verbatim. No parse attempt is made.
pub fn normalize_plain(raw: &str) -> Result<String, NormalizeError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(NormalizeError::Empty);
    }
    Ok(cleaned.to_string())
}

/// Parses an analysis reply and checks every score is within 0 – 100.
pub fn normalize_analysis(raw: &str) -> Result<AnalysisResult, NormalizeError> {
    let result: AnalysisResult = normalize_structured(raw)?;
    if let Some((field, value)) = result.out_of_range_score() {
        return Err(NormalizeError::Shape(format!(
            "{field} is {value}, expected 0-{MAX_SCORE}"
        )));
    }
    Ok(result)
}

/// Parses an interview reply: exactly three entries, none with blank text.
pub fn normalize_interview(raw: &str) -> Result<Vec<InterviewQuestion>, NormalizeError> {
    let questions: Vec<InterviewQuestion> = normalize_structured(raw)?;

    if questions.len() != INTERVIEW_QUESTION_COUNT {
        return Err(NormalizeError::Shape(format!(
            "expected {INTERVIEW_QUESTION_COUNT} interview questions, got {}",
            questions.len()
        )));
    }
    if let Some(i) = questions
        .iter()
        .position(|q| q.question.trim().is_empty() || q.tip.trim().is_empty())
    {
        return Err(NormalizeError::Shape(format!(
            "interview question {i} has an empty question or tip"
        )));
    }

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::MatchLevel;

    const ANALYSIS_JSON: &str = r#"{
        "score": 72,
        "matchLevel": "Medium",
        "breakdown": {"skillsMatch": 70, "experienceMatch": 80, "formatting": 65},
        "missingKeywords": {"hardSkills": ["GraphQL"], "softSkills": []},
        "redFlags": ["generic summary"],
        "actionPlan": ["Quantify your impact"],
        "summaryProfile": "A mid-level React developer."
    }"#;

    #[test]
    fn test_strip_fences_around_interview_array() {
        let input = "```json\n[{\"question\": \"How do you size a Kafka partition?\", \"tip\": \"Talk throughput.\"}]\n```";
        assert_eq!(
            strip_code_fences(input),
            "[{\"question\": \"How do you size a Kafka partition?\", \"tip\": \"Talk throughput.\"}]"
        );
    }

    #[test]
    fn test_strip_untagged_fences_around_rewrite() {
        let input = "```\nResults-driven engineer who cut checkout latency by 40%.\n```\n";
        assert_eq!(
            strip_code_fences(input),
            "Results-driven engineer who cut checkout latency by 40%."
        );
    }

    #[test]
    fn test_prose_after_closing_fence_is_kept() {
        // Only a fence at the very end is removed; trailing commentary survives and fails parsing.
        let input = format!("```json\n{ANALYSIS_JSON}\n```\nLet me know if you need more.");
        assert!(strip_code_fences(&input).ends_with("need more."));
        assert!(matches!(
            normalize_analysis(&input),
            Err(NormalizeError::Parse(_))
        ));
    }

    #[test]
    fn test_strip_code_fences_unterminated() {
        let input = "```json\n{\"hardSkills\": [\"GraphQL\"], \"softSkills\": []}";
        assert_eq!(
            strip_code_fences(input),
            "{\"hardSkills\": [\"GraphQL\"], \"softSkills\": []}"
        );
    }

    #[test]
    fn test_fenced_and_bare_parse_identically() {
        let fenced = format!("```json\n{ANALYSIS_JSON}\n```");
        let a: AnalysisResult = normalize_structured(ANALYSIS_JSON).unwrap();
        let b: AnalysisResult = normalize_structured(&fenced).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.score, 72);
        assert_eq!(a.match_level, MatchLevel::Medium);
    }

    #[test]
    fn test_analysis_score_out_of_range_is_shape_error() {
        let over = ANALYSIS_JSON.replace("\"score\": 72", "\"score\": 150");
        assert!(matches!(
            normalize_analysis(&over),
            Err(NormalizeError::Shape(msg)) if msg.contains("score is 150")
        ));

        let ceiling = ANALYSIS_JSON.replace("\"score\": 72", "\"score\": 100");
        assert_eq!(normalize_analysis(&ceiling).unwrap().score, 100);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = normalize_structured::<AnalysisResult>("{\"score\": 72,").unwrap_err();
        assert!(matches!(err, NormalizeError::Parse(_)));
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let err = normalize_structured::<AnalysisResult>(r#"{"score": 72, "matchLevel": "High"}"#)
            .unwrap_err();
        assert!(matches!(err, NormalizeError::Parse(_)));
    }

    #[test]
    fn test_preamble_is_parse_error() {
        let raw = format!("Sure! Here is the analysis:\n{ANALYSIS_JSON}");
        let err = normalize_structured::<AnalysisResult>(&raw).unwrap_err();
        assert!(matches!(err, NormalizeError::Parse(_)));
    }

    #[test]
    fn test_empty_reply_is_empty_error() {
        let err = normalize_structured::<AnalysisResult>("```json\n```").unwrap_err();
        assert!(matches!(err, NormalizeError::Empty));
        assert!(matches!(normalize_plain("   "), Err(NormalizeError::Empty)));
    }

    #[test]
    fn test_plain_text_returned_verbatim() {
        let raw = "\n  Results-driven engineer with 6 years of React experience.  \n";
        assert_eq!(
            normalize_plain(raw).unwrap(),
            "Results-driven engineer with 6 years of React experience."
        );
    }

    #[test]
    fn test_plain_text_is_not_parsed() {
        let raw = "{ not json, but fine as prose";
        assert_eq!(normalize_plain(raw).unwrap(), raw);
    }

    #[test]
    fn test_interview_requires_three_entries() {
        let two = r#"[{"question": "Q1", "tip": "T1"}, {"question": "Q2", "tip": "T2"}]"#;
        assert!(matches!(
            normalize_interview(two),
            Err(NormalizeError::Shape(_))
        ));

        let three = r#"```json
        [{"question": "Q1", "tip": "T1"}, {"question": "Q2", "tip": "T2"}, {"question": "Q3", "tip": "T3"}]
        ```"#;
        let questions = normalize_interview(three).unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[2].question, "Q3");
    }

    #[test]
    fn test_interview_rejects_blank_tip() {
        let raw = r#"[{"question": "Q1", "tip": "T1"}, {"question": "Q2", "tip": " "}, {"question": "Q3", "tip": "T3"}]"#;
        assert!(matches!(
            normalize_interview(raw),
            Err(NormalizeError::Shape(_))
        ));
    }
}
