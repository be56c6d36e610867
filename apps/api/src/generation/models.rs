//! Request and response shapes for the auxiliary generation actions.

use serde::{Deserialize, Serialize};

use crate::analysis::models::MissingKeywords;
use crate::pipeline::ActionKind;

pub const INTERVIEW_QUESTION_COUNT: usize = 3;

/// Body of `POST /api/generate`: `{ "type": ..., "context": {...} }`.
/// Anything outside these variants is rejected at deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "context", rename_all = "lowercase")]
pub enum GenerateRequest {
    Rewrite(RewriteContext),
    Interview(InterviewContext),
}

impl GenerateRequest {
    pub fn action(&self) -> ActionKind {
        match self {
            GenerateRequest::Rewrite(_) => ActionKind::Rewrite,
            GenerateRequest::Interview(_) => ActionKind::Interview,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteContext {
    pub jd: String,
    pub current_text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewContext {
    pub jd: String,
    #[serde(default)]
    pub missing_keywords: MissingSkills,
}

/// Either a bare list of hard skills or the `missingKeywords` object of an analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MissingSkills {
    List(Vec<String>),
    Keywords(MissingKeywords),
}

impl Default for MissingSkills {
    fn default() -> Self {
        MissingSkills::List(Vec::new())
    }
}

impl MissingSkills {
    pub fn hard_skills(&self) -> &[String] {
        match self {
            MissingSkills::List(skills) => skills,
            MissingSkills::Keywords(keywords) => &keywords.hard_skills,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterviewQuestion {
    pub question: String,
    pub tip: String,
}

/// Response body for `rewrite`.
#[derive(Debug, Serialize)]
pub struct RewriteResponse {
    pub result: String,
}
