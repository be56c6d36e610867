//! Analysis result shape returned by the model and forwarded to the dashboard.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateLevel {
    Junior,
    #[serde(rename = "Mid-Level")]
    MidLevel,
    Senior,
    Lead,
}

/// Sub-scores, each 0 – 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Breakdown {
    pub skills_match: u8,
    pub experience_match: u8,
    pub formatting: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MissingKeywords {
    pub hard_skills: Vec<String>,
    pub soft_skills: Vec<String>,
}

/// Full structured analysis.
///
/// `candidate_level` and `estimated_salary_range` only exist in the v2 schema;
/// both shapes deserialize, and absent fields are omitted on the way out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalysisResult {
    pub score: u8, // 0 – 100
    pub match_level: MatchLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_level: Option<CandidateLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_salary_range: Option<String>,
    pub breakdown: Breakdown,
    pub missing_keywords: MissingKeywords,
    pub red_flags: Vec<String>,
    pub action_plan: Vec<String>,
    pub summary_profile: String,
}

/// Upper bound shared by the overall score and every sub-score.
pub const MAX_SCORE: u8 = 100;

impl AnalysisResult {
    /// Returns the first score outside 0 – 100 as `(field, value)`.
    pub fn out_of_range_score(&self) -> Option<(&'static str, u8)> {
        [
            ("score", self.score),
            ("breakdown.skillsMatch", self.breakdown.skills_match),
            ("breakdown.experienceMatch", self.breakdown.experience_match),
            ("breakdown.formatting", self.breakdown.formatting),
        ]
        .into_iter()
        .find(|(_, value)| *value > MAX_SCORE)
    }
}

/// Which output schema the analysis prompt asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalysisSchema {
    /// score, matchLevel, breakdown, keywords, flags, plan, summary.
    V1,
    /// V1 plus candidateLevel and estimatedSalaryRange.
    #[default]
    V2,
}

#[derive(Debug, Error)]
#[error("unknown analysis schema version '{0}'")]
pub struct UnknownSchema(String);

impl FromStr for AnalysisSchema {
    type Err = UnknownSchema;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(AnalysisSchema::V1),
            "v2" | "2" => Ok(AnalysisSchema::V2),
            other => Err(UnknownSchema(other.to_string())),
        }
    }
}

impl fmt::Display for AnalysisSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisSchema::V1 => f.write_str("v1"),
            AnalysisSchema::V2 => f.write_str("v2"),
        }
    }
}
