// Prompt templates for the resume analysis call.
// The resume itself travels as an inline PDF attachment, never inside the text.

use crate::analysis::models::AnalysisSchema;
use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION};

/// Replace: {jd_text}, {json_only}, {schema}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are a Senior Technical Recruiter and ATS (Applicant Tracking System) Expert.

JOB DESCRIPTION:
{jd_text}

TASK:
Perform a deep-dive analysis of the attached PDF resume against the job description.

CRITICAL INSTRUCTION:
{json_only}

ANALYSIS GUIDELINES:
1. Be strict but constructive.
2. Distinguish between missing hard skills (tools, languages, frameworks) and soft skills.
3. Check formatting (is it readable? professional? parseable by an ATS?).
4. Look for "Impact" - does the candidate use numbers/metrics or just generic descriptions?

JSON SCHEMA (return exactly these fields, nothing else):
{schema}"#;

const SCHEMA_V1: &str = r#"{
  "score": integer (0-100),
  "matchLevel": "Low" | "Medium" | "High",
  "breakdown": {
    "skillsMatch": integer (0-100),
    "experienceMatch": integer (0-100),
    "formatting": integer (0-100)
  },
  "missingKeywords": {
    "hardSkills": ["tool1", "language1"],
    "softSkills": ["communication", "leadership"]
  },
  "redFlags": ["typo in header", "employment gap without explanation", "generic summary"],
  "actionPlan": [
    "Specific advice 1 (e.g., Move Skills section to top)",
    "Specific advice 2 (e.g., Quantify your sales achievement)"
  ],
  "summaryProfile": "A 1-sentence summary of who this candidate seems to be (e.g., 'A Junior React Dev with strong potential but lacks AWS experience')."
}"#;

const SCHEMA_V2: &str = r#"{
  "score": integer (0-100),
  "matchLevel": "Low" | "Medium" | "High",
  "candidateLevel": "Junior" | "Mid-Level" | "Senior" | "Lead",
  "estimatedSalaryRange": "string (e.g., '$90k - $110k', based on the role, level and location)",
  "breakdown": {
    "skillsMatch": integer (0-100),
    "experienceMatch": integer (0-100),
    "formatting": integer (0-100)
  },
  "missingKeywords": {
    "hardSkills": ["tool1", "language1"],
    "softSkills": ["communication", "leadership"]
  },
  "redFlags": ["typo in header", "employment gap without explanation", "generic summary"],
  "actionPlan": [
    "Specific advice 1 (e.g., Move Skills section to top)",
    "Specific advice 2 (e.g., Quantify your sales achievement)"
  ],
  "summaryProfile": "A 1-sentence summary of who this candidate seems to be (e.g., 'A Junior React Dev with strong potential but lacks AWS experience')."
}"#;

fn schema_directive(schema: AnalysisSchema) -> &'static str {
    match schema {
        AnalysisSchema::V1 => SCHEMA_V1,
        AnalysisSchema::V2 => SCHEMA_V2,
    }
}

/// Builds the analysis instruction for `jd_text` under the given output schema.
pub fn build_analysis_prompt(jd_text: &str, schema: AnalysisSchema) -> String {
    render(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("schema", schema_directive(schema)),
            ("jd_text", jd_text.trim()),
        ],
    )
}
