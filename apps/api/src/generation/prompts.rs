// Prompt templates for the auxiliary generation actions.

use crate::generation::models::{GenerateRequest, INTERVIEW_QUESTION_COUNT};
use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION, PLAIN_TEXT_INSTRUCTION};

/// Replace: {jd_text}, {current_text}, {plain_text}
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"Act as a Professional Resume Writer.
Rewrite the following resume summary to be more professional, impactful, and ATS-friendly.
Keep every fact from the current summary; do not invent experience, employers or metrics.

Target Job Description:
{jd_text}

Current Summary:
"{current_text}"

{plain_text}"#;

/// Replace: {count}, {jd_text}, {missing_skills}, {json_only}
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"Act as a Senior Technical Interviewer.
Based on the Job Description and the Candidate's gaps, generate exactly {count} specific technical interview questions and a brief tip on how to answer each one.

Job Description:
{jd_text}

Missing Skills: {missing_skills}

Output format (JSON array of exactly {count} objects, each with non-empty "question" and "tip"):
[
  { "question": "...", "tip": "..." },
  { "question": "...", "tip": "..." },
  { "question": "...", "tip": "..." }
]

{json_only}"#;

/// Builds the prompt for a generation action. Dispatch is exhaustive over the request kinds.
pub fn build_generation_prompt(request: &GenerateRequest) -> String {
    match request {
        GenerateRequest::Rewrite(ctx) => render(
            REWRITE_PROMPT_TEMPLATE,
            &[
                ("plain_text", PLAIN_TEXT_INSTRUCTION),
                ("current_text", ctx.current_text.trim()),
                ("jd_text", ctx.jd.trim()),
            ],
        ),
        GenerateRequest::Interview(ctx) => {
            // Serialized as a JSON array so skill names with commas stay intact.
            let skills = serde_json::to_string(ctx.missing_keywords.hard_skills())
                .unwrap_or_else(|_| "[]".to_string());
            let count = INTERVIEW_QUESTION_COUNT.to_string();
            render(
                INTERVIEW_PROMPT_TEMPLATE,
                &[
                    ("count", count.as_str()),
                    ("json_only", JSON_ONLY_INSTRUCTION),
                    ("missing_skills", skills.as_str()),
                    ("jd_text", ctx.jd.trim()),
                ],
            )
        }
    }
}
