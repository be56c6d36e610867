// Resume analysis: multipart upload → Gemini with the PDF attached → strict AnalysisResult.

pub mod handlers;
pub mod models;
pub mod prompts;
