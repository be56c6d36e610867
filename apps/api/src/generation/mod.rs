// Auxiliary generation actions: summary rewrite and interview questions.
// All LLM calls go through llm_client; no direct Gemini calls here.

pub mod handlers;
pub mod models;
pub mod prompts;
