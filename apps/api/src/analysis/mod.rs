// Career analyses: resume, LinkedIn profile, GitHub profile, GitHub repository.
// Every kind runs through pipeline::run_analysis; all LLM calls go through
// llm_client via the Analyzer trait.

pub mod analyzer;
pub mod charts;
pub mod decode;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod scoring;
pub mod validation;
