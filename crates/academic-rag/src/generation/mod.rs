//! Answer generation: prompt assembly and query orchestration

pub mod pipeline;
pub mod prompt;

pub use pipeline::QueryPipeline;
pub use prompt::{PromptBuilder, NO_CONTEXT_PLACEHOLDER};
