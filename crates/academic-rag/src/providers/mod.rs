//! Provider abstractions for the vector index and the LLM
//!
//! Both collaborators are remote HTTP services; the traits allow tests and
//! alternative deployments to swap them out.

pub mod gemini;
pub mod llm;
pub mod remote_index;
pub mod vector_store;

pub use gemini::GeminiClient;
pub use llm::LlmProvider;
pub use remote_index::RemoteIndexClient;
pub use vector_store::VectorStoreProvider;
