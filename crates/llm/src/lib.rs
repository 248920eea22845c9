pub mod embedding;
pub mod generation;
pub mod provider;
pub mod providers;

pub use embedding::{Embedder, EmbeddingError, EmbeddingSimilarity};
pub use generation::{ProviderGenerator, UnconfiguredGenerator};
pub use provider::{LlmError, LlmProvider, Message, Role};
