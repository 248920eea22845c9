pub mod cache;
pub mod ollama;
pub mod openai;
pub mod similarity;
pub mod traits;

pub use cache::EmbeddingCache;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use similarity::{cosine_similarity, create_similarity, EmbeddingSimilarity};
pub use traits::{Embedder, EmbeddingError};
