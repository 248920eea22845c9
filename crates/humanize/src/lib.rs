//! The humanizer: chunking, stochastic sentence enhancement, cleanup,
//! fidelity gating and the orchestrator tying them together.

pub mod chunker;
pub mod enhancer;
pub mod normalizer;
pub mod patterns;
pub mod pipeline;
pub mod prompt;
pub mod sentences;
pub mod standard;
pub mod validator;

pub use chunker::{chunk_text, ChunkConfig};
pub use enhancer::{EnhancerSettings, SentenceEnhancer};
pub use normalizer::Normalizer;
pub use pipeline::{ChunkOutcome, EnhancementResult, HumanizeError, HumanizeOutput, Humanizer};
pub use validator::FidelityValidator;
