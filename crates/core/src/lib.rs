pub mod config;
pub mod document;
pub mod error;
pub mod services;

pub use config::Config;
pub use document::*;
pub use error::*;
pub use services::{GenerationService, ServiceError, SimilarityService};
