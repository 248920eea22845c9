use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolterError {
    #[error("unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("Configuration error: {0}")]
    Config(String),
}
