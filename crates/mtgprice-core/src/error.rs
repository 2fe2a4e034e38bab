use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read stores file {path}: {source}")]
    StoresFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse stores file: {0}")]
    StoresFileParse(#[from] serde_yaml::Error),

    #[error("store config validation failed: {0}")]
    Validation(String),
}

/// A request referenced a store identifier the registry does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown store: {0}")]
pub struct UnknownStoreError(pub String);
