use thiserror::Error;

/// Main error type for model construction
#[derive(Error, Debug)]
pub enum NavError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    // Numeric errors
    #[error("Numeric degeneracy on {axis} axis: {context}")]
    NumericDegeneracy { axis: &'static str, context: String },

    /// Composite candidate has no exact member in the grid. Fatal for a build.
    #[error("Quantization failed, no grid state matches {candidate}")]
    Quantization { candidate: String },

    #[error("Index out of range: {kind} {index} (len {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for NavError
pub type Result<T> = std::result::Result<T, NavError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantization_names_candidate() {
        let err = NavError::Quantization {
            candidate: "dg: 0.1".to_string(),
        };
        assert!(err.to_string().contains("dg: 0.1"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: NavError = config::ConfigError::Message("bad level".to_string()).into();
        assert!(matches!(err, NavError::Config(_)));
    }
}
