//! Centralized error types for n8n-values
//!
//! Uses thiserror for typed errors that can be matched on,
//! while still being compatible with anyhow for propagation.

use thiserror::Error;

/// Configuration errors raised while turning app inputs into chart values
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("PostgreSQL database configuration requires a valid pgbouncer_uri")]
    MissingPgbouncerUri,

    #[error("Invalid database configuration")]
    InvalidDatabase,

    #[error("Invalid connection string: {reason}")]
    InvalidConnectionString { reason: String },

    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Unknown preset: {name}")]
    UnknownPreset { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pgbouncer_error_display() {
        let err = ConfigError::MissingPgbouncerUri;
        assert!(err.to_string().contains("requires a valid pgbouncer_uri"));
    }

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::InvalidValue {
            field: "min_replicas".to_string(),
            value: "12 > max_replicas 2".to_string(),
        };
        assert!(err.to_string().contains("min_replicas"));
    }
}
