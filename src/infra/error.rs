use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("database {operation} failed: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl InfraError {
    /// `operation` names the pool-level step (`connect`, `migrate`, `health_check`).
    pub fn database(operation: &'static str, err: impl fmt::Display) -> Self {
        Self::Database {
            operation,
            message: err.to_string(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_name_the_failed_step() {
        let error = InfraError::database("connect", "connection refused");
        assert_eq!(
            error.to_string(),
            "database connect failed: connection refused"
        );
    }
}
