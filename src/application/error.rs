use thiserror::Error;

use crate::{
    application::repos::RepoError, cache::CacheError, domain::error::DomainError,
    infra::error::InfraError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("backing store failure: {0}")]
    Repo(#[from] RepoError),
    #[error("cache failure: {0}")]
    Cache(#[from] CacheError),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// True for failures of a backing store or cache collaborator.
    ///
    /// Callers rendering a profile treat these as "section unavailable"
    /// rather than failing the whole page.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            AppError::Repo(_) | AppError::Cache(_) | AppError::Infra(InfraError::Database { .. })
        )
    }
}
