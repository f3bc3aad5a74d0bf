// Copyright 2023 Remi Bernotavicius

use crate::validation::FieldErrors;
use diesel::result::DatabaseErrorKind;
use std::fmt::Display;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{kind} with id {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{0}")]
    Validation(#[from] FieldErrors),

    /// The request could not be parsed into the expected shape.
    #[error("{0}")]
    Rejected(String),

    /// A uniqueness, check, or foreign key constraint would be violated.
    #[error("{0}")]
    Conflict(String),

    /// Deletion blocked because other rows still reference the target.
    #[error("{0}")]
    InUse(String),

    /// Well-formed, but the stored data cannot answer it (e.g. no conversion path).
    #[error("{0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(diesel::result::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn not_found(kind: &'static str, id: impl Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::Conflict(detail.into())
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(error: diesel::result::Error) -> Self {
        use diesel::result::Error::DatabaseError;

        match error {
            DatabaseError(
                kind @ (DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::NotNullViolation),
                info,
            ) => Self::Conflict(format!(
                "Integrity constraint violated ({kind:?}): {}",
                info.message()
            )),
            other => Self::Database(other),
        }
    }
}
