//! Error taxonomy shared by every query and mutation.
//!
//! Store failures never cross into callers as raw [`DbErr`]s; they are
//! classified here into the kinds callers can act on.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("store unreachable: {0}")]
    Connectivity(String),

    #[error("store error: {0}")]
    Store(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        CoreError::NotFound { entity, id }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }

    /// Whether retrying the whole operation later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, CoreError::Connectivity(_))
    }
}

impl From<DbErr> for CoreError {
    fn from(err: DbErr) -> Self {
        if let Some(sql_err) = err.sql_err() {
            return match sql_err {
                SqlErr::UniqueConstraintViolation(detail) => {
                    CoreError::ConstraintViolation(format!("unique: {detail}"))
                }
                SqlErr::ForeignKeyConstraintViolation(detail) => {
                    CoreError::ConstraintViolation(format!("foreign key: {detail}"))
                }
                _ => CoreError::Store(err.to_string()),
            };
        }

        match err {
            DbErr::Conn(e) => CoreError::Connectivity(e.to_string()),
            DbErr::ConnectionAcquire(e) => CoreError::Connectivity(e.to_string()),
            DbErr::RecordNotFound(detail) => CoreError::Store(format!("record not found: {detail}")),
            other => CoreError::Store(other.to_string()),
        }
    }
}
