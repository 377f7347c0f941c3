//! Atomic attempt-or-rollback envelope around a single mutation.
//!
//! A [`MutationGuard`] starts `Pending` and ends in exactly one of
//! `Committed` or `RolledBack`. Validation runs before the store is touched;
//! the store work runs inside one transaction that is committed on success
//! and rolled back on any error, so no partial write survives a failure. The
//! transaction never outlives the call.

use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionError, TransactionTrait};
use serde::Serialize;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationState {
    Pending,
    Committed,
    RolledBack,
}

/// What a committed mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Affected {
    Created { id: i32 },
    Updated { id: i32 },
    /// `rows` includes rows removed by cascade.
    Deleted { id: i32, rows: u64 },
}

impl Affected {
    pub fn id(&self) -> i32 {
        match *self {
            Affected::Created { id } | Affected::Updated { id } | Affected::Deleted { id, .. } => id,
        }
    }
}

/// Final state of a guarded mutation.
#[derive(Debug)]
pub enum Outcome<T> {
    Committed(T),
    RolledBack(CoreError),
}

impl<T> Outcome<T> {
    pub fn state(&self) -> MutationState {
        match self {
            Outcome::Committed(_) => MutationState::Committed,
            Outcome::RolledBack(_) => MutationState::RolledBack,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, Outcome::Committed(_))
    }

    pub fn into_result(self) -> Result<T, CoreError> {
        match self {
            Outcome::Committed(v) => Ok(v),
            Outcome::RolledBack(e) => Err(e),
        }
    }
}

/// Boxed store work run inside the guard's transaction.
pub type TxnFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T, CoreError>> + Send + 'c>>;

pub struct MutationGuard<'a> {
    db: &'a DatabaseConnection,
    action: &'static str,
    state: MutationState,
}

impl<'a> MutationGuard<'a> {
    pub fn new(db: &'a DatabaseConnection, action: &'static str) -> Self {
        Self {
            db,
            action,
            state: MutationState::Pending,
        }
    }

    pub fn state(&self) -> MutationState {
        self.state
    }

    /// Run `op` on the validated input inside one transaction.
    ///
    /// A validation error rolls back without opening a transaction.
    pub async fn run<I, T, F>(mut self, validated: Result<I, CoreError>, op: F) -> Outcome<T>
    where
        I: Send + 'static,
        T: Send,
        F: for<'c> FnOnce(&'c DatabaseTransaction, I) -> TxnFuture<'c, T> + Send,
    {
        let input = match validated {
            Ok(input) => input,
            Err(e) => {
                tracing::info!(action = self.action, error = %e, "mutation rejected before store");
                return self.roll_back(e);
            }
        };

        let result = self
            .db
            .transaction::<_, T, CoreError>(move |txn| op(txn, input))
            .await;

        match result {
            Ok(value) => {
                self.state = MutationState::Committed;
                tracing::info!(action = self.action, "mutation committed");
                Outcome::Committed(value)
            }
            Err(TransactionError::Connection(db_err)) => self.roll_back(db_err.into()),
            Err(TransactionError::Transaction(e)) => self.roll_back(e),
        }
    }

    fn roll_back<T>(&mut self, err: CoreError) -> Outcome<T> {
        self.state = MutationState::RolledBack;
        match &err {
            CoreError::NotFound { .. } | CoreError::Validation(_) => {
                tracing::info!(action = self.action, error = %err, "mutation rolled back");
            }
            _ => {
                tracing::warn!(action = self.action, error = %err, "mutation rolled back");
            }
        }
        Outcome::RolledBack(err)
    }
}
