//! Persistence-layer notifications.
//!
//! The persistence layer fires these around record writes and session
//! transitions; plugins observe them and cannot change the outcome other
//! than by failing.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use datahub_core::result::AppResult;
use datahub_core::types::{DataDict, SessionId, TransactionId};

/// A record being written by the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEvent {
    /// Table (mapped class) the record belongs to.
    pub table: String,
    /// The record's column values.
    pub record: DataDict,
}

impl RecordEvent {
    /// Creates a record event.
    pub fn new(table: &str, record: DataDict) -> Self {
        Self {
            table: table.to_string(),
            record,
        }
    }
}

/// A database session transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    /// The session.
    pub session_id: SessionId,
    /// The transaction, when the event belongs to one.
    pub transaction_id: Option<TransactionId>,
    /// Records pending in the session (flush events only).
    #[serde(default)]
    pub pending: Vec<RecordEvent>,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
}

impl SessionEvent {
    /// Creates an event for the given session, stamped now.
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            transaction_id: None,
            pending: Vec::new(),
            occurred_at: Utc::now(),
        }
    }

    /// Sets the transaction.
    pub fn with_transaction(mut self, transaction_id: TransactionId) -> Self {
        self.transaction_id = Some(transaction_id);
        self
    }

    /// Sets the pending records.
    pub fn with_pending(mut self, pending: Vec<RecordEvent>) -> Self {
        self.pending = pending;
        self
    }
}

/// Observes record inserts, updates, and deletes.
pub trait Mapper: Send + Sync {
    /// Before a record is inserted.
    fn before_insert(&self, _event: &RecordEvent) -> AppResult<()> {
        Ok(())
    }

    /// Before a record is updated.
    fn before_update(&self, _event: &RecordEvent) -> AppResult<()> {
        Ok(())
    }

    /// Before a record is deleted.
    fn before_delete(&self, _event: &RecordEvent) -> AppResult<()> {
        Ok(())
    }

    /// After a record is inserted.
    fn after_insert(&self, _event: &RecordEvent) -> AppResult<()> {
        Ok(())
    }

    /// After a record is updated.
    fn after_update(&self, _event: &RecordEvent) -> AppResult<()> {
        Ok(())
    }

    /// After a record is deleted.
    fn after_delete(&self, _event: &RecordEvent) -> AppResult<()> {
        Ok(())
    }
}

/// Observes database session transitions.
pub trait Session: Send + Sync {
    /// A transaction has begun.
    fn after_begin(&self, _event: &SessionEvent) -> AppResult<()> {
        Ok(())
    }

    /// Pending records are about to be flushed.
    fn before_flush(&self, _event: &SessionEvent) -> AppResult<()> {
        Ok(())
    }

    /// Pending records were flushed.
    fn after_flush(&self, _event: &SessionEvent) -> AppResult<()> {
        Ok(())
    }

    /// The transaction is about to commit.
    fn before_commit(&self, _event: &SessionEvent) -> AppResult<()> {
        Ok(())
    }

    /// The transaction committed.
    fn after_commit(&self, _event: &SessionEvent) -> AppResult<()> {
        Ok(())
    }

    /// The transaction rolled back.
    fn after_rollback(&self, _event: &SessionEvent) -> AppResult<()> {
        Ok(())
    }
}

/// What happened to a domain object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainOperation {
    /// The object was created.
    New,
    /// The object was changed.
    Changed,
    /// The object was deleted.
    Deleted,
}

impl fmt::Display for DomainOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Changed => write!(f, "changed"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// Receives notification of new, changed, and deleted domain objects.
pub trait DomainObjectModification: Send + Sync {
    /// Called while the change is still inside its transaction.
    fn notify(&self, _entity: &DataDict, _operation: DomainOperation) -> AppResult<()> {
        Ok(())
    }

    /// Called once the change has been committed.
    fn notify_after_commit(&self, _entity: &DataDict, _operation: DomainOperation) -> AppResult<()> {
        Ok(())
    }
}

/// Receives notification of changed resource URLs.
pub trait ResourceUrlChange: Send + Sync {
    /// Called with the resource whose URL changed.
    fn notify(&self, _resource: &DataDict) -> AppResult<()> {
        Ok(())
    }
}
