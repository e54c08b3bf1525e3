// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::DatabaseErrorKind;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// A stored row could not be turned back into domain values.
    ReconstructionError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A live ticket already holds this seat on this trip.
    SeatAlreadyTaken { trip_id: i64, seat_id: i64 },
    /// The generated ticket number is already in use.
    DuplicateTicketNumber(String),
    /// A uniqueness constraint rejected the write.
    UniqueViolation(String),
    /// The row cannot be removed or reshaped while other rows reference it.
    Referenced {
        /// The kind of row being changed (route, van, trip).
        resource: &'static str,
        /// Its identifier.
        id: i64,
        /// What still references it.
        referenced_by: &'static str,
    },
    /// The row changed between read and compare-and-set update.
    ConcurrentModification(String),
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::ReconstructionError(msg) => write!(f, "Row reconstruction error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::SeatAlreadyTaken { trip_id, seat_id } => {
                write!(f, "Seat {seat_id} on trip {trip_id} is already taken")
            }
            Self::DuplicateTicketNumber(number) => {
                write!(f, "Ticket number {number} already exists")
            }
            Self::UniqueViolation(msg) => write!(f, "Uniqueness violation: {msg}"),
            Self::Referenced {
                resource,
                id,
                referenced_by,
            } => write!(
                f,
                "{resource} {id} cannot be changed: still referenced by {referenced_by}"
            ),
            Self::ConcurrentModification(msg) => write!(f, "Concurrent modification: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation(info.message().to_string())
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<vantrip_domain::DomainError> for PersistenceError {
    fn from(err: vantrip_domain::DomainError) -> Self {
        Self::ReconstructionError(err.to_string())
    }
}
