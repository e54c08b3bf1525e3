// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API error types and translation from domain and persistence errors.

use tracing::error;
use vantrip_domain::DomainError;
use vantrip_persistence::PersistenceError;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No usable administrator identity was supplied.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are the only errors callers of this crate see. Domain and
/// persistence failures are translated explicitly and never leak through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request conflicts with the current state (seat taken, duplicate,
    /// still referenced, or changed concurrently).
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
        }
    }
}

fn invalid(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// Malformed input becomes `InvalidInput` naming the offending field, seat
/// clashes become `Conflict`, and lifecycle or booking rules become
/// `DomainRuleViolation`.
#[must_use]
#[allow(clippy::needless_pass_by_value)]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::InvalidPassengerType(_) => invalid("passenger_type", &err),
        DomainError::MissingPassengerField { field } => invalid(field, &err),
        DomainError::InvalidAge(_) => invalid("age", &err),
        DomainError::InvalidPaymentMethod(_) => invalid("payment_method", &err),
        DomainError::InvalidTicketStatus { .. } => invalid("ticket_status", &err),
        DomainError::InvalidPaymentStatus { .. }
        | DomainError::PaymentStatusOverrideNotAllowed => invalid("payment_status", &err),
        DomainError::InvalidTripStatus { .. }
        | DomainError::InvalidVanStatus { .. }
        | DomainError::NoStatusChange => invalid("status", &err),
        DomainError::InvalidCapacity { .. } => invalid("capacity", &err),
        DomainError::InvalidPlateNumber(_) => invalid("plate_number", &err),
        DomainError::InvalidVanModel(_) => invalid("model", &err),
        DomainError::InvalidRoute(_) => invalid("route", &err),
        DomainError::InvalidDriver(_) => invalid("driver", &err),
        DomainError::DateParseError { .. } => invalid("trip_date", &err),
        DomainError::TimeParseError { .. } => invalid("time", &err),
        DomainError::ArrivalBeforeDeparture { .. } => invalid("arrival_time", &err),
        DomainError::InvalidStatusTransition { axis, .. } => ApiError::DomainRuleViolation {
            rule: format!("{axis}_status_transition"),
            message: err.to_string(),
        },
        DomainError::TripNotBookable { .. } => ApiError::DomainRuleViolation {
            rule: String::from("trip_bookable"),
            message: err.to_string(),
        },
        DomainError::VanNotActive { .. } => ApiError::DomainRuleViolation {
            rule: String::from("van_active"),
            message: err.to_string(),
        },
        DomainError::SeatUnavailable { .. } => ApiError::Conflict {
            message: err.to_string(),
        },
        DomainError::SeatNotOnTrip { .. } => ApiError::ResourceNotFound {
            resource_type: String::from("Seat"),
            message: err.to_string(),
        },
        DomainError::QrPayloadError(_) => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Constraint outcomes the caller can act on keep their meaning. Anything
/// else is an internal failure and is logged. A ticket number collision is
/// retried by issuance, so one that reaches here means the generator kept
/// colliding and is reported as internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::SeatAlreadyTaken { .. }
        | PersistenceError::UniqueViolation(_)
        | PersistenceError::Referenced { .. }
        | PersistenceError::ConcurrentModification(_) => ApiError::Conflict {
            message: err.to_string(),
        },
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: message
                .split_whitespace()
                .next()
                .unwrap_or("Resource")
                .to_string(),
            message,
        },
        other => {
            error!(error = %other, "Persistence failure");
            ApiError::Internal {
                message: other.to_string(),
            }
        }
    }
}
