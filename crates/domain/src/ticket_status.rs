// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket and payment status lifecycles.
//!
//! A ticket moves along two independent axes. The ticket axis tracks
//! whether the seat is still held; the payment axis tracks money. Each axis
//! has its own transition table and every change is administrator-initiated;
//! nothing expires on a timer.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle of the seat reservation itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Issued and holding the seat.
    Active,
    /// Passenger boarded.
    Used,
    /// Voided before travel; the seat is released.
    Cancelled,
    /// Not used in time; the seat is released.
    Expired,
}

impl TicketStatus {
    /// Returns the persisted representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Used => "USED",
            Self::Cancelled => "CANCELLED",
            Self::Expired => "EXPIRED",
        }
    }

    /// Returns true if a ticket in this status holds its seat.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Active | Self::Used)
    }

    /// Returns true if this status is terminal (cannot transition to another state).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Used | Self::Cancelled | Self::Expired)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                axis: "ticket",
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        let valid: bool = match self {
            Self::Active => matches!(new_status, Self::Used | Self::Cancelled | Self::Expired),
            Self::Used | Self::Cancelled | Self::Expired => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                axis: "ticket",
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by ticket lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "USED" => Ok(Self::Used),
            "CANCELLED" => Ok(Self::Cancelled),
            "EXPIRED" => Ok(Self::Expired),
            _ => Err(DomainError::InvalidTicketStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle of the payment attached to a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Awaiting payment.
    Pending,
    /// Settled.
    Paid,
    /// Payment attempt failed; may be retried.
    Failed,
    /// Money returned to the passenger.
    Refunded,
}

impl PaymentStatus {
    /// Returns the persisted representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Failed => "FAILED",
            Self::Refunded => "REFUNDED",
        }
    }

    /// Returns true if this status is terminal (cannot transition to another state).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Refunded)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                axis: "payment",
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        let valid: bool = match self {
            Self::Pending => matches!(new_status, Self::Paid | Self::Failed),
            Self::Failed => matches!(new_status, Self::Pending | Self::Paid),
            Self::Paid => matches!(new_status, Self::Refunded),
            Self::Refunded => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                axis: "payment",
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by payment lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            "FAILED" => Ok(Self::Failed),
            "REFUNDED" => Ok(Self::Refunded),
            _ => Err(DomainError::InvalidPaymentStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated change to one or both status axes of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub previous_ticket_status: TicketStatus,
    pub new_ticket_status: TicketStatus,
    pub previous_payment_status: PaymentStatus,
    pub new_payment_status: PaymentStatus,
}

impl StatusChange {
    /// Returns true if the ticket axis changes.
    #[must_use]
    pub fn changes_ticket_status(&self) -> bool {
        self.previous_ticket_status != self.new_ticket_status
    }

    /// Returns true if the payment axis changes.
    #[must_use]
    pub fn changes_payment_status(&self) -> bool {
        self.previous_payment_status != self.new_payment_status
    }
}

/// Plans a status update against the ticket's current statuses.
///
/// Requesting the current value on an axis is a no-op for that axis. At
/// least one axis must actually change.
///
/// # Errors
///
/// Returns an error if neither axis changes or if either requested
/// transition is not permitted.
pub fn plan_status_change(
    current_ticket: TicketStatus,
    current_payment: PaymentStatus,
    requested_ticket: Option<TicketStatus>,
    requested_payment: Option<PaymentStatus>,
) -> Result<StatusChange, DomainError> {
    let new_ticket_status: TicketStatus = requested_ticket.unwrap_or(current_ticket);
    let new_payment_status: PaymentStatus = requested_payment.unwrap_or(current_payment);

    if new_ticket_status == current_ticket && new_payment_status == current_payment {
        return Err(DomainError::NoStatusChange);
    }

    if new_ticket_status != current_ticket {
        current_ticket.validate_transition(new_ticket_status)?;
    }
    if new_payment_status != current_payment {
        current_payment.validate_transition(new_payment_status)?;
    }

    Ok(StatusChange {
        previous_ticket_status: current_ticket,
        new_ticket_status,
        previous_payment_status: current_payment,
        new_payment_status,
    })
}
