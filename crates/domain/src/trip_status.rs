// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Trip lifecycle.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle of a scheduled trip.
///
/// Trips advance `SCHEDULED → BOARDING → DEPARTED → COMPLETED` and may be
/// cancelled from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    #[default]
    Scheduled,
    Boarding,
    Departed,
    Completed,
    Cancelled,
}

impl TripStatus {
    /// Returns the persisted representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Boarding => "BOARDING",
            Self::Departed => "DEPARTED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns true if tickets may still be issued for a trip in this status.
    #[must_use]
    pub const fn accepts_bookings(&self) -> bool {
        matches!(self, Self::Scheduled | Self::Boarding)
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                axis: "trip",
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        let valid: bool = matches!(
            (self, new_status),
            (Self::Scheduled, Self::Boarding)
                | (Self::Boarding, Self::Departed)
                | (Self::Departed, Self::Completed)
                | (
                    Self::Scheduled | Self::Boarding | Self::Departed,
                    Self::Cancelled
                )
        );

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                axis: "trip",
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "trips only move forward one step or are cancelled".to_string(),
            })
        }
    }
}

impl FromStr for TripStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SCHEDULED" => Ok(Self::Scheduled),
            "BOARDING" => Ok(Self::Boarding),
            "DEPARTED" => Ok(Self::Departed),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidTripStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
