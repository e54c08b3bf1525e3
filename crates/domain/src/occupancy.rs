// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seat occupancy derivation.
//!
//! Occupancy is never stored. It is derived from the single live ticket
//! (ACTIVE or USED) on a `(trip, seat)` pair, if there is one.

use crate::ticket_status::{PaymentStatus, TicketStatus};
use serde::{Deserialize, Serialize};

/// What a passenger sees when picking a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatOccupancy {
    /// No live ticket.
    Available,
    /// Held by an active ticket whose payment has not settled.
    Pending,
    /// Held by a paid ticket or a passenger who already boarded.
    Occupied,
}

impl SeatOccupancy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Pending => "pending",
            Self::Occupied => "occupied",
        }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl std::fmt::Display for SeatOccupancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derives occupancy from the statuses of a seat's ticket.
///
/// Pass `None` when the seat has no ticket at all. A ticket that is not
/// live (cancelled or expired) leaves the seat available.
#[must_use]
pub fn derive_occupancy(ticket: Option<(TicketStatus, PaymentStatus)>) -> SeatOccupancy {
    match ticket {
        None => SeatOccupancy::Available,
        Some((ticket_status, _)) if !ticket_status.is_live() => SeatOccupancy::Available,
        Some((TicketStatus::Used, _)) => SeatOccupancy::Occupied,
        Some((_, PaymentStatus::Pending | PaymentStatus::Failed)) => SeatOccupancy::Pending,
        Some((_, PaymentStatus::Paid | PaymentStatus::Refunded)) => SeatOccupancy::Occupied,
    }
}
