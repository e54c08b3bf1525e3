// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use vantrip_domain::{
    Money, PassengerType, PaymentStatus, SeatOccupancy, TicketStatus, TripStatus, VanStatus,
};

use crate::diesel_schema::{seats, ticket_status_history, tickets};

/// A stored route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteData {
    pub route_id: i64,
    pub origin: String,
    pub destination: String,
    pub name: String,
    pub created_at: String,
}

/// Fields for creating or replacing a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteFields {
    pub origin: String,
    pub destination: String,
    pub name: String,
}

/// A stored van.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VanData {
    pub van_id: i64,
    pub plate_number: String,
    pub capacity: u8,
    pub model: String,
    pub status: VanStatus,
    pub route_id: Option<i64>,
    pub created_at: String,
}

/// Fields for creating or replacing a van.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VanFields {
    pub plate_number: String,
    pub capacity: u8,
    pub model: String,
    pub status: VanStatus,
    pub route_id: Option<i64>,
}

/// A stored seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatData {
    pub seat_id: i64,
    pub van_id: i64,
    pub seat_number: String,
}

/// Insertable seat row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = seats)]
pub struct NewSeat {
    pub van_id: i64,
    pub seat_number: String,
}

/// A stored trip together with the figures derived from its van and
/// live tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripData {
    pub trip_id: i64,
    pub van_id: i64,
    pub plate_number: String,
    pub route_id: i64,
    pub route_name: String,
    pub origin: String,
    pub destination: String,
    /// ISO 8601 calendar date.
    pub trip_date: String,
    /// `HH:MM`.
    pub departure_time: String,
    pub arrival_time: Option<String>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub status: TripStatus,
    pub capacity: u8,
    /// Number of ACTIVE or USED tickets on this trip.
    pub live_tickets: i64,
    pub created_at: String,
}

impl TripData {
    /// Seats not held by a live ticket. Never stored.
    #[must_use]
    pub fn available_seats(&self) -> i64 {
        (i64::from(self.capacity) - self.live_tickets).max(0)
    }
}

/// Fields for scheduling a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTripData {
    pub van_id: i64,
    pub route_id: i64,
    pub trip_date: String,
    pub departure_time: String,
    pub arrival_time: Option<String>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
}

/// Optional filters for listing trips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripFilter {
    pub trip_date: Option<String>,
    pub route_id: Option<i64>,
}

/// Occupancy of one seat on one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAvailabilityData {
    pub seat_id: i64,
    pub seat_number: String,
    pub occupancy: SeatOccupancy,
    /// Number of the live ticket holding the seat, if any.
    pub ticket_number: Option<String>,
}

/// Statuses of the live ticket on a `(trip, seat)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveTicketData {
    pub ticket_id: i64,
    pub ticket_number: String,
    pub ticket_status: TicketStatus,
    pub payment_status: PaymentStatus,
}

/// Insertable ticket row.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = tickets)]
pub struct NewTicket {
    pub ticket_number: String,
    pub trip_id: i64,
    pub seat_id: i64,
    pub passenger_name: String,
    pub address: String,
    pub age: i32,
    pub phone: String,
    pub emergency_contact: String,
    pub passenger_type: String,
    pub payment_method: String,
    pub regular_fare_cents: i64,
    pub transaction_fee_cents: i64,
    pub discount_cents: i64,
    pub total_fare_cents: i64,
    pub payment_status: String,
    pub ticket_status: String,
    pub qr_payload: String,
    pub issued_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A stored ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketData {
    pub ticket_id: i64,
    pub ticket_number: String,
    pub trip_id: i64,
    pub seat_id: i64,
    pub seat_number: String,
    pub passenger_name: String,
    pub address: String,
    pub age: u8,
    pub phone: String,
    pub emergency_contact: String,
    pub passenger_type: PassengerType,
    pub payment_method: String,
    pub regular_fare: Money,
    pub transaction_fee: Money,
    pub discount: Money,
    pub total_fare: Money,
    pub payment_status: PaymentStatus,
    pub ticket_status: TicketStatus,
    pub qr_payload: String,
    pub issued_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Insertable status history row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ticket_status_history)]
pub struct NewTicketStatusHistory {
    pub ticket_id: i64,
    pub previous_ticket_status: String,
    pub new_ticket_status: String,
    pub previous_payment_status: String,
    pub new_payment_status: String,
    pub changed_by: String,
    pub changed_at: String,
    pub note: Option<String>,
}

/// A recorded administrative status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStatusHistoryData {
    pub history_id: i64,
    pub ticket_id: i64,
    pub previous_ticket_status: TicketStatus,
    pub new_ticket_status: TicketStatus,
    pub previous_payment_status: PaymentStatus,
    pub new_payment_status: PaymentStatus,
    pub changed_by: String,
    pub changed_at: String,
    pub note: Option<String>,
}
