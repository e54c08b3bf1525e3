// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Request fields that a client may omit are `Option` or defaulted so that
//! a missing value reaches validation and is reported against its field.

use vantrip_domain::{AgeInput, Money};

// ============================================================================
// Fares
// ============================================================================

/// API response for a fare quote.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FareQuoteResponse {
    /// The normalized passenger classification.
    pub passenger_type: String,
    pub regular_fare: Money,
    pub transaction_fee: Money,
    pub discount: Money,
    pub total_fare: Money,
}

// ============================================================================
// Trips
// ============================================================================

/// API request to list trips.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListTripsRequest {
    /// Only trips on this date (`YYYY-MM-DD`).
    pub date: Option<String>,
    /// Only trips on this route.
    pub route_id: Option<i64>,
}

/// Information about a trip.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TripInfo {
    pub trip_id: i64,
    pub van_id: i64,
    pub plate_number: String,
    pub route_id: i64,
    pub route_name: String,
    pub origin: String,
    pub destination: String,
    pub trip_date: String,
    pub departure_time: String,
    pub arrival_time: Option<String>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub status: String,
    pub capacity: u8,
    /// Seats not held by an active or used ticket.
    pub available_seats: i64,
}

/// API response for listing trips.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListTripsResponse {
    pub trips: Vec<TripInfo>,
}

/// API request to schedule a trip.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateTripRequest {
    pub van_id: i64,
    /// Defaults to the van's assigned route.
    #[serde(default)]
    pub route_id: Option<i64>,
    pub trip_date: String,
    pub departure_time: String,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub driver_phone: Option<String>,
}

/// API request to move a trip through its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateTripStatusRequest {
    pub status: String,
}

// ============================================================================
// Seats
// ============================================================================

/// Occupancy of one seat within a seat map.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeatInfo {
    pub seat_id: i64,
    pub seat_number: String,
    /// `available`, `pending` or `occupied`.
    pub occupancy: String,
    /// Only included in the admin view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_number: Option<String>,
}

/// API response for a trip's seat map.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeatMapResponse {
    pub trip_id: i64,
    pub capacity: u8,
    pub available_seats: i64,
    pub seats: Vec<SeatInfo>,
}

/// API response for a single seat availability check.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeatAvailabilityResponse {
    pub trip_id: i64,
    pub seat_id: i64,
    pub seat_number: String,
    pub occupancy: String,
    pub available: bool,
}

/// A seat of a van.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeatSummary {
    pub seat_id: i64,
    pub seat_number: String,
}

/// API response for listing a van's seats.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListSeatsResponse {
    pub van_id: i64,
    pub seats: Vec<SeatSummary>,
}

// ============================================================================
// Tickets
// ============================================================================

/// API request to issue a ticket for a seat on a trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct IssueTicketRequest {
    pub seat_id: Option<i64>,
    pub passenger_name: String,
    pub address: String,
    /// A number or a numeric string.
    pub age: Option<AgeInput>,
    pub phone: String,
    pub emergency_contact: String,
    /// `REGULAR`, `STUDENT`, `PWD` or `SENIOR_CITIZEN`.
    pub passenger_type: String,
    pub payment_method: String,
    /// Staff-assisted issuance only. Defaults to `PAID` for staff and is
    /// always `PENDING` for self-service.
    pub payment_status: Option<String>,
}

/// A ticket as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TicketInfo {
    pub ticket_number: String,
    pub trip_id: i64,
    pub seat_id: i64,
    pub seat_number: String,
    pub passenger_name: String,
    pub address: String,
    pub age: u8,
    pub phone: String,
    pub emergency_contact: String,
    pub passenger_type: String,
    pub payment_method: String,
    pub regular_fare: Money,
    pub transaction_fee: Money,
    pub discount: Money,
    pub total_fare: Money,
    pub payment_status: String,
    pub ticket_status: String,
    /// Compact JSON snapshot encoded in the QR code.
    pub qr_payload: String,
    /// Image URL that renders the QR code.
    pub qr_image_url: String,
    /// Admin who issued the ticket; absent for self-service.
    pub issued_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// API response for a successful ticket issuance.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IssueTicketResponse {
    pub ticket: TicketInfo,
    /// Seats still available on the trip after this issuance.
    pub available_seats: i64,
    pub message: String,
}

/// API response for public ticket verification.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TicketVerificationResponse {
    pub ticket_number: String,
    pub passenger_name: String,
    pub passenger_type: String,
    pub seat_number: String,
    pub trip_id: i64,
    pub route_name: String,
    pub trip_date: String,
    pub departure_time: String,
    pub total_fare: Money,
    pub ticket_status: String,
    pub payment_status: String,
    /// True when the ticket is active and paid.
    pub valid: bool,
    pub qr_image_url: String,
}

/// API request to change a ticket's status and/or payment status.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UpdateTicketStatusRequest {
    pub ticket_status: Option<String>,
    pub payment_status: Option<String>,
    /// Free-form remark stored with the history entry.
    pub note: Option<String>,
}

/// API response for a ticket status change.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateTicketStatusResponse {
    pub ticket: TicketInfo,
    pub message: String,
}

/// One recorded status change.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatusHistoryEntry {
    pub previous_ticket_status: String,
    pub new_ticket_status: String,
    pub previous_payment_status: String,
    pub new_payment_status: String,
    pub changed_by: String,
    pub changed_at: String,
    pub note: Option<String>,
}

/// API response for a ticket's status history.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TicketStatusHistoryResponse {
    pub ticket_number: String,
    pub entries: Vec<StatusHistoryEntry>,
}

/// API response for listing a trip's tickets.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListTicketsResponse {
    pub trip_id: i64,
    pub tickets: Vec<TicketInfo>,
}

// ============================================================================
// Fleet
// ============================================================================

/// API request to create or replace a route.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
    /// Defaults to `"<origin> - <destination>"`.
    #[serde(default)]
    pub name: Option<String>,
}

/// Information about a route.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RouteInfo {
    pub route_id: i64,
    pub origin: String,
    pub destination: String,
    pub name: String,
    pub created_at: String,
}

/// API response for listing routes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListRoutesResponse {
    pub routes: Vec<RouteInfo>,
}

/// API request to create or replace a van.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VanRequest {
    pub plate_number: String,
    pub capacity: i64,
    pub model: String,
    /// Defaults to `ACTIVE` on creation and to the current status on update.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub route_id: Option<i64>,
}

/// API request to change a van's operational status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateVanStatusRequest {
    pub status: String,
}

/// Information about a van.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VanInfo {
    pub van_id: i64,
    pub plate_number: String,
    pub capacity: u8,
    pub model: String,
    pub status: String,
    pub route_id: Option<i64>,
    pub created_at: String,
}

/// API response for listing vans.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListVansResponse {
    pub vans: Vec<VanInfo>,
}

/// API response for a successful deletion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeletedResponse {
    pub message: String,
}
