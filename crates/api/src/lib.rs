// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for van-trip ticketing.
//!
//! Handlers here are synchronous and transport-agnostic: they validate
//! requests, apply domain rules, call into persistence and translate every
//! failure into an [`ApiError`]. The HTTP server maps those onto status
//! codes.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

mod auth;
mod error;
mod handlers;
mod request_response;
mod settings;

#[cfg(test)]
mod tests;

pub use auth::AuthenticatedAdmin;
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use handlers::{
    MAX_TICKET_NUMBER_ATTEMPTS, check_seat_availability, create_route, create_trip, create_van,
    delete_route, delete_trip, delete_van, get_route, get_seat_map, get_ticket_status_history,
    get_trip, get_van, issue_ticket, list_routes, list_trip_tickets, list_trips, list_van_seats,
    list_vans, quote_fare, set_van_status, update_route, update_ticket_status, update_trip_status,
    update_van, verify_ticket,
};
pub use request_response::{
    CreateTripRequest, DeletedResponse, FareQuoteResponse, IssueTicketRequest, IssueTicketResponse,
    ListRoutesResponse, ListSeatsResponse, ListTicketsResponse, ListTripsRequest,
    ListTripsResponse, ListVansResponse, RouteInfo, RouteRequest, SeatAvailabilityResponse,
    SeatInfo, SeatMapResponse, SeatSummary, StatusHistoryEntry, TicketInfo,
    TicketStatusHistoryResponse, TicketVerificationResponse, TripInfo, UpdateTicketStatusRequest,
    UpdateTicketStatusResponse, UpdateTripStatusRequest, UpdateVanStatusRequest, VanInfo,
    VanRequest,
};
pub use settings::QrSettings;
