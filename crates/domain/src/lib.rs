// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rules for van-trip ticketing.
//!
//! Everything in this crate is pure: fares, status lifecycles, seat
//! occupancy and input validation. Storage and transport live elsewhere.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

mod error;
mod fare;
mod occupancy;
mod qr;
mod ticket_number;
mod ticket_status;
mod trip_status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use fare::{CLASSIFICATION_DISCOUNT, FareBreakdown, REGULAR_FARE, TRANSACTION_FEE, compute_fare};
pub use occupancy::{SeatOccupancy, derive_occupancy};
pub use qr::{DEFAULT_QR_SERVICE_URL, DEFAULT_QR_SIZE, QrPayload, qr_image_url};
pub use ticket_number::{format_ticket_number, is_well_formed_ticket_number};
pub use ticket_status::{PaymentStatus, StatusChange, TicketStatus, plan_status_change};
pub use trip_status::TripStatus;
pub use types::{AgeInput, Money, PassengerDetails, PassengerType, PaymentMethod, VanStatus};
pub use validation::{
    MAX_VAN_CAPACITY, format_time_of_day, format_trip_date, normalize_driver,
    normalize_plate_number, parse_age, parse_time_of_day, parse_trip_date,
    seat_numbers_for_capacity, validate_capacity, validate_passenger_details, validate_route_fields,
    validate_schedule, validate_van_model,
};
