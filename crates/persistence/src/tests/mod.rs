// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

#[cfg(feature = "mysql")]
mod backend_validation_tests;
mod fleet_tests;
mod initialization_tests;

use vantrip_domain::{PassengerType, PaymentStatus, TicketStatus, VanStatus, compute_fare};

use crate::{NewTicket, NewTripData, RouteFields, SqlitePersistence, VanFields};

pub fn create_test_route(persistence: &mut SqlitePersistence) -> i64 {
    persistence
        .create_route(&RouteFields {
            origin: String::from("Tacloban"),
            destination: String::from("Ormoc"),
            name: String::from("Tacloban - Ormoc"),
        })
        .expect("Failed to create route")
}

pub fn test_van_fields(plate_number: &str, capacity: u8, route_id: Option<i64>) -> VanFields {
    VanFields {
        plate_number: plate_number.to_string(),
        capacity,
        model: String::from("Toyota Hiace"),
        status: VanStatus::Active,
        route_id,
    }
}

pub fn create_test_van(persistence: &mut SqlitePersistence, capacity: u8, route_id: i64) -> i64 {
    persistence
        .create_van(&test_van_fields("ABC 1234", capacity, Some(route_id)))
        .expect("Failed to create van")
}

pub fn test_trip_data(van_id: i64, route_id: i64, trip_date: &str) -> NewTripData {
    NewTripData {
        van_id,
        route_id,
        trip_date: trip_date.to_string(),
        departure_time: String::from("08:00"),
        arrival_time: Some(String::from("10:30")),
        driver_name: Some(String::from("Juan Dela Cruz")),
        driver_phone: Some(String::from("09171234567")),
    }
}

/// Creates a route, a van with `capacity` seats and one trip on it.
///
/// Returns `(persistence, route_id, van_id, trip_id)`.
pub fn setup_trip(capacity: u8) -> (SqlitePersistence, i64, i64, i64) {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let route_id = create_test_route(&mut persistence);
    let van_id = create_test_van(&mut persistence, capacity, route_id);
    let trip_id = persistence
        .create_trip(&test_trip_data(van_id, route_id, "2026-03-14"))
        .expect("Failed to create trip");
    (persistence, route_id, van_id, trip_id)
}

/// Returns the ID of the van seat with the given number.
pub fn seat_id(persistence: &mut SqlitePersistence, van_id: i64, seat_number: &str) -> i64 {
    persistence
        .list_seats(van_id)
        .unwrap()
        .into_iter()
        .find(|seat| seat.seat_number == seat_number)
        .map(|seat| seat.seat_id)
        .expect("Seat not found")
}

pub fn test_ticket(
    ticket_number: &str,
    trip_id: i64,
    seat_id: i64,
    payment_status: PaymentStatus,
) -> NewTicket {
    let fare = compute_fare(PassengerType::Student);
    NewTicket {
        ticket_number: ticket_number.to_string(),
        trip_id,
        seat_id,
        passenger_name: String::from("Maria Santos"),
        address: String::from("Real St, Tacloban"),
        age: 21,
        phone: String::from("09181234567"),
        emergency_contact: String::from("Ana Santos 09191234567"),
        passenger_type: PassengerType::Student.as_str().to_string(),
        payment_method: String::from("CASH"),
        regular_fare_cents: fare.regular_fare.cents(),
        transaction_fee_cents: fare.transaction_fee.cents(),
        discount_cents: fare.discount.cents(),
        total_fare_cents: fare.total_fare.cents(),
        payment_status: payment_status.as_str().to_string(),
        ticket_status: TicketStatus::Active.as_str().to_string(),
        qr_payload: format!("{{\"ticket_number\":\"{ticket_number}\"}}"),
        issued_by: None,
        created_at: String::from("2026-03-10T09:00:00Z"),
        updated_at: String::from("2026-03-10T09:00:00Z"),
    }
}
