// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use vantrip_domain::AgeInput;
use vantrip_persistence::SqlitePersistence;

use crate::{
    AuthenticatedAdmin, CreateTripRequest, IssueTicketRequest, QrSettings, RouteRequest,
    VanRequest, create_route, create_trip, create_van, list_van_seats,
};

/// A route, a van on it and one scheduled trip on 2026-03-14.
pub struct Fixture {
    pub persistence: SqlitePersistence,
    pub route_id: i64,
    pub van_id: i64,
    pub trip_id: i64,
}

pub fn create_test_admin() -> AuthenticatedAdmin {
    AuthenticatedAdmin::from_identity(Some("dispatcher1")).unwrap()
}

pub fn qr() -> QrSettings {
    QrSettings::default()
}

pub fn route_request() -> RouteRequest {
    RouteRequest {
        origin: String::from("Tacloban"),
        destination: String::from("Ormoc"),
        name: None,
    }
}

pub fn van_request(plate_number: &str, capacity: i64, route_id: Option<i64>) -> VanRequest {
    VanRequest {
        plate_number: plate_number.to_string(),
        capacity,
        model: String::from("Toyota Hiace"),
        status: None,
        route_id,
    }
}

pub fn trip_request(van_id: i64, trip_date: &str) -> CreateTripRequest {
    CreateTripRequest {
        van_id,
        route_id: None,
        trip_date: trip_date.to_string(),
        departure_time: String::from("08:00"),
        arrival_time: Some(String::from("10:30")),
        driver_name: Some(String::from("Juan Dela Cruz")),
        driver_phone: Some(String::from("09170000000")),
    }
}

pub fn setup_fixture(capacity: i64) -> Fixture {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let admin = create_test_admin();
    let route_id = create_route(&mut persistence, &route_request(), &admin)
        .unwrap()
        .route_id;
    let van_id = create_van(
        &mut persistence,
        &van_request("abc 1234", capacity, Some(route_id)),
        &admin,
    )
    .unwrap()
    .van_id;
    let trip_id = create_trip(&mut persistence, &trip_request(van_id, "2026-03-14"), &admin)
        .unwrap()
        .trip_id;

    Fixture {
        persistence,
        route_id,
        van_id,
        trip_id,
    }
}

pub fn seat_id(persistence: &mut SqlitePersistence, van_id: i64, seat_number: &str) -> i64 {
    list_van_seats(persistence, van_id, &create_test_admin())
        .unwrap()
        .seats
        .into_iter()
        .find(|s| s.seat_number == seat_number)
        .unwrap()
        .seat_id
}

pub fn student_request(seat_id: i64) -> IssueTicketRequest {
    IssueTicketRequest {
        seat_id: Some(seat_id),
        passenger_name: String::from("Maria Santos"),
        address: String::from("Brgy. 12, Palo, Leyte"),
        age: Some(AgeInput::Number(20)),
        phone: String::from("09171234567"),
        emergency_contact: String::from("Jose Santos 09181234567"),
        passenger_type: String::from("STUDENT"),
        payment_method: String::from("cash"),
        payment_status: None,
    }
}
