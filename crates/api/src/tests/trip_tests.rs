// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use vantrip_persistence::SqlitePersistence;

use crate::tests::helpers::{
    create_test_admin, qr, seat_id, setup_fixture, student_request, trip_request, van_request,
};
use crate::{
    ApiError, ListTripsRequest, UpdateTripStatusRequest, UpdateVanStatusRequest, create_trip,
    create_van, delete_trip, get_trip, issue_ticket, list_trips, set_van_status,
    update_trip_status,
};

fn set_status(
    persistence: &mut SqlitePersistence,
    trip_id: i64,
    status: &str,
) -> Result<crate::TripInfo, ApiError> {
    update_trip_status(
        persistence,
        trip_id,
        &UpdateTripStatusRequest {
            status: status.to_string(),
        },
        &create_test_admin(),
    )
}

#[test]
fn test_created_trip_uses_van_route_and_full_capacity() {
    let mut fx = setup_fixture(12);
    let trip = get_trip(&mut fx.persistence, fx.trip_id).unwrap();

    assert_eq!(trip.route_id, fx.route_id);
    assert_eq!(trip.route_name, "Tacloban - Ormoc");
    assert_eq!(trip.plate_number, "ABC 1234");
    assert_eq!(trip.status, "SCHEDULED");
    assert_eq!(trip.available_seats, 12);
    assert_eq!(trip.departure_time, "08:00");
    assert_eq!(trip.arrival_time.as_deref(), Some("10:30"));
}

#[test]
fn test_trip_times_are_normalized() {
    let mut fx = setup_fixture(12);
    let mut request = trip_request(fx.van_id, "2026-03-15");
    request.departure_time = String::from("07:05:00");
    request.arrival_time = None;

    let trip = create_trip(&mut fx.persistence, &request, &create_test_admin()).unwrap();
    assert_eq!(trip.departure_time, "07:05");
    assert_eq!(trip.arrival_time, None);
}

#[test]
fn test_arrival_before_departure_is_invalid() {
    let mut fx = setup_fixture(12);
    let mut request = trip_request(fx.van_id, "2026-03-15");
    request.arrival_time = Some(String::from("07:00"));

    assert!(matches!(
        create_trip(&mut fx.persistence, &request, &create_test_admin()),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "arrival_time"
    ));
}

#[test]
fn test_malformed_date_is_invalid() {
    let mut fx = setup_fixture(12);
    let request = trip_request(fx.van_id, "14/03/2026");

    assert!(matches!(
        create_trip(&mut fx.persistence, &request, &create_test_admin()),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "trip_date"
    ));
}

#[test]
fn test_van_in_maintenance_cannot_be_scheduled() {
    let mut fx = setup_fixture(12);
    let admin = create_test_admin();
    set_van_status(
        &mut fx.persistence,
        fx.van_id,
        &UpdateVanStatusRequest {
            status: String::from("MAINTENANCE"),
        },
        &admin,
    )
    .unwrap();

    let result = create_trip(
        &mut fx.persistence,
        &trip_request(fx.van_id, "2026-03-15"),
        &admin,
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "van_active"
    ));
}

#[test]
fn test_van_without_route_needs_explicit_route() {
    let mut fx = setup_fixture(12);
    let admin = create_test_admin();
    let van_id = create_van(&mut fx.persistence, &van_request("NEW 1", 8, None), &admin)
        .unwrap()
        .van_id;

    let mut request = trip_request(van_id, "2026-03-14");
    assert!(matches!(
        create_trip(&mut fx.persistence, &request, &admin),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "route_id"
    ));

    request.route_id = Some(fx.route_id);
    assert_eq!(
        create_trip(&mut fx.persistence, &request, &admin)
            .unwrap()
            .capacity,
        8
    );
}

#[test]
fn test_same_van_same_day_conflicts() {
    let mut fx = setup_fixture(12);
    let result = create_trip(
        &mut fx.persistence,
        &trip_request(fx.van_id, "2026-03-14"),
        &create_test_admin(),
    );
    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_list_trips_filters_by_date_and_route() {
    let mut fx = setup_fixture(12);
    create_trip(
        &mut fx.persistence,
        &trip_request(fx.van_id, "2026-03-15"),
        &create_test_admin(),
    )
    .unwrap();

    let all = list_trips(&mut fx.persistence, &ListTripsRequest::default()).unwrap();
    assert_eq!(all.trips.len(), 2);

    let on_date = list_trips(
        &mut fx.persistence,
        &ListTripsRequest {
            date: Some(String::from("2026-03-14")),
            route_id: Some(fx.route_id),
        },
    )
    .unwrap();
    assert_eq!(on_date.trips.len(), 1);
    assert_eq!(on_date.trips[0].trip_id, fx.trip_id);

    assert!(matches!(
        list_trips(
            &mut fx.persistence,
            &ListTripsRequest {
                date: Some(String::from("tomorrow")),
                route_id: None,
            },
        ),
        Err(ApiError::InvalidInput { .. })
    ));
}

#[test]
fn test_trip_lifecycle() {
    let mut fx = setup_fixture(12);
    for status in ["BOARDING", "DEPARTED", "COMPLETED"] {
        assert_eq!(
            set_status(&mut fx.persistence, fx.trip_id, status)
                .unwrap()
                .status,
            status
        );
    }

    assert!(matches!(
        set_status(&mut fx.persistence, fx.trip_id, "CANCELLED"),
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "trip_status_transition"
    ));
}

#[test]
fn test_trip_cannot_skip_boarding_backwards() {
    let mut fx = setup_fixture(12);
    set_status(&mut fx.persistence, fx.trip_id, "BOARDING").unwrap();
    assert!(matches!(
        set_status(&mut fx.persistence, fx.trip_id, "SCHEDULED"),
        Err(ApiError::DomainRuleViolation { .. })
    ));
}

#[test]
fn test_trip_with_tickets_cannot_be_deleted() {
    let mut fx = setup_fixture(12);
    let seat = seat_id(&mut fx.persistence, fx.van_id, "01");
    issue_ticket(
        &mut fx.persistence,
        fx.trip_id,
        &student_request(seat),
        None,
        &qr(),
    )
    .unwrap();

    assert!(matches!(
        delete_trip(&mut fx.persistence, fx.trip_id, &create_test_admin()),
        Err(ApiError::Conflict { .. })
    ));
}

#[test]
fn test_empty_trip_is_deleted() {
    let mut fx = setup_fixture(12);
    delete_trip(&mut fx.persistence, fx.trip_id, &create_test_admin()).unwrap();
    assert!(matches!(
        get_trip(&mut fx.persistence, fx.trip_id),
        Err(ApiError::ResourceNotFound { .. })
    ));
}
