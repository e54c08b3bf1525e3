// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use vantrip_domain::{PaymentStatus, VanStatus};

use crate::tests::{
    create_test_route, create_test_van, seat_id, setup_trip, test_ticket, test_van_fields,
};
use crate::{PersistenceError, RouteFields, SqlitePersistence};

#[test]
fn test_create_and_get_route() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let route_id = create_test_route(&mut persistence);

    let route = persistence.get_route(route_id).unwrap().unwrap();
    assert_eq!(route.origin, "Tacloban");
    assert_eq!(route.destination, "Ormoc");
    assert_eq!(route.name, "Tacloban - Ormoc");
    assert!(!route.created_at.is_empty());
}

#[test]
fn test_get_missing_route_returns_none() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    assert!(persistence.get_route(42).unwrap().is_none());
}

#[test]
fn test_update_route() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let route_id = create_test_route(&mut persistence);

    persistence
        .update_route(
            route_id,
            &RouteFields {
                origin: String::from("Tacloban"),
                destination: String::from("Catbalogan"),
                name: String::from("Tacloban - Catbalogan"),
            },
        )
        .unwrap();

    let route = persistence.get_route(route_id).unwrap().unwrap();
    assert_eq!(route.destination, "Catbalogan");
}

#[test]
fn test_update_missing_route_is_not_found() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let result = persistence.update_route(
        9,
        &RouteFields {
            origin: String::from("A"),
            destination: String::from("B"),
            name: String::from("A - B"),
        },
    );
    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_delete_unreferenced_route() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let route_id = create_test_route(&mut persistence);

    persistence.delete_route(route_id).unwrap();
    assert!(persistence.get_route(route_id).unwrap().is_none());
}

#[test]
fn test_delete_route_referenced_by_van_fails() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let route_id = create_test_route(&mut persistence);
    create_test_van(&mut persistence, 12, route_id);

    let result = persistence.delete_route(route_id);
    assert_eq!(
        result,
        Err(PersistenceError::Referenced {
            resource: "route",
            id: route_id,
            referenced_by: "vans or trips",
        })
    );
    assert!(persistence.get_route(route_id).unwrap().is_some());
}

#[test]
fn test_delete_missing_route_is_not_found() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    assert!(matches!(
        persistence.delete_route(3),
        Err(PersistenceError::NotFound(_))
    ));
}

#[test]
fn test_create_van_generates_seats() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let route_id = create_test_route(&mut persistence);
    let van_id = create_test_van(&mut persistence, 12, route_id);

    let van = persistence.get_van(van_id).unwrap().unwrap();
    assert_eq!(van.capacity, 12);
    assert_eq!(van.status, VanStatus::Active);
    assert_eq!(van.route_id, Some(route_id));

    let seats = persistence.list_seats(van_id).unwrap();
    let numbers: Vec<&str> = seats.iter().map(|s| s.seat_number.as_str()).collect();
    assert_eq!(numbers.len(), 12);
    assert_eq!(numbers.first(), Some(&"01"));
    assert_eq!(numbers.last(), Some(&"12"));
}

#[test]
fn test_create_van_without_route() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let van_id = persistence
        .create_van(&test_van_fields("XYZ 9876", 4, None))
        .unwrap();

    let van = persistence.get_van(van_id).unwrap().unwrap();
    assert_eq!(van.route_id, None);
}

#[test]
fn test_create_van_with_missing_route_fails() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let result = persistence.create_van(&test_van_fields("XYZ 9876", 4, Some(77)));

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
    assert!(persistence.list_vans().unwrap().is_empty());
}

#[test]
fn test_duplicate_plate_number_rejected() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let route_id = create_test_route(&mut persistence);
    create_test_van(&mut persistence, 12, route_id);

    let result = persistence.create_van(&test_van_fields("ABC 1234", 8, Some(route_id)));
    assert!(matches!(result, Err(PersistenceError::UniqueViolation(_))));
    assert_eq!(persistence.list_vans().unwrap().len(), 1);
}

#[test]
fn test_update_van_capacity_regenerates_seats() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let route_id = create_test_route(&mut persistence);
    let van_id = create_test_van(&mut persistence, 12, route_id);

    persistence
        .update_van(van_id, &test_van_fields("ABC 1234", 15, Some(route_id)))
        .unwrap();

    assert_eq!(persistence.get_van(van_id).unwrap().unwrap().capacity, 15);
    assert_eq!(persistence.list_seats(van_id).unwrap().len(), 15);
}

#[test]
fn test_update_van_capacity_with_tickets_is_refused() {
    let (mut persistence, route_id, van_id, trip_id) = setup_trip(12);
    let seat = seat_id(&mut persistence, van_id, "01");
    persistence
        .issue_ticket(&test_ticket("VT-20260310-AAAA0001", trip_id, seat, PaymentStatus::Paid))
        .unwrap();

    let result = persistence.update_van(van_id, &test_van_fields("ABC 1234", 10, Some(route_id)));
    assert_eq!(
        result,
        Err(PersistenceError::Referenced {
            resource: "van",
            id: van_id,
            referenced_by: "tickets",
        })
    );
    assert_eq!(persistence.list_seats(van_id).unwrap().len(), 12);
}

#[test]
fn test_update_van_without_capacity_change_keeps_seat_ids() {
    let (mut persistence, route_id, van_id, trip_id) = setup_trip(12);
    let seat = seat_id(&mut persistence, van_id, "03");
    persistence
        .issue_ticket(&test_ticket("VT-20260310-AAAA0002", trip_id, seat, PaymentStatus::Paid))
        .unwrap();

    let mut fields = test_van_fields("ABC 1234", 12, Some(route_id));
    fields.model = String::from("Nissan Urvan");
    persistence.update_van(van_id, &fields).unwrap();

    assert_eq!(seat_id(&mut persistence, van_id, "03"), seat);
    assert_eq!(
        persistence.get_van(van_id).unwrap().unwrap().model,
        "Nissan Urvan"
    );
}

#[test]
fn test_set_van_status() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let route_id = create_test_route(&mut persistence);
    let van_id = create_test_van(&mut persistence, 12, route_id);

    persistence
        .set_van_status(van_id, VanStatus::Maintenance)
        .unwrap();
    assert_eq!(
        persistence.get_van(van_id).unwrap().unwrap().status,
        VanStatus::Maintenance
    );

    assert!(matches!(
        persistence.set_van_status(999, VanStatus::Inactive),
        Err(PersistenceError::NotFound(_))
    ));
}

#[test]
fn test_delete_van_removes_seats() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let route_id = create_test_route(&mut persistence);
    let van_id = create_test_van(&mut persistence, 6, route_id);
    let seat = seat_id(&mut persistence, van_id, "01");

    persistence.delete_van(van_id).unwrap();

    assert!(persistence.get_van(van_id).unwrap().is_none());
    assert!(persistence.get_seat(seat).unwrap().is_none());
}

#[test]
fn test_delete_van_with_trip_fails() {
    let (mut persistence, _route_id, van_id, _trip_id) = setup_trip(6);

    assert_eq!(
        persistence.delete_van(van_id),
        Err(PersistenceError::Referenced {
            resource: "van",
            id: van_id,
            referenced_by: "trips",
        })
    );
}
