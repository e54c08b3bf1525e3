// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use vantrip_persistence::SqlitePersistence;

use crate::tests::helpers::{
    create_test_admin, qr, route_request, seat_id, setup_fixture, student_request, van_request,
};
use crate::{
    ApiError, RouteRequest, UpdateVanStatusRequest, create_route, create_van, delete_route,
    delete_van, get_route, get_van, issue_ticket, list_routes, list_van_seats, list_vans,
    set_van_status, update_route, update_van,
};

#[test]
fn test_route_name_defaults_to_endpoints() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let route = create_route(&mut persistence, &route_request(), &create_test_admin()).unwrap();

    assert_eq!(route.name, "Tacloban - Ormoc");
    assert_eq!(
        list_routes(&mut persistence, &create_test_admin())
            .unwrap()
            .routes,
        vec![route]
    );
}

#[test]
fn test_route_with_same_endpoints_is_invalid() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let result = create_route(
        &mut persistence,
        &RouteRequest {
            origin: String::from("Ormoc"),
            destination: String::from("ormoc"),
            name: None,
        },
        &create_test_admin(),
    );
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "route"
    ));
}

#[test]
fn test_update_route_keeps_explicit_name() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let admin = create_test_admin();
    let route_id = create_route(&mut persistence, &route_request(), &admin)
        .unwrap()
        .route_id;

    let updated = update_route(
        &mut persistence,
        route_id,
        &RouteRequest {
            origin: String::from("Tacloban"),
            destination: String::from("Baybay"),
            name: Some(String::from("Coastal Express")),
        },
        &admin,
    )
    .unwrap();
    assert_eq!(updated.name, "Coastal Express");
    assert_eq!(
        get_route(&mut persistence, route_id, &admin)
            .unwrap()
            .destination,
        "Baybay"
    );
}

#[test]
fn test_missing_route_is_not_found() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    assert!(matches!(
        get_route(&mut persistence, 12, &create_test_admin()),
        Err(ApiError::ResourceNotFound { .. })
    ));
    assert!(matches!(
        update_route(&mut persistence, 12, &route_request(), &create_test_admin()),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_referenced_route_cannot_be_deleted() {
    let mut fx = setup_fixture(12);
    let result = delete_route(&mut fx.persistence, fx.route_id, &create_test_admin());
    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_unreferenced_route_is_deleted() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let admin = create_test_admin();
    let route_id = create_route(&mut persistence, &route_request(), &admin)
        .unwrap()
        .route_id;

    delete_route(&mut persistence, route_id, &admin).unwrap();
    assert!(list_routes(&mut persistence, &admin).unwrap().routes.is_empty());
}

#[test]
fn test_create_van_normalizes_and_generates_seats() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let admin = create_test_admin();
    let van = create_van(&mut persistence, &van_request(" abc-123 ", 14, None), &admin).unwrap();

    assert_eq!(van.plate_number, "ABC-123");
    assert_eq!(van.status, "ACTIVE");
    let seats = list_van_seats(&mut persistence, van.van_id, &admin).unwrap();
    assert_eq!(seats.seats.len(), 14);
    assert_eq!(seats.seats[13].seat_number, "14");
}

#[test]
fn test_invalid_van_fields_are_rejected() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let admin = create_test_admin();

    let zero = create_van(&mut persistence, &van_request("ABC 1", 0, None), &admin);
    assert!(matches!(
        zero,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "capacity"
    ));

    let mut blank_model = van_request("ABC 1", 10, None);
    blank_model.model = String::from(" ");
    assert!(matches!(
        create_van(&mut persistence, &blank_model, &admin),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "model"
    ));

    let mut bad_status = van_request("ABC 1", 10, None);
    bad_status.status = Some(String::from("SCRAPPED"));
    assert!(matches!(
        create_van(&mut persistence, &bad_status, &admin),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "status"
    ));
}

#[test]
fn test_duplicate_plate_conflicts() {
    let mut fx = setup_fixture(12);
    let result = create_van(
        &mut fx.persistence,
        &van_request("ABC 1234", 10, None),
        &create_test_admin(),
    );
    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_van_on_missing_route_is_not_found() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let result = create_van(
        &mut persistence,
        &van_request("ABC 1", 10, Some(404)),
        &create_test_admin(),
    );
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_update_van_keeps_status_when_omitted() {
    let mut fx = setup_fixture(12);
    let admin = create_test_admin();
    set_van_status(
        &mut fx.persistence,
        fx.van_id,
        &UpdateVanStatusRequest {
            status: String::from("maintenance"),
        },
        &admin,
    )
    .unwrap();

    let mut request = van_request("ABC 1234", 12, Some(fx.route_id));
    request.model = String::from("Nissan Urvan");
    let van = update_van(&mut fx.persistence, fx.van_id, &request, &admin).unwrap();
    assert_eq!(van.status, "MAINTENANCE");
    assert_eq!(van.model, "Nissan Urvan");
}

#[test]
fn test_capacity_change_refused_once_tickets_exist() {
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

    let result = update_van(
        &mut fx.persistence,
        fx.van_id,
        &van_request("ABC 1234", 15, Some(fx.route_id)),
        &create_test_admin(),
    );
    assert!(matches!(result, Err(ApiError::Conflict { .. })));
    assert_eq!(
        get_van(&mut fx.persistence, fx.van_id, &create_test_admin())
            .unwrap()
            .capacity,
        12
    );
}

#[test]
fn test_capacity_change_regenerates_seats() {
    let mut fx = setup_fixture(12);
    let admin = create_test_admin();
    update_van(
        &mut fx.persistence,
        fx.van_id,
        &van_request("ABC 1234", 8, Some(fx.route_id)),
        &admin,
    )
    .unwrap();

    assert_eq!(
        list_van_seats(&mut fx.persistence, fx.van_id, &admin)
            .unwrap()
            .seats
            .len(),
        8
    );
}

#[test]
fn test_van_with_trips_cannot_be_deleted() {
    let mut fx = setup_fixture(12);
    assert!(matches!(
        delete_van(&mut fx.persistence, fx.van_id, &create_test_admin()),
        Err(ApiError::Conflict { .. })
    ));
}

#[test]
fn test_van_without_trips_is_deleted() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let admin = create_test_admin();
    let van_id = create_van(&mut persistence, &van_request("ABC 1", 10, None), &admin)
        .unwrap()
        .van_id;

    delete_van(&mut persistence, van_id, &admin).unwrap();
    assert!(list_vans(&mut persistence, &admin).unwrap().vans.is_empty());
    assert!(matches!(
        list_van_seats(&mut persistence, van_id, &admin),
        Err(ApiError::ResourceNotFound { .. })
    ));
}
