// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use vantrip_domain::{AgeInput, Money, QrPayload, is_well_formed_ticket_number};

use crate::tests::helpers::{
    create_test_admin, qr, seat_id, setup_fixture, student_request, van_request,
};
use crate::{
    ApiError, IssueTicketRequest, QrSettings, UpdateTicketStatusRequest, UpdateTripStatusRequest,
    check_seat_availability, create_van, get_trip, issue_ticket, update_ticket_status,
    update_trip_status,
};

#[test]
fn test_self_service_student_ticket() {
    let mut fx = setup_fixture(12);
    let seat = seat_id(&mut fx.persistence, fx.van_id, "05");

    let response = issue_ticket(
        &mut fx.persistence,
        fx.trip_id,
        &student_request(seat),
        None,
        &qr(),
    )
    .unwrap();

    let ticket = &response.ticket;
    assert!(is_well_formed_ticket_number(&ticket.ticket_number));
    assert_eq!(ticket.seat_number, "05");
    assert_eq!(ticket.total_fare, Money::from_units(170));
    assert_eq!(ticket.discount, Money::from_units(40));
    assert_eq!(ticket.passenger_type, "STUDENT");
    assert_eq!(ticket.payment_method, "CASH");
    assert_eq!(ticket.payment_status, "PENDING");
    assert_eq!(ticket.ticket_status, "ACTIVE");
    assert_eq!(ticket.issued_by, None);
    assert_eq!(response.available_seats, 11);

    let availability = check_seat_availability(&mut fx.persistence, fx.trip_id, seat).unwrap();
    assert_eq!(availability.occupancy, "pending");
    assert!(!availability.available);
}

#[test]
fn test_staff_ticket_defaults_to_paid() {
    let mut fx = setup_fixture(12);
    let seat = seat_id(&mut fx.persistence, fx.van_id, "05");
    let admin = create_test_admin();

    let response = issue_ticket(
        &mut fx.persistence,
        fx.trip_id,
        &student_request(seat),
        Some(&admin),
        &qr(),
    )
    .unwrap();

    assert_eq!(response.ticket.payment_status, "PAID");
    assert_eq!(response.ticket.issued_by.as_deref(), Some("dispatcher1"));
    assert_eq!(
        check_seat_availability(&mut fx.persistence, fx.trip_id, seat)
            .unwrap()
            .occupancy,
        "occupied"
    );
}

#[test]
fn test_staff_may_issue_pending_ticket() {
    let mut fx = setup_fixture(12);
    let seat = seat_id(&mut fx.persistence, fx.van_id, "02");
    let mut request = student_request(seat);
    request.payment_status = Some(String::from("pending"));

    let response = issue_ticket(
        &mut fx.persistence,
        fx.trip_id,
        &request,
        Some(&create_test_admin()),
        &qr(),
    )
    .unwrap();
    assert_eq!(response.ticket.payment_status, "PENDING");
}

#[test]
fn test_staff_cannot_issue_refunded_ticket() {
    let mut fx = setup_fixture(12);
    let seat = seat_id(&mut fx.persistence, fx.van_id, "02");
    let mut request = student_request(seat);
    request.payment_status = Some(String::from("REFUNDED"));

    let result = issue_ticket(
        &mut fx.persistence,
        fx.trip_id,
        &request,
        Some(&create_test_admin()),
        &qr(),
    );
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "payment_status"
    ));
}

#[test]
fn test_self_service_cannot_choose_payment_status() {
    let mut fx = setup_fixture(12);
    let seat = seat_id(&mut fx.persistence, fx.van_id, "02");
    let mut request = student_request(seat);
    request.payment_status = Some(String::from("PAID"));

    let result = issue_ticket(&mut fx.persistence, fx.trip_id, &request, None, &qr());
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "payment_status"
    ));
    assert_eq!(
        get_trip(&mut fx.persistence, fx.trip_id)
            .unwrap()
            .available_seats,
        12
    );
}

#[test]
fn test_second_issuance_for_same_seat_conflicts() {
    let mut fx = setup_fixture(12);
    let seat = seat_id(&mut fx.persistence, fx.van_id, "05");

    let first = issue_ticket(
        &mut fx.persistence,
        fx.trip_id,
        &student_request(seat),
        None,
        &qr(),
    )
    .unwrap();

    let second = issue_ticket(
        &mut fx.persistence,
        fx.trip_id,
        &student_request(seat),
        Some(&create_test_admin()),
        &qr(),
    );
    assert!(matches!(second, Err(ApiError::Conflict { .. })));
    assert_eq!(
        get_trip(&mut fx.persistence, fx.trip_id)
            .unwrap()
            .available_seats,
        first.available_seats
    );
}

#[test]
fn test_cancelled_seat_can_be_issued_again() {
    let mut fx = setup_fixture(12);
    let seat = seat_id(&mut fx.persistence, fx.van_id, "05");
    let admin = create_test_admin();

    let first = issue_ticket(
        &mut fx.persistence,
        fx.trip_id,
        &student_request(seat),
        None,
        &qr(),
    )
    .unwrap();
    update_ticket_status(
        &mut fx.persistence,
        &first.ticket.ticket_number,
        &UpdateTicketStatusRequest {
            ticket_status: Some(String::from("CANCELLED")),
            ..UpdateTicketStatusRequest::default()
        },
        &admin,
        &qr(),
    )
    .unwrap();
    assert_eq!(
        get_trip(&mut fx.persistence, fx.trip_id)
            .unwrap()
            .available_seats,
        12
    );

    let second = issue_ticket(
        &mut fx.persistence,
        fx.trip_id,
        &student_request(seat),
        None,
        &qr(),
    )
    .unwrap();
    assert_ne!(second.ticket.ticket_number, first.ticket.ticket_number);
    assert_eq!(second.available_seats, 11);
}

#[test]
fn test_distinct_seats_get_distinct_ticket_numbers() {
    let mut fx = setup_fixture(4);
    let mut numbers = Vec::new();
    for seat_number in ["01", "02", "03", "04"] {
        let seat = seat_id(&mut fx.persistence, fx.van_id, seat_number);
        let response = issue_ticket(
            &mut fx.persistence,
            fx.trip_id,
            &student_request(seat),
            None,
            &qr(),
        )
        .unwrap();
        numbers.push(response.ticket.ticket_number);
    }
    let mut unique = numbers.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), numbers.len());
    assert_eq!(
        get_trip(&mut fx.persistence, fx.trip_id)
            .unwrap()
            .available_seats,
        0
    );
}

#[test]
fn test_qr_payload_snapshots_ticket() {
    let mut fx = setup_fixture(12);
    let seat = seat_id(&mut fx.persistence, fx.van_id, "05");
    let settings = QrSettings {
        service_url: String::from("https://qr.example/render"),
        size: 150,
    };

    let ticket = issue_ticket(
        &mut fx.persistence,
        fx.trip_id,
        &student_request(seat),
        None,
        &settings,
    )
    .unwrap()
    .ticket;

    let payload: QrPayload = serde_json::from_str(&ticket.qr_payload).unwrap();
    assert_eq!(payload.ticket_number, ticket.ticket_number);
    assert_eq!(payload.passenger_name, "Maria Santos");
    assert_eq!(payload.seat_number, "05");
    assert_eq!(payload.trip_id, fx.trip_id);
    assert_eq!(payload.route, "Tacloban - Ormoc");
    assert_eq!(payload.trip_date, "2026-03-14");
    assert_eq!(payload.total_fare, Money::from_units(170));
    assert!(
        ticket
            .qr_image_url
            .starts_with("https://qr.example/render?size=150x150&data=")
    );
}

#[test]
fn test_age_as_numeric_string_is_accepted() {
    let mut fx = setup_fixture(12);
    let seat = seat_id(&mut fx.persistence, fx.van_id, "07");
    let mut request = student_request(seat);
    request.age = Some(AgeInput::Text(String::from(" 67 ")));
    request.passenger_type = String::from("SENIOR_CITIZEN");

    let ticket = issue_ticket(&mut fx.persistence, fx.trip_id, &request, None, &qr())
        .unwrap()
        .ticket;
    assert_eq!(ticket.age, 67);
}

#[test]
fn test_missing_fields_are_rejected_before_touching_storage() {
    let mut fx = setup_fixture(12);
    let seat = seat_id(&mut fx.persistence, fx.van_id, "05");

    let cases: [(&str, fn(&mut IssueTicketRequest)); 10] = [
        ("passenger_name", |r: &mut IssueTicketRequest| {
            r.passenger_name = String::from("  ");
        }),
        ("address", |r: &mut IssueTicketRequest| r.address.clear()),
        ("age", |r: &mut IssueTicketRequest| r.age = None),
        ("age", |r: &mut IssueTicketRequest| {
            r.age = Some(AgeInput::Text(String::from("twenty")));
        }),
        ("age", |r: &mut IssueTicketRequest| {
            r.age = Some(AgeInput::Number(0));
        }),
        ("phone", |r: &mut IssueTicketRequest| r.phone.clear()),
        ("emergency_contact", |r: &mut IssueTicketRequest| {
            r.emergency_contact.clear();
        }),
        ("passenger_type", |r: &mut IssueTicketRequest| {
            r.passenger_type = String::from("CHILD");
        }),
        ("payment_method", |r: &mut IssueTicketRequest| {
            r.payment_method.clear();
        }),
        ("seat_id", |r: &mut IssueTicketRequest| r.seat_id = None),
    ];

    for (expected_field, mutate) in cases {
        let mut request = student_request(seat);
        mutate(&mut request);
        match issue_ticket(&mut fx.persistence, fx.trip_id, &request, None, &qr()) {
            Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected invalid {expected_field}, got {other:?}"),
        }
    }

    assert_eq!(
        get_trip(&mut fx.persistence, fx.trip_id)
            .unwrap()
            .available_seats,
        12
    );
}

#[test]
fn test_missing_trip_is_not_found() {
    let mut fx = setup_fixture(12);
    let seat = seat_id(&mut fx.persistence, fx.van_id, "05");

    let result = issue_ticket(&mut fx.persistence, 999, &student_request(seat), None, &qr());
    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Trip"
    ));
}

#[test]
fn test_seat_of_another_van_is_not_found() {
    let mut fx = setup_fixture(12);
    let other_van = create_van(
        &mut fx.persistence,
        &van_request("XYZ 9876", 12, Some(fx.route_id)),
        &create_test_admin(),
    )
    .unwrap()
    .van_id;
    let foreign_seat = seat_id(&mut fx.persistence, other_van, "05");

    let result = issue_ticket(
        &mut fx.persistence,
        fx.trip_id,
        &student_request(foreign_seat),
        None,
        &qr(),
    );
    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Seat"
    ));
}

#[test]
fn test_departed_trip_is_not_bookable() {
    let mut fx = setup_fixture(12);
    let seat = seat_id(&mut fx.persistence, fx.van_id, "05");
    let admin = create_test_admin();
    for status in ["BOARDING", "DEPARTED"] {
        update_trip_status(
            &mut fx.persistence,
            fx.trip_id,
            &UpdateTripStatusRequest {
                status: status.to_string(),
            },
            &admin,
        )
        .unwrap();
    }

    let result = issue_ticket(
        &mut fx.persistence,
        fx.trip_id,
        &student_request(seat),
        Some(&admin),
        &qr(),
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "trip_bookable"
    ));
}

#[test]
fn test_boarding_trip_still_takes_bookings() {
    let mut fx = setup_fixture(12);
    let seat = seat_id(&mut fx.persistence, fx.van_id, "05");
    let admin = create_test_admin();
    update_trip_status(
        &mut fx.persistence,
        fx.trip_id,
        &UpdateTripStatusRequest {
            status: String::from("BOARDING"),
        },
        &admin,
    )
    .unwrap();

    assert!(
        issue_ticket(
            &mut fx.persistence,
            fx.trip_id,
            &student_request(seat),
            Some(&admin),
            &qr(),
        )
        .is_ok()
    );
}
