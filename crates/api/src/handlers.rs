// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Public operations take no identity. Administrative operations take an
//! [`AuthenticatedAdmin`], which the caller can only obtain from a
//! forwarded identity.

use std::str::FromStr;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info, warn};
use vantrip_domain::{
    AgeInput, DomainError, FareBreakdown, PassengerDetails, PassengerType, PaymentMethod,
    PaymentStatus, QrPayload, SeatOccupancy, StatusChange, TicketStatus, TripStatus, VanStatus,
    compute_fare, derive_occupancy, format_ticket_number, format_time_of_day, format_trip_date,
    is_well_formed_ticket_number, normalize_driver, normalize_plate_number, parse_time_of_day,
    parse_trip_date, plan_status_change, validate_capacity, validate_passenger_details,
    validate_route_fields, validate_schedule, validate_van_model,
};
use vantrip_persistence::{
    NewTicket, NewTripData, PersistenceError, RouteData, RouteFields, SeatAvailabilityData,
    SeatData, SqlitePersistence, TicketData, TicketStatusHistoryData, TripData, TripFilter,
    VanData, VanFields,
};

use crate::auth::AuthenticatedAdmin;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    CreateTripRequest, DeletedResponse, FareQuoteResponse, IssueTicketRequest,
    IssueTicketResponse, ListRoutesResponse, ListSeatsResponse, ListTicketsResponse,
    ListTripsRequest, ListTripsResponse, ListVansResponse, RouteInfo, RouteRequest,
    SeatAvailabilityResponse, SeatInfo, SeatMapResponse, SeatSummary, StatusHistoryEntry,
    TicketInfo, TicketStatusHistoryResponse, TicketVerificationResponse, TripInfo,
    UpdateTicketStatusRequest, UpdateTicketStatusResponse, UpdateTripStatusRequest,
    UpdateVanStatusRequest, VanInfo, VanRequest,
};
use crate::settings::QrSettings;

/// How many ticket numbers issuance tries before giving up on collisions.
pub const MAX_TICKET_NUMBER_ATTEMPTS: u32 = 3;

// ============================================================================
// Conversions and lookups
// ============================================================================

fn trip_info(trip: &TripData) -> TripInfo {
    TripInfo {
        trip_id: trip.trip_id,
        van_id: trip.van_id,
        plate_number: trip.plate_number.clone(),
        route_id: trip.route_id,
        route_name: trip.route_name.clone(),
        origin: trip.origin.clone(),
        destination: trip.destination.clone(),
        trip_date: trip.trip_date.clone(),
        departure_time: trip.departure_time.clone(),
        arrival_time: trip.arrival_time.clone(),
        driver_name: trip.driver_name.clone(),
        driver_phone: trip.driver_phone.clone(),
        status: trip.status.as_str().to_string(),
        capacity: trip.capacity,
        available_seats: trip.available_seats(),
    }
}

fn ticket_info(ticket: TicketData, qr: &QrSettings) -> TicketInfo {
    let qr_image_url: String = qr.image_url(&ticket.qr_payload);
    TicketInfo {
        ticket_number: ticket.ticket_number,
        trip_id: ticket.trip_id,
        seat_id: ticket.seat_id,
        seat_number: ticket.seat_number,
        passenger_name: ticket.passenger_name,
        address: ticket.address,
        age: ticket.age,
        phone: ticket.phone,
        emergency_contact: ticket.emergency_contact,
        passenger_type: ticket.passenger_type.as_str().to_string(),
        payment_method: ticket.payment_method,
        regular_fare: ticket.regular_fare,
        transaction_fee: ticket.transaction_fee,
        discount: ticket.discount,
        total_fare: ticket.total_fare,
        payment_status: ticket.payment_status.as_str().to_string(),
        ticket_status: ticket.ticket_status.as_str().to_string(),
        qr_payload: ticket.qr_payload,
        qr_image_url,
        issued_by: ticket.issued_by,
        created_at: ticket.created_at,
        updated_at: ticket.updated_at,
    }
}

fn route_info(route: RouteData) -> RouteInfo {
    RouteInfo {
        route_id: route.route_id,
        origin: route.origin,
        destination: route.destination,
        name: route.name,
        created_at: route.created_at,
    }
}

fn van_info(van: VanData) -> VanInfo {
    VanInfo {
        van_id: van.van_id,
        plate_number: van.plate_number,
        capacity: van.capacity,
        model: van.model,
        status: van.status.as_str().to_string(),
        route_id: van.route_id,
        created_at: van.created_at,
    }
}

fn history_entry(entry: TicketStatusHistoryData) -> StatusHistoryEntry {
    StatusHistoryEntry {
        previous_ticket_status: entry.previous_ticket_status.as_str().to_string(),
        new_ticket_status: entry.new_ticket_status.as_str().to_string(),
        previous_payment_status: entry.previous_payment_status.as_str().to_string(),
        new_payment_status: entry.new_payment_status.as_str().to_string(),
        changed_by: entry.changed_by,
        changed_at: entry.changed_at,
        note: entry.note,
    }
}

fn load_trip(persistence: &mut SqlitePersistence, trip_id: i64) -> Result<TripData, ApiError> {
    persistence
        .get_trip(trip_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Trip"),
            message: format!("Trip {trip_id} does not exist"),
        })
}

fn load_van(persistence: &mut SqlitePersistence, van_id: i64) -> Result<VanData, ApiError> {
    persistence
        .get_van(van_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Van"),
            message: format!("Van {van_id} does not exist"),
        })
}

fn load_route(persistence: &mut SqlitePersistence, route_id: i64) -> Result<RouteData, ApiError> {
    persistence
        .get_route(route_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Route"),
            message: format!("Route {route_id} does not exist"),
        })
}

fn load_ticket(
    persistence: &mut SqlitePersistence,
    ticket_number: &str,
) -> Result<TicketData, ApiError> {
    let ticket_number: String = ticket_number.trim().to_uppercase();
    if !is_well_formed_ticket_number(&ticket_number) {
        return Err(ApiError::InvalidInput {
            field: String::from("ticket_number"),
            message: format!("'{ticket_number}' is not a ticket number"),
        });
    }
    persistence
        .get_ticket_by_number(&ticket_number)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Ticket"),
            message: format!("Ticket {ticket_number} does not exist"),
        })
}

/// Resolves a seat on a trip, failing if either is missing or the seat
/// belongs to a different van.
fn load_seat_on_trip(
    persistence: &mut SqlitePersistence,
    trip: &TripData,
    seat_id: i64,
) -> Result<SeatData, ApiError> {
    let seat: SeatData = persistence
        .get_seat(seat_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Seat"),
            message: format!("Seat {seat_id} does not exist"),
        })?;
    if seat.van_id != trip.van_id {
        return Err(translate_domain_error(DomainError::SeatNotOnTrip {
            seat_id,
            trip_id: trip.trip_id,
        }));
    }
    Ok(seat)
}

fn current_occupancy(
    persistence: &mut SqlitePersistence,
    trip_id: i64,
    seat_id: i64,
) -> Result<SeatOccupancy, ApiError> {
    let live = persistence
        .find_live_ticket(trip_id, seat_id)
        .map_err(translate_persistence_error)?;
    Ok(derive_occupancy(
        live.map(|t| (t.ticket_status, t.payment_status)),
    ))
}

fn now_rfc3339() -> Result<(OffsetDateTime, String), ApiError> {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let formatted: String = now.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })?;
    Ok((now, formatted))
}

// ============================================================================
// Public operations
// ============================================================================

/// Quotes the fare for a passenger classification.
///
/// # Errors
///
/// Returns `InvalidInput` if the classification is not recognized.
pub fn quote_fare(passenger_type: &str) -> Result<FareQuoteResponse, ApiError> {
    let passenger_type: PassengerType =
        PassengerType::from_str(passenger_type).map_err(translate_domain_error)?;
    let fare: FareBreakdown = compute_fare(passenger_type);

    Ok(FareQuoteResponse {
        passenger_type: passenger_type.as_str().to_string(),
        regular_fare: fare.regular_fare,
        transaction_fee: fare.transaction_fee,
        discount: fare.discount,
        total_fare: fare.total_fare,
    })
}

/// Lists trips with their available seat counts.
///
/// # Errors
///
/// Returns `InvalidInput` if the date filter is malformed.
pub fn list_trips(
    persistence: &mut SqlitePersistence,
    request: &ListTripsRequest,
) -> Result<ListTripsResponse, ApiError> {
    let trip_date: Option<String> = request
        .date
        .as_deref()
        .map(|d| parse_trip_date(d).map(format_trip_date))
        .transpose()
        .map_err(translate_domain_error)?;

    let trips: Vec<TripData> = persistence
        .list_trips(&TripFilter {
            trip_date,
            route_id: request.route_id,
        })
        .map_err(translate_persistence_error)?;

    debug!(count = trips.len(), "Listed trips");
    Ok(ListTripsResponse {
        trips: trips.iter().map(trip_info).collect(),
    })
}

/// Retrieves a single trip.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the trip does not exist.
pub fn get_trip(persistence: &mut SqlitePersistence, trip_id: i64) -> Result<TripInfo, ApiError> {
    Ok(trip_info(&load_trip(persistence, trip_id)?))
}

/// Returns the occupancy of every seat of a trip's van.
///
/// Ticket numbers are only included when `include_ticket_numbers` is set,
/// which callers do for administrators.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the trip does not exist.
pub fn get_seat_map(
    persistence: &mut SqlitePersistence,
    trip_id: i64,
    include_ticket_numbers: bool,
) -> Result<SeatMapResponse, ApiError> {
    let trip: TripData = load_trip(persistence, trip_id)?;
    let seats: Vec<SeatAvailabilityData> = persistence
        .get_seat_map(trip_id)
        .map_err(translate_persistence_error)?;

    Ok(SeatMapResponse {
        trip_id,
        capacity: trip.capacity,
        available_seats: trip.available_seats(),
        seats: seats
            .into_iter()
            .map(|s| SeatInfo {
                seat_id: s.seat_id,
                seat_number: s.seat_number,
                occupancy: s.occupancy.as_str().to_string(),
                ticket_number: s.ticket_number.filter(|_| include_ticket_numbers),
            })
            .collect(),
    })
}

/// Reports whether one seat on a trip is available, pending or occupied.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the trip or seat does not exist, or the
/// seat is not part of the trip's van.
pub fn check_seat_availability(
    persistence: &mut SqlitePersistence,
    trip_id: i64,
    seat_id: i64,
) -> Result<SeatAvailabilityResponse, ApiError> {
    let trip: TripData = load_trip(persistence, trip_id)?;
    let seat: SeatData = load_seat_on_trip(persistence, &trip, seat_id)?;
    let occupancy: SeatOccupancy = current_occupancy(persistence, trip_id, seat_id)?;

    debug!(trip_id, seat_id, %occupancy, "Checked seat availability");
    Ok(SeatAvailabilityResponse {
        trip_id,
        seat_id,
        seat_number: seat.seat_number,
        occupancy: occupancy.as_str().to_string(),
        available: occupancy.is_available(),
    })
}

/// Looks up a ticket by number for verification at boarding.
///
/// A ticket is valid when it is active and paid.
///
/// # Errors
///
/// Returns `InvalidInput` for a malformed number and `ResourceNotFound` if
/// no such ticket exists.
pub fn verify_ticket(
    persistence: &mut SqlitePersistence,
    ticket_number: &str,
    qr: &QrSettings,
) -> Result<TicketVerificationResponse, ApiError> {
    let ticket: TicketData = load_ticket(persistence, ticket_number)?;
    let trip: TripData = load_trip(persistence, ticket.trip_id)?;

    let valid: bool = ticket.ticket_status == TicketStatus::Active
        && ticket.payment_status == PaymentStatus::Paid;
    Ok(TicketVerificationResponse {
        qr_image_url: qr.image_url(&ticket.qr_payload),
        ticket_number: ticket.ticket_number,
        passenger_name: ticket.passenger_name,
        passenger_type: ticket.passenger_type.as_str().to_string(),
        seat_number: ticket.seat_number,
        trip_id: trip.trip_id,
        route_name: trip.route_name,
        trip_date: trip.trip_date,
        departure_time: trip.departure_time,
        total_fare: ticket.total_fare,
        ticket_status: ticket.ticket_status.as_str().to_string(),
        payment_status: ticket.payment_status.as_str().to_string(),
        valid,
    })
}

// ============================================================================
// Ticket issuance
// ============================================================================

/// Decides the initial payment status of a new ticket.
///
/// Self-service tickets always start `PENDING`. Staff-issued tickets
/// default to `PAID` and may name another starting status, except
/// `REFUNDED`.
fn resolve_initial_payment(
    requested: Option<&str>,
    admin: Option<&AuthenticatedAdmin>,
) -> Result<PaymentStatus, ApiError> {
    match (admin, requested) {
        (None, None) => Ok(PaymentStatus::Pending),
        (None, Some(_)) => Err(translate_domain_error(
            DomainError::PaymentStatusOverrideNotAllowed,
        )),
        (Some(_), None) => Ok(PaymentStatus::Paid),
        (Some(_), Some(raw)) => {
            let status: PaymentStatus =
                PaymentStatus::from_str(raw).map_err(translate_domain_error)?;
            if status.is_terminal() {
                return Err(ApiError::InvalidInput {
                    field: String::from("payment_status"),
                    message: format!("a new ticket cannot start as {status}"),
                });
            }
            Ok(status)
        }
    }
}

/// Issues a ticket for one seat on a trip.
///
/// Without an admin this is the self-service channel and the ticket awaits
/// payment. With an admin the ticket is recorded as paid unless the admin
/// says otherwise.
///
/// The seat check and the insert happen in one storage transaction, and
/// the store refuses a second live ticket for the same seat, so concurrent
/// requests for one seat yield exactly one ticket. A ticket number that
/// collides is replaced with a fresh one, up to
/// [`MAX_TICKET_NUMBER_ATTEMPTS`] times.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `trip_id` - The trip to book
/// * `request` - Seat, passenger and payment details
/// * `admin` - The issuing administrator, for staff-assisted issuance
/// * `qr` - Where QR images are rendered
///
/// # Errors
///
/// Returns `InvalidInput` for missing or malformed fields,
/// `ResourceNotFound` if the trip or seat does not exist,
/// `DomainRuleViolation` if the trip no longer takes bookings and
/// `Conflict` if the seat is held by a live ticket.
#[allow(clippy::too_many_lines)]
pub fn issue_ticket(
    persistence: &mut SqlitePersistence,
    trip_id: i64,
    request: &IssueTicketRequest,
    admin: Option<&AuthenticatedAdmin>,
    qr: &QrSettings,
) -> Result<IssueTicketResponse, ApiError> {
    let payment_status: PaymentStatus =
        resolve_initial_payment(request.payment_status.as_deref(), admin)?;
    let seat_id: i64 = request.seat_id.ok_or_else(|| ApiError::InvalidInput {
        field: String::from("seat_id"),
        message: String::from("seat_id is required"),
    })?;
    let age: &AgeInput = request.age.as_ref().ok_or_else(|| {
        translate_domain_error(DomainError::MissingPassengerField { field: "age" })
    })?;
    let passenger: PassengerDetails = validate_passenger_details(
        &request.passenger_name,
        &request.address,
        age,
        &request.phone,
        &request.emergency_contact,
    )
    .map_err(translate_domain_error)?;
    let passenger_type: PassengerType =
        PassengerType::from_str(&request.passenger_type).map_err(translate_domain_error)?;
    let payment_method: PaymentMethod =
        PaymentMethod::from_str(&request.payment_method).map_err(translate_domain_error)?;

    let trip: TripData = load_trip(persistence, trip_id)?;
    if !trip.status.accepts_bookings() {
        warn!(trip_id, status = %trip.status, "Rejected booking for closed trip");
        return Err(translate_domain_error(DomainError::TripNotBookable {
            trip_id,
            status: trip.status.as_str().to_string(),
        }));
    }
    let seat: SeatData = load_seat_on_trip(persistence, &trip, seat_id)?;

    let occupancy: SeatOccupancy = current_occupancy(persistence, trip_id, seat_id)?;
    if !occupancy.is_available() {
        return Err(translate_domain_error(DomainError::SeatUnavailable {
            seat_number: seat.seat_number,
            occupancy: occupancy.as_str().to_string(),
        }));
    }

    let fare: FareBreakdown = compute_fare(passenger_type);
    let (now, issued_at) = now_rfc3339()?;

    let mut attempt: u32 = 0;
    let ticket_number: String = loop {
        attempt += 1;
        let ticket_number: String = format_ticket_number(now.date(), rand::random::<u64>());
        let payload: QrPayload = QrPayload {
            ticket_number: ticket_number.clone(),
            passenger_name: passenger.name.clone(),
            seat_number: seat.seat_number.clone(),
            trip_id,
            route: trip.route_name.clone(),
            trip_date: trip.trip_date.clone(),
            total_fare: fare.total_fare,
            issued_at: issued_at.clone(),
        };
        let qr_payload: String = payload.to_json().map_err(translate_domain_error)?;

        let new_ticket: NewTicket = NewTicket {
            ticket_number: ticket_number.clone(),
            trip_id,
            seat_id,
            passenger_name: passenger.name.clone(),
            address: passenger.address.clone(),
            age: i32::from(passenger.age),
            phone: passenger.phone.clone(),
            emergency_contact: passenger.emergency_contact.clone(),
            passenger_type: passenger_type.as_str().to_string(),
            payment_method: payment_method.value().to_string(),
            regular_fare_cents: fare.regular_fare.cents(),
            transaction_fee_cents: fare.transaction_fee.cents(),
            discount_cents: fare.discount.cents(),
            total_fare_cents: fare.total_fare.cents(),
            payment_status: payment_status.as_str().to_string(),
            ticket_status: TicketStatus::Active.as_str().to_string(),
            qr_payload,
            issued_by: admin.map(|a| a.login().to_string()),
            created_at: issued_at.clone(),
            updated_at: issued_at.clone(),
        };

        match persistence.issue_ticket(&new_ticket) {
            Ok(_) => break ticket_number,
            Err(PersistenceError::DuplicateTicketNumber(number))
                if attempt < MAX_TICKET_NUMBER_ATTEMPTS =>
            {
                warn!(ticket_number = %number, attempt, "Ticket number collision, retrying");
            }
            Err(e) => return Err(translate_persistence_error(e)),
        }
    };

    let ticket: TicketData = persistence
        .get_ticket_by_number(&ticket_number)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::Internal {
            message: format!("Ticket {ticket_number} vanished after issuance"),
        })?;
    let available_seats: i64 = load_trip(persistence, trip_id)?.available_seats();

    info!(
        ticket_number = %ticket.ticket_number,
        trip_id,
        seat_number = %ticket.seat_number,
        issued_by = admin.map_or("self-service", AuthenticatedAdmin::login),
        "Ticket issued"
    );

    Ok(IssueTicketResponse {
        message: format!(
            "Ticket {} issued for seat {}",
            ticket.ticket_number, ticket.seat_number
        ),
        ticket: ticket_info(ticket, qr),
        available_seats,
    })
}

// ============================================================================
// Ticket administration
// ============================================================================

fn parse_optional<T: FromStr<Err = DomainError>>(raw: Option<&str>) -> Result<Option<T>, ApiError> {
    raw.map(T::from_str)
        .transpose()
        .map_err(translate_domain_error)
}

/// Changes a ticket's status and/or payment status.
///
/// Each axis follows its own lifecycle. Naming the current value of an
/// axis leaves that axis alone, but at least one axis must change. The
/// change is recorded in the ticket's history under the admin's login.
///
/// # Errors
///
/// Returns `InvalidInput` for unknown statuses or a request that changes
/// nothing, `DomainRuleViolation` for a transition the lifecycle forbids
/// and `Conflict` if the ticket changed since it was read.
pub fn update_ticket_status(
    persistence: &mut SqlitePersistence,
    ticket_number: &str,
    request: &UpdateTicketStatusRequest,
    admin: &AuthenticatedAdmin,
    qr: &QrSettings,
) -> Result<UpdateTicketStatusResponse, ApiError> {
    let requested_ticket: Option<TicketStatus> =
        parse_optional(request.ticket_status.as_deref())?;
    let requested_payment: Option<PaymentStatus> =
        parse_optional(request.payment_status.as_deref())?;

    let ticket: TicketData = load_ticket(persistence, ticket_number)?;
    let change: StatusChange = plan_status_change(
        ticket.ticket_status,
        ticket.payment_status,
        requested_ticket,
        requested_payment,
    )
    .map_err(|e| {
        warn!(ticket_number = %ticket.ticket_number, error = %e, "Rejected status change");
        translate_domain_error(e)
    })?;

    let note: Option<&str> = request
        .note
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    persistence
        .apply_ticket_status_change(ticket.ticket_id, &change, admin.login(), note)
        .map_err(translate_persistence_error)?;

    let updated: TicketData = load_ticket(persistence, &ticket.ticket_number)?;
    Ok(UpdateTicketStatusResponse {
        message: format!(
            "Ticket {} is now {}/{}",
            updated.ticket_number, updated.ticket_status, updated.payment_status
        ),
        ticket: ticket_info(updated, qr),
    })
}

/// Returns the recorded status changes of a ticket, oldest first.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the ticket does not exist.
pub fn get_ticket_status_history(
    persistence: &mut SqlitePersistence,
    ticket_number: &str,
    _admin: &AuthenticatedAdmin,
) -> Result<TicketStatusHistoryResponse, ApiError> {
    let ticket: TicketData = load_ticket(persistence, ticket_number)?;
    let entries: Vec<TicketStatusHistoryData> = persistence
        .list_ticket_status_history(ticket.ticket_id)
        .map_err(translate_persistence_error)?;

    Ok(TicketStatusHistoryResponse {
        ticket_number: ticket.ticket_number,
        entries: entries.into_iter().map(history_entry).collect(),
    })
}

/// Lists every ticket of a trip, newest first.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the trip does not exist.
pub fn list_trip_tickets(
    persistence: &mut SqlitePersistence,
    trip_id: i64,
    _admin: &AuthenticatedAdmin,
    qr: &QrSettings,
) -> Result<ListTicketsResponse, ApiError> {
    load_trip(persistence, trip_id)?;
    let tickets: Vec<TicketData> = persistence
        .list_tickets_for_trip(trip_id)
        .map_err(translate_persistence_error)?;

    Ok(ListTicketsResponse {
        trip_id,
        tickets: tickets.into_iter().map(|t| ticket_info(t, qr)).collect(),
    })
}

// ============================================================================
// Routes
// ============================================================================

fn route_fields(request: &RouteRequest) -> Result<RouteFields, ApiError> {
    let (origin, destination, name) = validate_route_fields(
        &request.origin,
        &request.destination,
        request.name.as_deref(),
    )
    .map_err(translate_domain_error)?;
    Ok(RouteFields {
        origin,
        destination,
        name,
    })
}

/// Creates a route.
///
/// # Errors
///
/// Returns `InvalidInput` if either endpoint is blank or both are the same.
pub fn create_route(
    persistence: &mut SqlitePersistence,
    request: &RouteRequest,
    admin: &AuthenticatedAdmin,
) -> Result<RouteInfo, ApiError> {
    let fields: RouteFields = route_fields(request)?;
    let route_id: i64 = persistence
        .create_route(&fields)
        .map_err(translate_persistence_error)?;

    info!(route_id, name = %fields.name, admin = admin.login(), "Route created");
    Ok(route_info(load_route(persistence, route_id)?))
}

/// Replaces a route's endpoints and name.
///
/// # Errors
///
/// Returns `InvalidInput` for invalid fields and `ResourceNotFound` if the
/// route does not exist.
pub fn update_route(
    persistence: &mut SqlitePersistence,
    route_id: i64,
    request: &RouteRequest,
    admin: &AuthenticatedAdmin,
) -> Result<RouteInfo, ApiError> {
    let fields: RouteFields = route_fields(request)?;
    persistence
        .update_route(route_id, &fields)
        .map_err(translate_persistence_error)?;

    info!(route_id, name = %fields.name, admin = admin.login(), "Route updated");
    Ok(route_info(load_route(persistence, route_id)?))
}

/// Retrieves a route.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the route does not exist.
pub fn get_route(
    persistence: &mut SqlitePersistence,
    route_id: i64,
    _admin: &AuthenticatedAdmin,
) -> Result<RouteInfo, ApiError> {
    Ok(route_info(load_route(persistence, route_id)?))
}

/// Lists all routes.
///
/// # Errors
///
/// Returns `Internal` if the routes cannot be read.
pub fn list_routes(
    persistence: &mut SqlitePersistence,
    _admin: &AuthenticatedAdmin,
) -> Result<ListRoutesResponse, ApiError> {
    let routes: Vec<RouteData> = persistence
        .list_routes()
        .map_err(translate_persistence_error)?;
    Ok(ListRoutesResponse {
        routes: routes.into_iter().map(route_info).collect(),
    })
}

/// Deletes a route no van or trip refers to.
///
/// # Errors
///
/// Returns `Conflict` while the route is referenced and
/// `ResourceNotFound` if it does not exist.
pub fn delete_route(
    persistence: &mut SqlitePersistence,
    route_id: i64,
    admin: &AuthenticatedAdmin,
) -> Result<DeletedResponse, ApiError> {
    persistence
        .delete_route(route_id)
        .map_err(translate_persistence_error)?;

    info!(route_id, admin = admin.login(), "Route deleted");
    Ok(DeletedResponse {
        message: format!("Route {route_id} deleted"),
    })
}

// ============================================================================
// Vans
// ============================================================================

fn van_fields(request: &VanRequest, default_status: VanStatus) -> Result<VanFields, ApiError> {
    let status: VanStatus = parse_optional(request.status.as_deref())?.unwrap_or(default_status);
    Ok(VanFields {
        plate_number: normalize_plate_number(&request.plate_number)
            .map_err(translate_domain_error)?,
        capacity: validate_capacity(request.capacity).map_err(translate_domain_error)?,
        model: validate_van_model(&request.model).map_err(translate_domain_error)?,
        status,
        route_id: request.route_id,
    })
}

/// Registers a van and generates its seats `01..capacity`.
///
/// # Errors
///
/// Returns `InvalidInput` for invalid fields, `ResourceNotFound` if the
/// route does not exist and `Conflict` if the plate is already registered.
pub fn create_van(
    persistence: &mut SqlitePersistence,
    request: &VanRequest,
    admin: &AuthenticatedAdmin,
) -> Result<VanInfo, ApiError> {
    let fields: VanFields = van_fields(request, VanStatus::Active)?;
    let van_id: i64 = persistence
        .create_van(&fields)
        .map_err(translate_persistence_error)?;

    info!(
        van_id,
        plate_number = %fields.plate_number,
        capacity = fields.capacity,
        admin = admin.login(),
        "Van created"
    );
    Ok(van_info(load_van(persistence, van_id)?))
}

/// Replaces a van's details.
///
/// A capacity change regenerates the van's seats and is refused once any
/// ticket refers to them.
///
/// # Errors
///
/// Returns `InvalidInput` for invalid fields, `ResourceNotFound` if the van
/// or route does not exist and `Conflict` for a duplicate plate or a
/// capacity change on a van with tickets.
pub fn update_van(
    persistence: &mut SqlitePersistence,
    van_id: i64,
    request: &VanRequest,
    admin: &AuthenticatedAdmin,
) -> Result<VanInfo, ApiError> {
    let current: VanData = load_van(persistence, van_id)?;
    let fields: VanFields = van_fields(request, current.status)?;
    persistence
        .update_van(van_id, &fields)
        .map_err(translate_persistence_error)?;

    info!(van_id, admin = admin.login(), "Van updated");
    Ok(van_info(load_van(persistence, van_id)?))
}

/// Changes a van's operational status.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown status and `ResourceNotFound` if
/// the van does not exist.
pub fn set_van_status(
    persistence: &mut SqlitePersistence,
    van_id: i64,
    request: &UpdateVanStatusRequest,
    admin: &AuthenticatedAdmin,
) -> Result<VanInfo, ApiError> {
    let status: VanStatus = VanStatus::from_str(&request.status).map_err(translate_domain_error)?;
    persistence
        .set_van_status(van_id, status)
        .map_err(translate_persistence_error)?;

    info!(van_id, %status, admin = admin.login(), "Van status changed");
    Ok(van_info(load_van(persistence, van_id)?))
}

/// Retrieves a van.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the van does not exist.
pub fn get_van(
    persistence: &mut SqlitePersistence,
    van_id: i64,
    _admin: &AuthenticatedAdmin,
) -> Result<VanInfo, ApiError> {
    Ok(van_info(load_van(persistence, van_id)?))
}

/// Lists all vans.
///
/// # Errors
///
/// Returns `Internal` if the vans cannot be read.
pub fn list_vans(
    persistence: &mut SqlitePersistence,
    _admin: &AuthenticatedAdmin,
) -> Result<ListVansResponse, ApiError> {
    let vans: Vec<VanData> = persistence
        .list_vans()
        .map_err(translate_persistence_error)?;
    Ok(ListVansResponse {
        vans: vans.into_iter().map(van_info).collect(),
    })
}

/// Lists a van's seats in seat-number order.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the van does not exist.
pub fn list_van_seats(
    persistence: &mut SqlitePersistence,
    van_id: i64,
    _admin: &AuthenticatedAdmin,
) -> Result<ListSeatsResponse, ApiError> {
    load_van(persistence, van_id)?;
    let seats: Vec<SeatData> = persistence
        .list_seats(van_id)
        .map_err(translate_persistence_error)?;
    Ok(ListSeatsResponse {
        van_id,
        seats: seats
            .into_iter()
            .map(|s| SeatSummary {
                seat_id: s.seat_id,
                seat_number: s.seat_number,
            })
            .collect(),
    })
}

/// Deletes a van that has no trips, together with its seats.
///
/// # Errors
///
/// Returns `Conflict` while trips reference the van and
/// `ResourceNotFound` if it does not exist.
pub fn delete_van(
    persistence: &mut SqlitePersistence,
    van_id: i64,
    admin: &AuthenticatedAdmin,
) -> Result<DeletedResponse, ApiError> {
    persistence
        .delete_van(van_id)
        .map_err(translate_persistence_error)?;

    info!(van_id, admin = admin.login(), "Van deleted");
    Ok(DeletedResponse {
        message: format!("Van {van_id} deleted"),
    })
}

// ============================================================================
// Trips
// ============================================================================

/// Schedules a trip for an active van.
///
/// The route defaults to the van's assigned route. Dates are `YYYY-MM-DD`
/// and times `HH:MM`; an arrival time must fall after departure.
///
/// # Errors
///
/// Returns `InvalidInput` for malformed fields or a missing route,
/// `ResourceNotFound` if the van or route does not exist,
/// `DomainRuleViolation` if the van is not active and `Conflict` if the
/// van already has a trip that day.
pub fn create_trip(
    persistence: &mut SqlitePersistence,
    request: &CreateTripRequest,
    admin: &AuthenticatedAdmin,
) -> Result<TripInfo, ApiError> {
    let trip_date: String = parse_trip_date(&request.trip_date)
        .map(format_trip_date)
        .map_err(translate_domain_error)?;
    let departure = parse_time_of_day(&request.departure_time).map_err(translate_domain_error)?;
    let arrival = request
        .arrival_time
        .as_deref()
        .map(parse_time_of_day)
        .transpose()
        .map_err(translate_domain_error)?;
    validate_schedule(departure, arrival).map_err(translate_domain_error)?;
    let (driver_name, driver_phone) = normalize_driver(
        request.driver_name.as_deref(),
        request.driver_phone.as_deref(),
    )
    .map_err(translate_domain_error)?;

    let van: VanData = load_van(persistence, request.van_id)?;
    if van.status != VanStatus::Active {
        return Err(translate_domain_error(DomainError::VanNotActive {
            van_id: van.van_id,
            status: van.status.as_str().to_string(),
        }));
    }
    let route_id: i64 = request
        .route_id
        .or(van.route_id)
        .ok_or_else(|| ApiError::InvalidInput {
            field: String::from("route_id"),
            message: format!("van {} has no assigned route; route_id is required", van.van_id),
        })?;

    let trip_id: i64 = persistence
        .create_trip(&NewTripData {
            van_id: van.van_id,
            route_id,
            trip_date,
            departure_time: format_time_of_day(departure),
            arrival_time: arrival.map(format_time_of_day),
            driver_name,
            driver_phone,
        })
        .map_err(translate_persistence_error)?;

    info!(
        trip_id,
        van_id = van.van_id,
        route_id,
        admin = admin.login(),
        "Trip created"
    );
    Ok(trip_info(&load_trip(persistence, trip_id)?))
}

/// Moves a trip along its lifecycle.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown status, `ResourceNotFound` if the
/// trip does not exist, `DomainRuleViolation` for a forbidden transition
/// and `Conflict` if the trip changed since it was read.
pub fn update_trip_status(
    persistence: &mut SqlitePersistence,
    trip_id: i64,
    request: &UpdateTripStatusRequest,
    admin: &AuthenticatedAdmin,
) -> Result<TripInfo, ApiError> {
    let new_status: TripStatus =
        TripStatus::from_str(&request.status).map_err(translate_domain_error)?;
    let trip: TripData = load_trip(persistence, trip_id)?;
    trip.status
        .validate_transition(new_status)
        .map_err(translate_domain_error)?;

    persistence
        .update_trip_status(trip_id, trip.status, new_status)
        .map_err(translate_persistence_error)?;

    info!(
        trip_id,
        from = %trip.status,
        to = %new_status,
        admin = admin.login(),
        "Trip status changed"
    );
    Ok(trip_info(&load_trip(persistence, trip_id)?))
}

/// Deletes a trip that has never had a ticket.
///
/// # Errors
///
/// Returns `Conflict` if any ticket exists for the trip and
/// `ResourceNotFound` if it does not exist.
pub fn delete_trip(
    persistence: &mut SqlitePersistence,
    trip_id: i64,
    admin: &AuthenticatedAdmin,
) -> Result<DeletedResponse, ApiError> {
    persistence
        .delete_trip(trip_id)
        .map_err(translate_persistence_error)?;

    info!(trip_id, admin = admin.login(), "Trip deleted");
    Ok(DeletedResponse {
        message: format!("Trip {trip_id} deleted"),
    })
}
