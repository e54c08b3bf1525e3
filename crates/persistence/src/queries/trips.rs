// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Trip queries and derived seat availability.
//!
//! Available seats are computed on every read from the van's capacity and
//! the number of live tickets. Nothing here reads a stored counter.

use std::collections::HashMap;

use diesel::prelude::*;
use num_traits::ToPrimitive;
use tracing::debug;
use vantrip_domain::{PaymentStatus, TicketStatus, TripStatus, derive_occupancy};

use crate::data_models::{SeatAvailabilityData, TripData, TripFilter};
use crate::diesel_schema::{routes, seats, tickets, trips, vans};
use crate::error::PersistenceError;
use crate::queries::LIVE_TICKET_STATUSES;

/// Diesel Queryable struct for trip rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = trips)]
struct TripRow {
    trip_id: i64,
    van_id: i64,
    route_id: i64,
    trip_date: String,
    departure_time: String,
    arrival_time: Option<String>,
    driver_name: Option<String>,
    driver_phone: Option<String>,
    status: String,
    created_at: String,
}

/// A trip row joined with its van and route.
type TripJoinRow = (TripRow, String, i32, String, String, String);

fn build_trip_data(row: TripJoinRow, live_tickets: i64) -> Result<TripData, PersistenceError> {
    let (trip, plate_number, capacity, route_name, origin, destination) = row;
    let status: TripStatus = trip.status.parse()?;
    let capacity: u8 = capacity.to_u8().ok_or_else(|| {
        PersistenceError::ReconstructionError(format!(
            "van {} has out-of-range capacity {capacity}",
            trip.van_id
        ))
    })?;

    Ok(TripData {
        trip_id: trip.trip_id,
        van_id: trip.van_id,
        plate_number,
        route_id: trip.route_id,
        route_name,
        origin,
        destination,
        trip_date: trip.trip_date,
        departure_time: trip.departure_time,
        arrival_time: trip.arrival_time,
        driver_name: trip.driver_name,
        driver_phone: trip.driver_phone,
        status,
        capacity,
        live_tickets,
        created_at: trip.created_at,
    })
}

backend_fn! {
/// Retrieves a trip with its live ticket count.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
/// Returns `Ok(None)` if the trip is not found.
pub fn get_trip(conn: &mut _, trip_id: i64) -> Result<Option<TripData>, PersistenceError> {
    debug!(trip_id, "Looking up trip");

    let row: Option<TripJoinRow> = trips::table
        .inner_join(vans::table.on(vans::van_id.eq(trips::van_id)))
        .inner_join(routes::table.on(routes::route_id.eq(trips::route_id)))
        .filter(trips::trip_id.eq(trip_id))
        .select((
            TripRow::as_select(),
            vans::plate_number,
            vans::capacity,
            routes::name,
            routes::origin,
            routes::destination,
        ))
        .first(conn)
        .optional()?;

    let Some(row) = row else {
        return Ok(None);
    };

    let live_tickets: i64 = tickets::table
        .filter(tickets::trip_id.eq(trip_id))
        .filter(tickets::ticket_status.eq_any(LIVE_TICKET_STATUSES))
        .count()
        .get_result(conn)?;

    build_trip_data(row, live_tickets).map(Some)
}
}

backend_fn! {
/// Lists trips, optionally filtered by date and route, ordered by date
/// and departure time.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_trips(conn: &mut _, filter: &TripFilter) -> Result<Vec<TripData>, PersistenceError> {
    let mut query = trips::table
        .inner_join(vans::table.on(vans::van_id.eq(trips::van_id)))
        .inner_join(routes::table.on(routes::route_id.eq(trips::route_id)))
        .select((
            TripRow::as_select(),
            vans::plate_number,
            vans::capacity,
            routes::name,
            routes::origin,
            routes::destination,
        ))
        .order((
            trips::trip_date.asc(),
            trips::departure_time.asc(),
            trips::trip_id.asc(),
        ))
        .into_boxed();

    if let Some(trip_date) = &filter.trip_date {
        query = query.filter(trips::trip_date.eq(trip_date.clone()));
    }
    if let Some(route_id) = filter.route_id {
        query = query.filter(trips::route_id.eq(route_id));
    }

    let rows: Vec<TripJoinRow> = query.load(conn)?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let trip_ids: Vec<i64> = rows.iter().map(|(trip, ..)| trip.trip_id).collect();
    let counts: HashMap<i64, i64> = tickets::table
        .filter(tickets::trip_id.eq_any(&trip_ids))
        .filter(tickets::ticket_status.eq_any(LIVE_TICKET_STATUSES))
        .group_by(tickets::trip_id)
        .select((tickets::trip_id, diesel::dsl::count_star()))
        .load::<(i64, i64)>(conn)?
        .into_iter()
        .collect();

    rows.into_iter()
        .map(|row| {
            let live_tickets: i64 = counts.get(&row.0.trip_id).copied().unwrap_or(0);
            build_trip_data(row, live_tickets)
        })
        .collect()
}
}

backend_fn! {
/// Returns every seat on the trip's van with its derived occupancy.
///
/// # Errors
///
/// Returns `NotFound` if the trip does not exist, or an error if the
/// database query fails.
pub fn get_seat_map(
    conn: &mut _,
    trip_id: i64,
) -> Result<Vec<SeatAvailabilityData>, PersistenceError> {
    let van_id: i64 = trips::table
        .filter(trips::trip_id.eq(trip_id))
        .select(trips::van_id)
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Trip {trip_id} not found")))?;

    let seat_rows: Vec<(i64, String)> = seats::table
        .filter(seats::van_id.eq(van_id))
        .order(seats::seat_number.asc())
        .select((seats::seat_id, seats::seat_number))
        .load(conn)?;

    let live: Vec<(i64, String, String, String)> = tickets::table
        .filter(tickets::trip_id.eq(trip_id))
        .filter(tickets::ticket_status.eq_any(LIVE_TICKET_STATUSES))
        .select((
            tickets::seat_id,
            tickets::ticket_number,
            tickets::ticket_status,
            tickets::payment_status,
        ))
        .load(conn)?;

    let mut by_seat: HashMap<i64, (String, TicketStatus, PaymentStatus)> = HashMap::new();
    for (seat_id, ticket_number, ticket_status, payment_status) in live {
        by_seat.insert(
            seat_id,
            (ticket_number, ticket_status.parse()?, payment_status.parse()?),
        );
    }

    Ok(seat_rows
        .into_iter()
        .map(|(seat_id, seat_number)| {
            let holder = by_seat.remove(&seat_id);
            let occupancy = derive_occupancy(
                holder
                    .as_ref()
                    .map(|(_, ticket_status, payment_status)| (*ticket_status, *payment_status)),
            );
            SeatAvailabilityData {
                seat_id,
                seat_number,
                occupancy,
                ticket_number: holder.map(|(number, ..)| number),
            }
        })
        .collect())
}
}
