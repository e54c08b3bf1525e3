// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use tracing::info;
use vantrip_domain::TripStatus;

use crate::backend::PersistenceBackend;
use crate::data_models::NewTripData;
use crate::diesel_schema::{routes, tickets, trips, vans};
use crate::error::PersistenceError;
use crate::mutations::now_timestamp;

backend_fn! {
/// Schedules a trip in SCHEDULED status and returns its ID.
///
/// # Errors
///
/// Returns `NotFound` if the van or route does not exist and
/// `UniqueViolation` if the van already has a trip on that date.
pub fn create_trip(conn: &mut _, trip: &NewTripData) -> Result<i64, PersistenceError> {
    let created_at: String = now_timestamp()?;

    conn.transaction(|conn| {
        let van_count: i64 = vans::table
            .filter(vans::van_id.eq(trip.van_id))
            .count()
            .get_result(conn)?;
        if van_count == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Van {} not found",
                trip.van_id
            )));
        }

        let route_count: i64 = routes::table
            .filter(routes::route_id.eq(trip.route_id))
            .count()
            .get_result(conn)?;
        if route_count == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Route {} not found",
                trip.route_id
            )));
        }

        diesel::insert_into(trips::table)
            .values((
                trips::van_id.eq(trip.van_id),
                trips::route_id.eq(trip.route_id),
                trips::trip_date.eq(&trip.trip_date),
                trips::departure_time.eq(&trip.departure_time),
                trips::arrival_time.eq(trip.arrival_time.as_deref()),
                trips::driver_name.eq(trip.driver_name.as_deref()),
                trips::driver_phone.eq(trip.driver_phone.as_deref()),
                trips::status.eq(TripStatus::Scheduled.as_str()),
                trips::created_at.eq(&created_at),
            ))
            .execute(conn)?;

        let trip_id: i64 = conn.get_last_insert_rowid()?;
        info!(
            trip_id,
            van_id = trip.van_id,
            trip_date = %trip.trip_date,
            "Scheduled trip"
        );
        Ok(trip_id)
    })
}
}

backend_fn! {
/// Moves a trip to `new_status` only if it is still in `expected`.
///
/// # Errors
///
/// Returns `NotFound` if the trip does not exist and
/// `ConcurrentModification` if its status is no longer `expected`.
pub fn update_trip_status(
    conn: &mut _,
    trip_id: i64,
    expected: TripStatus,
    new_status: TripStatus,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(
        trips::table
            .filter(trips::trip_id.eq(trip_id))
            .filter(trips::status.eq(expected.as_str())),
    )
    .set(trips::status.eq(new_status.as_str()))
    .execute(conn)?;

    if rows_affected == 0 {
        let exists: i64 = trips::table
            .filter(trips::trip_id.eq(trip_id))
            .count()
            .get_result(conn)?;
        if exists == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Trip {trip_id} not found"
            )));
        }
        return Err(PersistenceError::ConcurrentModification(format!(
            "trip {trip_id} is no longer {expected}"
        )));
    }

    info!(trip_id, from = %expected, to = %new_status, "Changed trip status");
    Ok(())
}
}

backend_fn! {
/// Deletes a trip that has never had a ticket.
///
/// # Errors
///
/// Returns `Referenced` if any ticket exists for the trip and `NotFound`
/// if it does not exist.
pub fn delete_trip(conn: &mut _, trip_id: i64) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        let ticket_count: i64 = tickets::table
            .filter(tickets::trip_id.eq(trip_id))
            .count()
            .get_result(conn)?;
        if ticket_count > 0 {
            return Err(PersistenceError::Referenced {
                resource: "trip",
                id: trip_id,
                referenced_by: "tickets",
            });
        }

        let rows_affected: usize =
            diesel::delete(trips::table.filter(trips::trip_id.eq(trip_id))).execute(conn)?;
        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Trip {trip_id} not found"
            )));
        }

        info!(trip_id, "Deleted trip");
        Ok(())
    })
}
}
