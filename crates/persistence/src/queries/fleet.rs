// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Route, van and seat queries.

use diesel::prelude::*;
use num_traits::ToPrimitive;
use tracing::debug;
use vantrip_domain::VanStatus;

use crate::data_models::{RouteData, SeatData, VanData};
use crate::diesel_schema::{routes, seats, trips, vans};
use crate::error::PersistenceError;

/// Diesel Queryable struct for route rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = routes)]
pub struct RouteRow {
    pub route_id: i64,
    pub origin: String,
    pub destination: String,
    pub name: String,
    pub created_at: String,
}

impl From<RouteRow> for RouteData {
    fn from(row: RouteRow) -> Self {
        Self {
            route_id: row.route_id,
            origin: row.origin,
            destination: row.destination,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

/// Diesel Queryable struct for van rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = vans)]
pub struct VanRow {
    pub van_id: i64,
    pub plate_number: String,
    pub capacity: i32,
    pub model: String,
    pub status: String,
    pub route_id: Option<i64>,
    pub created_at: String,
}

impl TryFrom<VanRow> for VanData {
    type Error = PersistenceError;

    fn try_from(row: VanRow) -> Result<Self, Self::Error> {
        let capacity: u8 = row.capacity.to_u8().ok_or_else(|| {
            PersistenceError::ReconstructionError(format!(
                "van {} has out-of-range capacity {}",
                row.van_id, row.capacity
            ))
        })?;
        let status: VanStatus = row.status.parse()?;

        Ok(Self {
            van_id: row.van_id,
            plate_number: row.plate_number,
            capacity,
            model: row.model,
            status,
            route_id: row.route_id,
            created_at: row.created_at,
        })
    }
}

/// Diesel Queryable struct for seat rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = seats)]
pub struct SeatRow {
    pub seat_id: i64,
    pub van_id: i64,
    pub seat_number: String,
}

impl From<SeatRow> for SeatData {
    fn from(row: SeatRow) -> Self {
        Self {
            seat_id: row.seat_id,
            van_id: row.van_id,
            seat_number: row.seat_number,
        }
    }
}

backend_fn! {
/// Retrieves a route by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the route is not found.
pub fn get_route(conn: &mut _, route_id: i64) -> Result<Option<RouteData>, PersistenceError> {
    debug!(route_id, "Looking up route");

    let row: Option<RouteRow> = routes::table
        .filter(routes::route_id.eq(route_id))
        .select(RouteRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(RouteData::from))
}
}

backend_fn! {
/// Lists all routes ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_routes(conn: &mut _) -> Result<Vec<RouteData>, PersistenceError> {
    let rows: Vec<RouteRow> = routes::table
        .order(routes::route_id.asc())
        .select(RouteRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(RouteData::from).collect())
}
}

backend_fn! {
/// Returns true if any van or trip references the route.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn is_route_referenced(conn: &mut _, route_id: i64) -> Result<bool, PersistenceError> {
    let van_count: i64 = vans::table
        .filter(vans::route_id.eq(route_id))
        .count()
        .get_result(conn)?;
    if van_count > 0 {
        return Ok(true);
    }

    let trip_count: i64 = trips::table
        .filter(trips::route_id.eq(route_id))
        .count()
        .get_result(conn)?;

    Ok(trip_count > 0)
}
}

backend_fn! {
/// Retrieves a van by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
/// Returns `Ok(None)` if the van is not found.
pub fn get_van(conn: &mut _, van_id: i64) -> Result<Option<VanData>, PersistenceError> {
    debug!(van_id, "Looking up van");

    let row: Option<VanRow> = vans::table
        .filter(vans::van_id.eq(van_id))
        .select(VanRow::as_select())
        .first(conn)
        .optional()?;

    row.map(VanData::try_from).transpose()
}
}

backend_fn! {
/// Lists all vans ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_vans(conn: &mut _) -> Result<Vec<VanData>, PersistenceError> {
    let rows: Vec<VanRow> = vans::table
        .order(vans::van_id.asc())
        .select(VanRow::as_select())
        .load(conn)?;

    rows.into_iter().map(VanData::try_from).collect()
}
}

backend_fn! {
/// Lists a van's seats ordered by seat number.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_seats(conn: &mut _, van_id: i64) -> Result<Vec<SeatData>, PersistenceError> {
    let rows: Vec<SeatRow> = seats::table
        .filter(seats::van_id.eq(van_id))
        .order(seats::seat_number.asc())
        .select(SeatRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(SeatData::from).collect())
}
}

backend_fn! {
/// Retrieves a seat by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the seat is not found.
pub fn get_seat(conn: &mut _, seat_id: i64) -> Result<Option<SeatData>, PersistenceError> {
    let row: Option<SeatRow> = seats::table
        .filter(seats::seat_id.eq(seat_id))
        .select(SeatRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(SeatData::from))
}
}
