// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Route and van administration.
//!
//! A van's seats are owned by the van: they are created with it, regenerated
//! when its capacity changes and removed with it.

#[cfg(feature = "mysql")]
use diesel::MysqlConnection;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;
use vantrip_domain::{VanStatus, seat_numbers_for_capacity};

use crate::backend::PersistenceBackend;
use crate::data_models::{NewSeat, RouteFields, VanFields};
use crate::diesel_schema::{routes, seats, tickets, trips, vans};
use crate::error::PersistenceError;
use crate::mutations::now_timestamp;
#[cfg(feature = "mysql")]
use crate::queries::fleet::is_route_referenced_mysql;
use crate::queries::fleet::is_route_referenced_sqlite;

fn seat_rows(van_id: i64, capacity: u8) -> Vec<NewSeat> {
    seat_numbers_for_capacity(capacity)
        .into_iter()
        .map(|seat_number| NewSeat {
            van_id,
            seat_number,
        })
        .collect()
}

backend_fn! {
/// Creates a route and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_route(conn: &mut _, fields: &RouteFields) -> Result<i64, PersistenceError> {
    let created_at: String = now_timestamp()?;

    diesel::insert_into(routes::table)
        .values((
            routes::origin.eq(&fields.origin),
            routes::destination.eq(&fields.destination),
            routes::name.eq(&fields.name),
            routes::created_at.eq(&created_at),
        ))
        .execute(conn)?;

    let route_id: i64 = conn.get_last_insert_rowid()?;
    info!(route_id, name = %fields.name, "Created route");
    Ok(route_id)
}
}

backend_fn! {
/// Replaces a route's origin, destination and name.
///
/// # Errors
///
/// Returns `NotFound` if the route does not exist.
pub fn update_route(
    conn: &mut _,
    route_id: i64,
    fields: &RouteFields,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(routes::table.filter(routes::route_id.eq(route_id)))
        .set((
            routes::origin.eq(&fields.origin),
            routes::destination.eq(&fields.destination),
            routes::name.eq(&fields.name),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Route {route_id} not found"
        )));
    }

    info!(route_id, "Updated route");
    Ok(())
}
}

/// Deletes a route if no van or trip references it (`SQLite` version).
///
/// # Errors
///
/// Returns an error if:
/// - A van or trip references the route
/// - The route does not exist
/// - The database operation fails
pub fn delete_route_sqlite(
    conn: &mut SqliteConnection,
    route_id: i64,
) -> Result<(), PersistenceError> {
    info!("Attempting to delete route ID: {}", route_id);

    if is_route_referenced_sqlite(conn, route_id)? {
        return Err(PersistenceError::Referenced {
            resource: "route",
            id: route_id,
            referenced_by: "vans or trips",
        });
    }

    let rows_affected: usize = diesel::delete(routes::table)
        .filter(routes::route_id.eq(route_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Route {route_id} not found"
        )));
    }

    info!("Deleted route ID: {}", route_id);
    Ok(())
}

/// Deletes a route if no van or trip references it (`MySQL` version).
///
/// # Errors
///
/// Returns an error if:
/// - A van or trip references the route
/// - The route does not exist
/// - The database operation fails
#[cfg(feature = "mysql")]
pub fn delete_route_mysql(
    conn: &mut MysqlConnection,
    route_id: i64,
) -> Result<(), PersistenceError> {
    info!("Attempting to delete route ID: {}", route_id);

    if is_route_referenced_mysql(conn, route_id)? {
        return Err(PersistenceError::Referenced {
            resource: "route",
            id: route_id,
            referenced_by: "vans or trips",
        });
    }

    let rows_affected: usize = diesel::delete(routes::table)
        .filter(routes::route_id.eq(route_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Route {route_id} not found"
        )));
    }

    info!("Deleted route ID: {}", route_id);
    Ok(())
}

backend_fn! {
/// Creates a van together with seats `01..=capacity` and returns its ID.
///
/// # Errors
///
/// Returns `NotFound` if the assigned route does not exist and
/// `UniqueViolation` if the plate number is already registered.
pub fn create_van(conn: &mut _, fields: &VanFields) -> Result<i64, PersistenceError> {
    let created_at: String = now_timestamp()?;

    conn.transaction(|conn| {
        if let Some(route_id) = fields.route_id {
            let route_count: i64 = routes::table
                .filter(routes::route_id.eq(route_id))
                .count()
                .get_result(conn)?;
            if route_count == 0 {
                return Err(PersistenceError::NotFound(format!(
                    "Route {route_id} not found"
                )));
            }
        }

        diesel::insert_into(vans::table)
            .values((
                vans::plate_number.eq(&fields.plate_number),
                vans::capacity.eq(i32::from(fields.capacity)),
                vans::model.eq(&fields.model),
                vans::status.eq(fields.status.as_str()),
                vans::route_id.eq(fields.route_id),
                vans::created_at.eq(&created_at),
            ))
            .execute(conn)?;

        let van_id: i64 = conn.get_last_insert_rowid()?;

        diesel::insert_into(seats::table)
            .values(seat_rows(van_id, fields.capacity))
            .execute(conn)?;

        info!(
            van_id,
            plate_number = %fields.plate_number,
            capacity = fields.capacity,
            "Created van"
        );
        Ok(van_id)
    })
}
}

backend_fn! {
/// Replaces a van's fields.
///
/// When the capacity changes the van's seats are regenerated, which is only
/// allowed while no ticket references any of them.
///
/// # Errors
///
/// Returns `NotFound` if the van or assigned route does not exist,
/// `Referenced` if the capacity changes while tickets reference its seats,
/// and `UniqueViolation` if the plate number belongs to another van.
pub fn update_van(conn: &mut _, van_id: i64, fields: &VanFields) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        let current_capacity: i32 = vans::table
            .filter(vans::van_id.eq(van_id))
            .select(vans::capacity)
            .first(conn)
            .optional()?
            .ok_or_else(|| PersistenceError::NotFound(format!("Van {van_id} not found")))?;

        if let Some(route_id) = fields.route_id {
            let route_count: i64 = routes::table
                .filter(routes::route_id.eq(route_id))
                .count()
                .get_result(conn)?;
            if route_count == 0 {
                return Err(PersistenceError::NotFound(format!(
                    "Route {route_id} not found"
                )));
            }
        }

        let new_capacity: i32 = i32::from(fields.capacity);
        if new_capacity != current_capacity {
            let van_seats = seats::table
                .filter(seats::van_id.eq(van_id))
                .select(seats::seat_id);
            let ticket_count: i64 = tickets::table
                .filter(tickets::seat_id.eq_any(van_seats))
                .count()
                .get_result(conn)?;
            if ticket_count > 0 {
                return Err(PersistenceError::Referenced {
                    resource: "van",
                    id: van_id,
                    referenced_by: "tickets",
                });
            }

            diesel::delete(seats::table.filter(seats::van_id.eq(van_id))).execute(conn)?;
            diesel::insert_into(seats::table)
                .values(seat_rows(van_id, fields.capacity))
                .execute(conn)?;

            info!(
                van_id,
                from = current_capacity,
                to = new_capacity,
                "Regenerated van seats"
            );
        }

        diesel::update(vans::table.filter(vans::van_id.eq(van_id)))
            .set((
                vans::plate_number.eq(&fields.plate_number),
                vans::capacity.eq(new_capacity),
                vans::model.eq(&fields.model),
                vans::status.eq(fields.status.as_str()),
                vans::route_id.eq(fields.route_id),
            ))
            .execute(conn)?;

        info!(van_id, "Updated van");
        Ok(())
    })
}
}

backend_fn! {
/// Sets a van's operational status.
///
/// # Errors
///
/// Returns `NotFound` if the van does not exist.
pub fn set_van_status(
    conn: &mut _,
    van_id: i64,
    status: VanStatus,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(vans::table.filter(vans::van_id.eq(van_id)))
        .set(vans::status.eq(status.as_str()))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!("Van {van_id} not found")));
    }

    info!(van_id, status = %status, "Set van status");
    Ok(())
}
}

backend_fn! {
/// Deletes a van no trip references. Its seats are removed with it.
///
/// # Errors
///
/// Returns `Referenced` if a trip uses the van and `NotFound` if it does
/// not exist.
pub fn delete_van(conn: &mut _, van_id: i64) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        let trip_count: i64 = trips::table
            .filter(trips::van_id.eq(van_id))
            .count()
            .get_result(conn)?;
        if trip_count > 0 {
            return Err(PersistenceError::Referenced {
                resource: "van",
                id: van_id,
                referenced_by: "trips",
            });
        }

        let rows_affected: usize =
            diesel::delete(vans::table.filter(vans::van_id.eq(van_id))).execute(conn)?;
        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!("Van {van_id} not found")));
        }

        info!(van_id, "Deleted van");
        Ok(())
    })
}
}
