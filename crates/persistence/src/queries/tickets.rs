// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket and status history queries.

use diesel::prelude::*;
use num_traits::ToPrimitive;
use tracing::debug;
use vantrip_domain::Money;

use crate::data_models::{LiveTicketData, TicketData, TicketStatusHistoryData};
use crate::diesel_schema::{seats, ticket_status_history, tickets};
use crate::error::PersistenceError;
use crate::queries::LIVE_TICKET_STATUSES;

/// Diesel Queryable struct for ticket rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = tickets)]
struct TicketRow {
    ticket_id: i64,
    ticket_number: String,
    trip_id: i64,
    seat_id: i64,
    passenger_name: String,
    address: String,
    age: i32,
    phone: String,
    emergency_contact: String,
    passenger_type: String,
    payment_method: String,
    regular_fare_cents: i64,
    transaction_fee_cents: i64,
    discount_cents: i64,
    total_fare_cents: i64,
    payment_status: String,
    ticket_status: String,
    qr_payload: String,
    issued_by: Option<String>,
    created_at: String,
    updated_at: String,
}

fn build_ticket_data(row: TicketRow, seat_number: String) -> Result<TicketData, PersistenceError> {
    let age: u8 = row.age.to_u8().ok_or_else(|| {
        PersistenceError::ReconstructionError(format!(
            "ticket {} has out-of-range age {}",
            row.ticket_number, row.age
        ))
    })?;

    Ok(TicketData {
        ticket_id: row.ticket_id,
        ticket_number: row.ticket_number,
        trip_id: row.trip_id,
        seat_id: row.seat_id,
        seat_number,
        passenger_name: row.passenger_name,
        address: row.address,
        age,
        phone: row.phone,
        emergency_contact: row.emergency_contact,
        passenger_type: row.passenger_type.parse()?,
        payment_method: row.payment_method,
        regular_fare: Money::from_cents(row.regular_fare_cents),
        transaction_fee: Money::from_cents(row.transaction_fee_cents),
        discount: Money::from_cents(row.discount_cents),
        total_fare: Money::from_cents(row.total_fare_cents),
        payment_status: row.payment_status.parse()?,
        ticket_status: row.ticket_status.parse()?,
        qr_payload: row.qr_payload,
        issued_by: row.issued_by,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Diesel Queryable struct for status history rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = ticket_status_history)]
struct TicketStatusHistoryRow {
    history_id: i64,
    ticket_id: i64,
    previous_ticket_status: String,
    new_ticket_status: String,
    previous_payment_status: String,
    new_payment_status: String,
    changed_by: String,
    changed_at: String,
    note: Option<String>,
}

impl TryFrom<TicketStatusHistoryRow> for TicketStatusHistoryData {
    type Error = PersistenceError;

    fn try_from(row: TicketStatusHistoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            history_id: row.history_id,
            ticket_id: row.ticket_id,
            previous_ticket_status: row.previous_ticket_status.parse()?,
            new_ticket_status: row.new_ticket_status.parse()?,
            previous_payment_status: row.previous_payment_status.parse()?,
            new_payment_status: row.new_payment_status.parse()?,
            changed_by: row.changed_by,
            changed_at: row.changed_at,
            note: row.note,
        })
    }
}

backend_fn! {
/// Returns the live ticket holding a seat on a trip.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the seat is not held.
pub fn find_live_ticket(
    conn: &mut _,
    trip_id: i64,
    seat_id: i64,
) -> Result<Option<LiveTicketData>, PersistenceError> {
    let row: Option<(i64, String, String, String)> = tickets::table
        .filter(tickets::trip_id.eq(trip_id))
        .filter(tickets::seat_id.eq(seat_id))
        .filter(tickets::ticket_status.eq_any(LIVE_TICKET_STATUSES))
        .select((
            tickets::ticket_id,
            tickets::ticket_number,
            tickets::ticket_status,
            tickets::payment_status,
        ))
        .first(conn)
        .optional()?;

    let Some((ticket_id, ticket_number, ticket_status, payment_status)) = row else {
        return Ok(None);
    };

    Ok(Some(LiveTicketData {
        ticket_id,
        ticket_number,
        ticket_status: ticket_status.parse()?,
        payment_status: payment_status.parse()?,
    }))
}
}

backend_fn! {
/// Retrieves a ticket by its public number.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
/// Returns `Ok(None)` if no ticket has that number.
pub fn get_ticket_by_number(
    conn: &mut _,
    ticket_number: &str,
) -> Result<Option<TicketData>, PersistenceError> {
    debug!(ticket_number, "Looking up ticket");

    let row: Option<(TicketRow, String)> = tickets::table
        .inner_join(seats::table.on(seats::seat_id.eq(tickets::seat_id)))
        .filter(tickets::ticket_number.eq(ticket_number))
        .select((TicketRow::as_select(), seats::seat_number))
        .first(conn)
        .optional()?;

    row.map(|(ticket, seat_number)| build_ticket_data(ticket, seat_number))
        .transpose()
}
}

backend_fn! {
/// Lists every ticket of a trip, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_tickets_for_trip(
    conn: &mut _,
    trip_id: i64,
) -> Result<Vec<TicketData>, PersistenceError> {
    let rows: Vec<(TicketRow, String)> = tickets::table
        .inner_join(seats::table.on(seats::seat_id.eq(tickets::seat_id)))
        .filter(tickets::trip_id.eq(trip_id))
        .order((tickets::created_at.desc(), tickets::ticket_id.desc()))
        .select((TicketRow::as_select(), seats::seat_number))
        .load(conn)?;

    rows.into_iter()
        .map(|(ticket, seat_number)| build_ticket_data(ticket, seat_number))
        .collect()
}
}

backend_fn! {
/// Lists a ticket's recorded status changes, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_ticket_status_history(
    conn: &mut _,
    ticket_id: i64,
) -> Result<Vec<TicketStatusHistoryData>, PersistenceError> {
    let rows: Vec<TicketStatusHistoryRow> = ticket_status_history::table
        .filter(ticket_status_history::ticket_id.eq(ticket_id))
        .order(ticket_status_history::history_id.asc())
        .select(TicketStatusHistoryRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(TicketStatusHistoryData::try_from)
        .collect()
}
}
