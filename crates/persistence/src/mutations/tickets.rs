// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket issuance and status changes.
//!
//! Issuance checks the seat inside a write transaction and then inserts.
//! On `SQLite` that transaction takes the write lock up front, so a
//! competing issuance waits and then sees the winner's row. The
//! pre-check produces a clean error in the common case; the
//! `uq_tickets_live_seat` index is what actually makes two concurrent
//! issuances for the same seat impossible, so its violation is mapped to
//! the same error.

use diesel::prelude::*;
use tracing::{info, warn};
use vantrip_domain::StatusChange;

use crate::backend::PersistenceBackend;
use crate::data_models::{NewTicket, NewTicketStatusHistory};
use crate::diesel_schema::{ticket_status_history, tickets};
use crate::error::PersistenceError;
use crate::mutations::now_timestamp;
use crate::queries::LIVE_TICKET_STATUSES;

/// Maps a uniqueness violation raised by a ticket insert to the constraint
/// that caused it.
///
/// `SQLite` reports the offending columns and `MySQL` the index name; both
/// mention the column names used here.
fn classify_insert_error(err: PersistenceError, ticket: &NewTicket) -> PersistenceError {
    match err {
        PersistenceError::UniqueViolation(msg) if msg.contains("live_seat") => {
            PersistenceError::SeatAlreadyTaken {
                trip_id: ticket.trip_id,
                seat_id: ticket.seat_id,
            }
        }
        PersistenceError::UniqueViolation(msg) if msg.contains("ticket_number") => {
            PersistenceError::DuplicateTicketNumber(ticket.ticket_number.clone())
        }
        other => other,
    }
}

backend_fn! {
/// Inserts a ticket row without any pre-check and returns its ID.
///
/// Only tests use this, to show the unique index holds on its own.
///
/// # Errors
///
/// Returns `SeatAlreadyTaken` or `DuplicateTicketNumber` when a unique
/// index rejects the row.
#[cfg(test)]
pub(crate) fn insert_ticket_row(conn: &mut _, ticket: &NewTicket) -> Result<i64, PersistenceError> {
    diesel::insert_into(tickets::table)
        .values(ticket)
        .execute(conn)
        .map_err(|e| classify_insert_error(PersistenceError::from(e), ticket))?;

    conn.get_last_insert_rowid()
}
}

backend_fn! {
/// Issues a ticket if its seat is free on the trip, atomically.
///
/// # Errors
///
/// Returns `SeatAlreadyTaken` if a live ticket holds the seat and
/// `DuplicateTicketNumber` if the ticket number is already used.
pub fn issue_ticket(conn: &mut _, ticket: &NewTicket) -> Result<i64, PersistenceError> {
    let ticket_id: i64 = conn.write_transaction(|conn| {
        let live_count: i64 = tickets::table
            .filter(tickets::trip_id.eq(ticket.trip_id))
            .filter(tickets::seat_id.eq(ticket.seat_id))
            .filter(tickets::ticket_status.eq_any(LIVE_TICKET_STATUSES))
            .count()
            .get_result(conn)?;
        if live_count > 0 {
            return Err(PersistenceError::SeatAlreadyTaken {
                trip_id: ticket.trip_id,
                seat_id: ticket.seat_id,
            });
        }

        let number_count: i64 = tickets::table
            .filter(tickets::ticket_number.eq(&ticket.ticket_number))
            .count()
            .get_result(conn)?;
        if number_count > 0 {
            return Err(PersistenceError::DuplicateTicketNumber(
                ticket.ticket_number.clone(),
            ));
        }

        diesel::insert_into(tickets::table)
            .values(ticket)
            .execute(conn)
            .map_err(|e| classify_insert_error(PersistenceError::from(e), ticket))?;

        conn.get_last_insert_rowid()
    })?;

    info!(
        ticket_id,
        ticket_number = %ticket.ticket_number,
        trip_id = ticket.trip_id,
        seat_id = ticket.seat_id,
        payment_status = %ticket.payment_status,
        "Issued ticket"
    );
    Ok(ticket_id)
}
}

backend_fn! {
/// Applies a status change if both statuses still hold their previous
/// values, and records it in the status history.
///
/// # Errors
///
/// Returns `NotFound` if the ticket does not exist and
/// `ConcurrentModification` if either status changed in the meantime.
pub fn apply_ticket_status_change(
    conn: &mut _,
    ticket_id: i64,
    change: &StatusChange,
    changed_by: &str,
    note: Option<&str>,
) -> Result<(), PersistenceError> {
    let changed_at: String = now_timestamp()?;

    conn.write_transaction(|conn| {
        let rows_affected: usize = diesel::update(
            tickets::table
                .filter(tickets::ticket_id.eq(ticket_id))
                .filter(tickets::ticket_status.eq(change.previous_ticket_status.as_str()))
                .filter(tickets::payment_status.eq(change.previous_payment_status.as_str())),
        )
        .set((
            tickets::ticket_status.eq(change.new_ticket_status.as_str()),
            tickets::payment_status.eq(change.new_payment_status.as_str()),
            tickets::updated_at.eq(&changed_at),
        ))
        .execute(conn)?;

        if rows_affected == 0 {
            let exists: i64 = tickets::table
                .filter(tickets::ticket_id.eq(ticket_id))
                .count()
                .get_result(conn)?;
            if exists == 0 {
                return Err(PersistenceError::NotFound(format!(
                    "Ticket {ticket_id} not found"
                )));
            }
            warn!(ticket_id, "Ticket status changed concurrently");
            return Err(PersistenceError::ConcurrentModification(format!(
                "ticket {ticket_id} is no longer {}/{}",
                change.previous_ticket_status, change.previous_payment_status
            )));
        }

        diesel::insert_into(ticket_status_history::table)
            .values(NewTicketStatusHistory {
                ticket_id,
                previous_ticket_status: change.previous_ticket_status.as_str().to_string(),
                new_ticket_status: change.new_ticket_status.as_str().to_string(),
                previous_payment_status: change.previous_payment_status.as_str().to_string(),
                new_payment_status: change.new_payment_status.as_str().to_string(),
                changed_by: changed_by.to_string(),
                changed_at: changed_at.clone(),
                note: note.map(str::to_string),
            })
            .execute(conn)?;

        info!(
            ticket_id,
            ticket_status = %change.new_ticket_status,
            payment_status = %change.new_payment_status,
            changed_by,
            "Changed ticket status"
        );
        Ok(())
    })
}
}
