// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for van-trip ticketing.
//!
//! This crate stores routes, vans, seats, trips and tickets. It is built on
//! Diesel and supports multiple database backends.
//!
//! ## Database Backend Support
//!
//! - **`SQLite`** (default) — development, unit tests, integration tests,
//!   and single-node deployments
//! - **`MariaDB`/`MySQL`** — compiled with the `mysql` cargo feature and
//!   validated via explicit opt-in tests
//!
//! To run `MySQL` validation tests:
//! ```bash
//! cargo xtask test-mariadb
//! ```
//!
//! ### Migration Strategy
//!
//! Due to `SQL` syntax differences between backends, we maintain separate
//! migration directories:
//!
//! - `migrations/` — `SQLite`-specific (default)
//! - `migrations_mysql/` — `MySQL`/`MariaDB`-specific
//!
//! Both produce identical schema semantics. `cargo xtask verify-migrations`
//! checks that they stay that way.
//!
//! ## Seat Invariant
//!
//! For any `(trip, seat)` at most one ticket is live (ACTIVE or USED).
//! Issuance checks this inside a transaction, and the `uq_tickets_live_seat`
//! unique index enforces it regardless of what the application does. The
//! number of available seats is never stored; it is derived from the van's
//! capacity and the live ticket count on every read.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

#[cfg(feature = "mysql")]
use diesel::MysqlConnection;
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use vantrip_domain::{StatusChange, TripStatus, VanStatus};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID so tests
/// never share a database.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Macro to generate monomorphic backend-specific query/mutation functions.
///
/// This macro generates two separate functions from a single function body:
/// - One suffixed with `_sqlite` taking `&mut SqliteConnection`
/// - One suffixed with `_mysql` taking `&mut MysqlConnection`, compiled only
///   with the `mysql` feature
///
/// Diesel's type system requires concrete backend types at compile time and
/// cannot handle generic backend functions, so the body is duplicated rather
/// than abstracted.
///
/// # Usage
///
/// ```ignore
/// backend_fn! {
///     pub fn my_query(conn: &mut _, param: i64) -> Result<String, PersistenceError> {
///         diesel_schema::table::table
///             .filter(diesel_schema::table::id.eq(param))
///             .first::<String>(conn)
///             .map_err(Into::into)
///     }
/// }
/// ```
macro_rules! backend_fn {
    (
        $(#[$meta:meta])*
        $vis:vis fn $name:ident (
            $conn:ident : &mut _
            $(, $param:ident : $param_ty:ty)* $(,)?
        ) -> $ret:ty
        $body:block
    ) => {
        pastey::paste! {
            $(#[$meta])*
            $vis fn [<$name _sqlite>] (
                $conn: &mut diesel::SqliteConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body

            #[cfg(feature = "mysql")]
            $(#[$meta])*
            $vis fn [<$name _mysql>] (
                $conn: &mut diesel::MysqlConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body
        }
    };
}

/// Dispatches a call to the `_sqlite` or `_mysql` variant generated by
/// `backend_fn!` based on the adapter's active connection.
macro_rules! dispatch {
    ($self:ident, $($module:ident)::+, $name:ident ( $($arg:expr),* $(,)? )) => {
        pastey::paste! {
            match &mut $self.conn {
                BackendConnection::Sqlite(conn) => {
                    $($module)::+::[<$name _sqlite>](conn $(, $arg)*)
                }
                #[cfg(feature = "mysql")]
                BackendConnection::Mysql(conn) => {
                    $($module)::+::[<$name _mysql>](conn $(, $arg)*)
                }
            }
        }
    };
}

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    LiveTicketData, NewTicket, NewTripData, RouteData, RouteFields, SeatAvailabilityData,
    SeatData, TicketData, TicketStatusHistoryData, TripData, TripFilter, VanData, VanFields,
};
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Type alias kept for call sites that only ever use `SQLite`.
pub type SqlitePersistence = Persistence;

/// Backend-specific database connection.
pub enum BackendConnection {
    Sqlite(SqliteConnection),
    #[cfg(feature = "mysql")]
    Mysql(MysqlConnection),
}

/// Persistence adapter for the ticketing data.
///
/// Backend selection happens once at construction time and is transparent
/// to callers.
pub struct Persistence {
    pub(crate) conn: BackendConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_vantrip_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: BackendConnection::Sqlite(conn),
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: BackendConnection::Sqlite(conn),
        })
    }

    /// Creates a new persistence adapter with a `MySQL`/`MariaDB` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    #[cfg(feature = "mysql")]
    pub fn new_with_mysql(database_url: &str) -> Result<Self, PersistenceError> {
        let mut conn: MysqlConnection = backend::mysql::initialize_database(database_url)?;
        backend::mysql::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: BackendConnection::Mysql(conn),
        })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.verify_foreign_key_enforcement(),
            #[cfg(feature = "mysql")]
            BackendConnection::Mysql(conn) => conn.verify_foreign_key_enforcement(),
        }
    }

    // ========================================================================
    // Routes
    // ========================================================================

    /// Creates a route and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_route(&mut self, fields: &RouteFields) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::fleet, create_route(fields))
    }

    /// Replaces a route's fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the route does not exist.
    pub fn update_route(
        &mut self,
        route_id: i64,
        fields: &RouteFields,
    ) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::fleet, update_route(route_id, fields))
    }

    /// Deletes a route that no van or trip references.
    ///
    /// # Errors
    ///
    /// Returns `Referenced` if the route is still in use, or `NotFound`.
    pub fn delete_route(&mut self, route_id: i64) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::fleet, delete_route(route_id))
    }

    /// Retrieves a route by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. Returns `Ok(None)` if not found.
    pub fn get_route(&mut self, route_id: i64) -> Result<Option<RouteData>, PersistenceError> {
        dispatch!(self, queries::fleet, get_route(route_id))
    }

    /// Lists all routes ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_routes(&mut self) -> Result<Vec<RouteData>, PersistenceError> {
        dispatch!(self, queries::fleet, list_routes())
    }

    // ========================================================================
    // Vans & Seats
    // ========================================================================

    /// Creates a van and its seats in one transaction. Returns the van ID.
    ///
    /// # Errors
    ///
    /// Returns `UniqueViolation` if the plate number is taken.
    pub fn create_van(&mut self, fields: &VanFields) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::fleet, create_van(fields))
    }

    /// Replaces a van's fields. A capacity change regenerates its seats.
    ///
    /// # Errors
    ///
    /// Returns `Referenced` if the capacity changes while tickets reference
    /// the van's seats, or `NotFound`.
    pub fn update_van(&mut self, van_id: i64, fields: &VanFields) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::fleet, update_van(van_id, fields))
    }

    /// Sets only a van's operational status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the van does not exist.
    pub fn set_van_status(
        &mut self,
        van_id: i64,
        status: VanStatus,
    ) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::fleet, set_van_status(van_id, status))
    }

    /// Deletes a van no trip references. Its seats go with it.
    ///
    /// # Errors
    ///
    /// Returns `Referenced` if trips use the van, or `NotFound`.
    pub fn delete_van(&mut self, van_id: i64) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::fleet, delete_van(van_id))
    }

    /// Retrieves a van by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. Returns `Ok(None)` if not found.
    pub fn get_van(&mut self, van_id: i64) -> Result<Option<VanData>, PersistenceError> {
        dispatch!(self, queries::fleet, get_van(van_id))
    }

    /// Lists all vans ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_vans(&mut self) -> Result<Vec<VanData>, PersistenceError> {
        dispatch!(self, queries::fleet, list_vans())
    }

    /// Lists a van's seats ordered by seat number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_seats(&mut self, van_id: i64) -> Result<Vec<SeatData>, PersistenceError> {
        dispatch!(self, queries::fleet, list_seats(van_id))
    }

    /// Retrieves a seat by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. Returns `Ok(None)` if not found.
    pub fn get_seat(&mut self, seat_id: i64) -> Result<Option<SeatData>, PersistenceError> {
        dispatch!(self, queries::fleet, get_seat(seat_id))
    }

    // ========================================================================
    // Trips
    // ========================================================================

    /// Schedules a trip in SCHEDULED status and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns `UniqueViolation` if the van already has a trip that day.
    pub fn create_trip(&mut self, trip: &NewTripData) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::trips, create_trip(trip))
    }

    /// Moves a trip from `expected` to `new_status` if it is still in
    /// `expected`.
    ///
    /// # Errors
    ///
    /// Returns `ConcurrentModification` if the stored status differs from
    /// `expected`.
    pub fn update_trip_status(
        &mut self,
        trip_id: i64,
        expected: TripStatus,
        new_status: TripStatus,
    ) -> Result<(), PersistenceError> {
        dispatch!(
            self,
            mutations::trips,
            update_trip_status(trip_id, expected, new_status)
        )
    }

    /// Deletes a trip without tickets.
    ///
    /// # Errors
    ///
    /// Returns `Referenced` if any ticket exists for the trip, or `NotFound`.
    pub fn delete_trip(&mut self, trip_id: i64) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::trips, delete_trip(trip_id))
    }

    /// Retrieves a trip with its derived seat counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. Returns `Ok(None)` if not found.
    pub fn get_trip(&mut self, trip_id: i64) -> Result<Option<TripData>, PersistenceError> {
        dispatch!(self, queries::trips, get_trip(trip_id))
    }

    /// Lists trips ordered by date and departure time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_trips(&mut self, filter: &TripFilter) -> Result<Vec<TripData>, PersistenceError> {
        dispatch!(self, queries::trips, list_trips(filter))
    }

    /// Returns the occupancy of every seat on the trip's van.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the trip does not exist.
    pub fn get_seat_map(
        &mut self,
        trip_id: i64,
    ) -> Result<Vec<SeatAvailabilityData>, PersistenceError> {
        dispatch!(self, queries::trips, get_seat_map(trip_id))
    }

    /// Returns the live ticket on a `(trip, seat)` pair, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_live_ticket(
        &mut self,
        trip_id: i64,
        seat_id: i64,
    ) -> Result<Option<LiveTicketData>, PersistenceError> {
        dispatch!(self, queries::tickets, find_live_ticket(trip_id, seat_id))
    }

    // ========================================================================
    // Tickets
    // ========================================================================

    /// Inserts a ticket if its seat is free, atomically.
    ///
    /// # Errors
    ///
    /// Returns `SeatAlreadyTaken` if a live ticket holds the seat (whether
    /// detected by the pre-check or by the unique index) and
    /// `DuplicateTicketNumber` if the number is already used.
    pub fn issue_ticket(&mut self, ticket: &NewTicket) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::tickets, issue_ticket(ticket))
    }

    /// Applies a planned status change with compare-and-set semantics and
    /// records it in the ticket's status history.
    ///
    /// # Errors
    ///
    /// Returns `ConcurrentModification` if either status changed since the
    /// plan was made.
    pub fn apply_ticket_status_change(
        &mut self,
        ticket_id: i64,
        change: &StatusChange,
        changed_by: &str,
        note: Option<&str>,
    ) -> Result<(), PersistenceError> {
        dispatch!(
            self,
            mutations::tickets,
            apply_ticket_status_change(ticket_id, change, changed_by, note)
        )
    }

    /// Retrieves a ticket by its public number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. Returns `Ok(None)` if not found.
    pub fn get_ticket_by_number(
        &mut self,
        ticket_number: &str,
    ) -> Result<Option<TicketData>, PersistenceError> {
        dispatch!(self, queries::tickets, get_ticket_by_number(ticket_number))
    }

    /// Lists all tickets of a trip, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tickets_for_trip(
        &mut self,
        trip_id: i64,
    ) -> Result<Vec<TicketData>, PersistenceError> {
        dispatch!(self, queries::tickets, list_tickets_for_trip(trip_id))
    }

    /// Lists a ticket's status history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_ticket_status_history(
        &mut self,
        ticket_id: i64,
    ) -> Result<Vec<TicketStatusHistoryData>, PersistenceError> {
        dispatch!(self, queries::tickets, list_ticket_status_history(ticket_id))
    }
}
