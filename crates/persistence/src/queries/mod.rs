// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `fleet` — Routes, vans and seats
//! - `trips` — Trips, derived seat counts and seat maps
//! - `tickets` — Tickets and their status history
//!
//! ## Backend-Specific Functions
//!
//! All query functions are generated in backend-specific monomorphic versions:
//! - Functions suffixed with `_sqlite` for `SQLite`
//! - Functions suffixed with `_mysql` for `MySQL`/`MariaDB`
//!
//! The `Persistence` adapter in `lib.rs` dispatches to the appropriate version
//! based on the active backend connection.

pub mod fleet;
pub mod tickets;
pub mod trips;

/// Ticket statuses that hold a seat.
pub(crate) const LIVE_TICKET_STATUSES: [&str; 2] = ["ACTIVE", "USED"];
