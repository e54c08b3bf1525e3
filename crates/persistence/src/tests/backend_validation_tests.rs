// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend validation tests for multi-database support.
//!
//! These tests validate that the persistence layer works correctly
//! across different database backends (`SQLite`, MariaDB/MySQL).
//!
//! ## Purpose
//!
//! The purpose of these tests is to ensure:
//! 1. Migrations apply cleanly on all supported backends
//! 2. Foreign key constraints are enforced correctly
//! 3. Unique constraints work as expected
//! 4. Transactions and rollback behavior is consistent
//! 5. Backend-specific behavior is documented and tested
//!
//! ## Test Execution
//!
//! - `SQLite` tests run normally via `cargo test`
//! - MariaDB/MySQL tests are marked `#[ignore]` and run only via `cargo xtask test-mariadb`
//!
//! ## Infrastructure Requirements
//!
//! `MariaDB` tests require:
//! - `DATABASE_URL` environment variable (set by xtask)
//! - `VANTRIP_TEST_BACKEND=mariadb` environment variable
//! - Running `MariaDB` instance (provisioned by xtask)
//!
//! Tests fail fast if required infrastructure is missing.
//!
//! ## What These Tests Validate
//!
//! These tests focus on **infrastructure and schema compatibility**, not business logic:
//! - Schema creation and migration application
//! - Database constraint enforcement (FK, UNIQUE, CHECK)
//! - Transaction semantics
//! - Backend-specific SQL compatibility
//!
//! Business logic and domain rules are validated by the standard test suite
//! running against `SQLite`. These backend validation tests ensure the
//! persistence layer works correctly on additional databases.
//!
//! ## Adding New Backend Validation Tests
//!
//! When adding a new test:
//! 1. Mark it with `#[ignore]`
//! 2. Call `verify_mariadb_test_environment()` first
//! 3. Use raw SQL to test schema-level behavior
//! 4. Clean up test data if needed (or use transactions)
//! 5. Document what backend-specific behavior is being validated

use diesel::MysqlConnection;
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use std::env;

use vantrip_domain::PaymentStatus;

use crate::backend::mysql;
use crate::mutations::tickets::insert_ticket_row_mysql;
use crate::tests::{test_ticket, test_trip_data, test_van_fields};
use crate::{BackendConnection, Persistence, PersistenceError, RouteFields};

/// Result type for COUNT queries.
#[derive(QueryableByName)]
struct CountResult {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Helper to get the `MariaDB` connection URL from environment.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set, indicating missing infrastructure.
fn get_mariadb_url() -> String {
    env::var("DATABASE_URL")
        .expect("DATABASE_URL not set - MariaDB tests must be run via `cargo xtask test-mariadb`")
}

/// Helper to verify we're running in the `MariaDB` test environment.
///
/// # Panics
///
/// Panics if `VANTRIP_TEST_BACKEND` is not set to `mariadb`.
fn verify_mariadb_test_environment() {
    let backend = env::var("VANTRIP_TEST_BACKEND").expect(
        "VANTRIP_TEST_BACKEND not set - MariaDB tests must be run via `cargo xtask test-mariadb`",
    );
    assert_eq!(backend, "mariadb", "VANTRIP_TEST_BACKEND must be 'mariadb'");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_connection() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let result = MysqlConnection::establish(&url);
    assert!(
        result.is_ok(),
        "Failed to connect to MariaDB: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_migrations_apply_cleanly() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let result = mysql::initialize_database(&url);
    assert!(
        result.is_ok(),
        "Failed to initialize MariaDB and run migrations: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_foreign_key_enforcement() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    let result = mysql::verify_foreign_key_enforcement(&mut conn);
    assert!(
        result.is_ok(),
        "Foreign key enforcement verification failed: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_plate_number_unique_constraint() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    diesel::sql_query(
        "INSERT INTO vans (plate_number, capacity, model, status, created_at)
         VALUES ('MDB 0001', 12, 'Hiace', 'ACTIVE', '2026-01-01T00:00:00Z')",
    )
    .execute(&mut conn)
    .expect("Failed to insert test van");

    let duplicate_result = diesel::sql_query(
        "INSERT INTO vans (plate_number, capacity, model, status, created_at)
         VALUES ('MDB 0001', 8, 'Urvan', 'ACTIVE', '2026-01-01T00:00:00Z')",
    )
    .execute(&mut conn);

    assert!(
        duplicate_result.is_err(),
        "Duplicate plate_number should fail due to UNIQUE constraint"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_seat_foreign_key() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    let result = diesel::sql_query("INSERT INTO seats (van_id, seat_number) VALUES (99999, '01')")
        .execute(&mut conn);

    assert!(
        result.is_err(),
        "Inserting a seat with non-existent van_id should fail due to foreign key constraint"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_live_seat_unique_index() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut persistence =
        Persistence::new_with_mysql(&url).expect("Failed to initialize MariaDB database");

    let route_id = persistence
        .create_route(&RouteFields {
            origin: String::from("Tacloban"),
            destination: String::from("Borongan"),
            name: String::from("Tacloban - Borongan"),
        })
        .expect("Failed to create route");
    let plate: String = format!("MDB {}", std::process::id());
    let van_id = persistence
        .create_van(&test_van_fields(&plate, 4, Some(route_id)))
        .expect("Failed to create van");
    let trip_id = persistence
        .create_trip(&test_trip_data(van_id, route_id, "2099-12-31"))
        .expect("Failed to create trip");
    let seat_id = persistence
        .list_seats(van_id)
        .expect("Failed to list seats")
        .first()
        .map(|seat| seat.seat_id)
        .expect("Van has no seats");

    let number_a: String = format!("VT-20991231-A{:07}", std::process::id() % 10_000_000);
    let number_b: String = format!("VT-20991231-B{:07}", std::process::id() % 10_000_000);
    let first = test_ticket(&number_a, trip_id, seat_id, PaymentStatus::Paid);
    let second = test_ticket(&number_b, trip_id, seat_id, PaymentStatus::Pending);

    let BackendConnection::Mysql(conn) = &mut persistence.conn else {
        panic!("Expected a MySQL connection");
    };
    insert_ticket_row_mysql(conn, &first).expect("Failed to insert first ticket");
    let result = insert_ticket_row_mysql(conn, &second);

    assert_eq!(
        result,
        Err(PersistenceError::SeatAlreadyTaken { trip_id, seat_id }),
        "The live-seat index must reject a second live ticket on MariaDB"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_transaction_rollback() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    conn.begin_test_transaction()
        .expect("Failed to begin transaction");

    diesel::sql_query(
        "INSERT INTO routes (origin, destination, name, created_at)
         VALUES ('Rollback', 'Test', 'rollback_test', '2026-01-01T00:00:00Z')",
    )
    .execute(&mut conn)
    .expect("Failed to insert route");

    let count: i64 =
        diesel::sql_query("SELECT COUNT(*) as count FROM routes WHERE name = 'rollback_test'")
            .get_result::<CountResult>(&mut conn)
            .map(|r| r.count)
            .expect("Failed to count routes");

    assert_eq!(count, 1, "Route should exist within transaction");

    // Test transaction mode rolls back on drop.
    drop(conn);

    let mut new_conn = mysql::initialize_database(&url).expect("Failed to reconnect to MariaDB");

    let count_after: i64 =
        diesel::sql_query("SELECT COUNT(*) as count FROM routes WHERE name = 'rollback_test'")
            .get_result::<CountResult>(&mut new_conn)
            .map(|r| r.count)
            .expect("Failed to count routes after rollback");

    assert_eq!(
        count_after, 0,
        "Route should not exist after transaction rollback"
    );
}
