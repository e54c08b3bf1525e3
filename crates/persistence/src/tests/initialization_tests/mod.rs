// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other persistence test starts from `SqlitePersistence::new_in_memory()`,
//! so connection setup, migrations and foreign key enforcement are exercised
//! throughout. The tests here pin down the few properties nothing else checks
//! directly.

use crate::SqlitePersistence;
use crate::tests::create_test_route;

#[test]
fn test_persistence_initialization() {
    let result: Result<SqlitePersistence, crate::error::PersistenceError> =
        SqlitePersistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = SqlitePersistence::new_in_memory().unwrap();
    let mut db2 = SqlitePersistence::new_in_memory().unwrap();

    create_test_route(&mut db1);

    assert_eq!(db1.list_routes().unwrap().len(), 1);
    assert_eq!(
        db2.list_routes().unwrap().len(),
        0,
        "db2 should not see db1's route"
    );
}

#[test]
fn test_migrations_applied_on_initialization() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    assert!(persistence.list_vans().is_ok());
    assert!(persistence.list_trips(&crate::TripFilter::default()).is_ok());
}

#[test]
fn test_foreign_key_enforcement_enabled() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_file_database_persists_across_connections() {
    let path = std::env::temp_dir().join(format!(
        "vantrip_init_test_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence = SqlitePersistence::new_with_file(&path).unwrap();
        create_test_route(&mut persistence);
    }

    let mut reopened = SqlitePersistence::new_with_file(&path).unwrap();
    assert_eq!(reopened.list_routes().unwrap().len(), 1);

    drop(reopened);
    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(path.with_extension("db-wal"));
    let _ = std::fs::remove_file(path.with_extension("db-shm"));
}
