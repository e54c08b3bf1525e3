// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask
//!
//! Project automation for the van-trip workspace.
//!
//! `cargo test` runs everything against `SQLite` and needs no services.
//! The `MariaDB` commands are opt-in: they start a throwaway container,
//! run against it and always remove it afterwards.
//!
//! - `cargo xtask test-mariadb` runs the ignored backend validation tests
//!   of `vantrip-persistence` with `VANTRIP_TEST_BACKEND=mariadb`.
//! - `cargo xtask verify-migrations` applies `migrations/` to `SQLite` and
//!   `migrations_mysql/` to `MariaDB` and fails if the resulting tables or
//!   columns differ.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    process::Output,
    thread::sleep,
    time::Duration,
};

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const SQLITE_MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("../crates/persistence/migrations");
const MYSQL_MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("../crates/persistence/migrations_mysql");

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting and clippy
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run `MariaDB` backend validation tests
    #[command(visible_alias = "tm")]
    TestMariadb,

    /// Verify schema parity between `SQLite` and `MySQL` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintFormatting => lint_format(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks. The `MariaDB` commands stay opt-in.
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

fn lint() -> Result<()> {
    lint_clippy()?;
    lint_format()
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Run all tests against `SQLite`
fn test() -> Result<()> {
    run_cargo(vec!["test", "--all-targets"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// A `MariaDB` 11 container that is stopped and removed when dropped.
struct MariaDbContainer {
    name: &'static str,
    database: &'static str,
    port: u16,
}

impl MariaDbContainer {
    const USER: &'static str = "vantrip";
    const PASSWORD: &'static str = "test_password";

    /// Starts the container and waits up to 30 seconds for it to accept
    /// connections.
    fn start(name: &'static str, database: &'static str, port: u16) -> Result<Self> {
        cmd!("docker", "--version")
            .run_with_trace()
            .wrap_err("Docker is not available. Please install Docker.")?;

        // Leftovers from an interrupted run
        let _ = cmd!("docker", "rm", "-f", name).run();

        tracing::info!("Starting MariaDB container: {name}");
        cmd!(
            "docker",
            "run",
            "--name",
            name,
            "-e",
            format!("MARIADB_DATABASE={database}"),
            "-e",
            format!("MARIADB_USER={}", Self::USER),
            "-e",
            format!("MARIADB_PASSWORD={}", Self::PASSWORD),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{port}:3306"),
            "-d",
            "mariadb:11"
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;

        let container = Self {
            name,
            database,
            port,
        };
        container.wait_until_ready()?;
        Ok(container)
    }

    fn wait_until_ready(&self) -> Result<()> {
        tracing::info!("Waiting for MariaDB to be ready...");
        for attempt in 1..=30 {
            sleep(Duration::from_secs(1));
            tracing::debug!("Connection attempt {attempt}/30");

            let ready_check = cmd!(
                "docker",
                "exec",
                self.name,
                "mariadb",
                "-u",
                Self::USER,
                format!("-p{}", Self::PASSWORD),
                "-e",
                "SELECT 1"
            )
            .stdout_null()
            .stderr_null()
            .run();

            if ready_check.is_ok() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }
        Err(color_eyre::eyre::eyre!(
            "MariaDB did not become ready within timeout"
        ))
    }

    fn url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            Self::USER,
            Self::PASSWORD,
            self.port,
            self.database
        )
    }
}

impl Drop for MariaDbContainer {
    fn drop(&mut self) {
        tracing::info!("Removing MariaDB container: {}", self.name);
        let _ = cmd!("docker", "rm", "-f", self.name).run();
    }
}

/// Run the ignored backend validation tests of `vantrip-persistence`
/// against a throwaway `MariaDB`.
///
/// Requires Docker and a free port 3307.
fn test_mariadb() -> Result<()> {
    let container = MariaDbContainer::start("vantrip-test-mariadb", "vantrip_test", 3307)?;

    tracing::info!("Running MariaDB backend validation tests");
    cmd!(
        "cargo",
        "test",
        "--package",
        "vantrip-persistence",
        "--features",
        "mysql",
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", container.url())
    .env("VANTRIP_TEST_BACKEND", "mariadb")
    .run_with_trace()
    .wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

/// One column as seen after normalizing backend type names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    normalized_type: &'static str,
    nullable: bool,
}

/// Table name to column name to column.
type Schema = BTreeMap<String, BTreeMap<String, Column>>;

/// Verify that both migration sets produce the same tables and columns.
///
/// Requires Docker and a free port 3308.
fn verify_migrations() -> Result<()> {
    tracing::info!("Applying SQLite migrations");
    let mut sqlite = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to open in-memory SQLite database")?;
    sqlite
        .run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("SQLite migrations failed: {e}"))?;
    let sqlite_schema: Schema = introspect_sqlite_schema(&mut sqlite)?;

    let container = MariaDbContainer::start("vantrip-verify-mariadb", "vantrip_verify", 3308)?;
    tracing::info!("Applying MySQL migrations");
    let mut mysql = MysqlConnection::establish(&container.url())
        .wrap_err("Failed to connect to MariaDB")?;
    mysql
        .run_pending_migrations(MYSQL_MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("MySQL migrations failed: {e}"))?;
    let mysql_schema: Schema = introspect_mysql_schema(&mut mysql, container.database)?;

    compare_schemas(&sqlite_schema, &mysql_schema)?;
    tracing::info!(
        "Schema parity verified across {} tables",
        sqlite_schema.len()
    );
    Ok(())
}

fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type = 'table' \
         AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' \
         ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    let mut schema = Schema::new();
    for table in tables {
        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_xinfo({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        let columns = columns
            .into_iter()
            .map(|col| {
                let column = Column {
                    normalized_type: normalize_type(&col.r#type),
                    // SQLite reports INTEGER PRIMARY KEY as nullable
                    nullable: col.notnull == 0 && col.pk == 0,
                };
                (col.name, column)
            })
            .collect();
        schema.insert(table.name, columns);
    }
    Ok(schema)
}

fn introspect_mysql_schema(conn: &mut MysqlConnection, database: &str) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        table_name: String,
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        data_type: String,
        #[diesel(sql_type = Text)]
        is_nullable: String,
    }

    let columns: Vec<ColumnInfo> = diesel::sql_query(
        "SELECT table_name, column_name, data_type, is_nullable \
         FROM information_schema.columns \
         WHERE table_schema = ? AND table_name != '__diesel_schema_migrations' \
         ORDER BY table_name, ordinal_position",
    )
    .bind::<Text, _>(database)
    .load(conn)
    .wrap_err("Failed to query MySQL columns")?;

    let mut schema = Schema::new();
    for col in columns {
        schema.entry(col.table_name).or_default().insert(
            col.column_name,
            Column {
                normalized_type: normalize_type(&col.data_type),
                nullable: col.is_nullable == "YES",
            },
        );
    }
    Ok(schema)
}

/// Map a backend type name onto `integer`, `real`, `blob` or `text`.
fn normalize_type(raw: &str) -> &'static str {
    let upper = raw.to_uppercase();
    if upper.contains("INT") {
        "integer"
    } else if ["REAL", "FLOA", "DOUB", "DEC", "NUMERIC"]
        .iter()
        .any(|marker| upper.contains(marker))
    {
        "real"
    } else if upper.contains("BLOB") || upper.contains("BINARY") {
        "blob"
    } else {
        "text"
    }
}

fn compare_schemas(sqlite: &Schema, mysql: &Schema) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    let sqlite_tables: BTreeSet<&String> = sqlite.keys().collect();
    let mysql_tables: BTreeSet<&String> = mysql.keys().collect();
    for table in sqlite_tables.symmetric_difference(&mysql_tables) {
        let side = if sqlite.contains_key(*table) {
            "SQLite"
        } else {
            "MySQL"
        };
        errors.push(format!("  - Table '{table}' only exists in {side}"));
    }

    for table in sqlite_tables.intersection(&mysql_tables) {
        let sqlite_columns = &sqlite[*table];
        let mysql_columns = &mysql[*table];

        for (name, sqlite_column) in sqlite_columns {
            match mysql_columns.get(name) {
                None => errors.push(format!("  - Column '{table}.{name}' missing in MySQL")),
                Some(mysql_column) if mysql_column != sqlite_column => errors.push(format!(
                    "  - Column '{table}.{name}' differs\n      SQLite: {sqlite_column:?}\n      MySQL: {mysql_column:?}"
                )),
                Some(_) => {}
            }
        }
        for name in mysql_columns.keys() {
            if !sqlite_columns.contains_key(name) {
                errors.push(format!("  - Column '{table}.{name}' missing in SQLite"));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(color_eyre::eyre::eyre!(
            "Schema parity check FAILED:\n{}",
            errors.join("\n")
        ))
    }
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
