// Copyright 2023 Remi Bernotavicius

use diesel::connection::SimpleConnection as _;
use diesel::r2d2::{ConnectionManager, CustomizeConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::error::Error;
use std::path::Path;
use std::time::Duration;

pub mod models;
pub mod schema;

pub type Connection = diesel::sqlite::SqliteConnection;
pub type Pool = diesel::r2d2::Pool<ConnectionManager<Connection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-connection settings: foreign keys (and so `ON DELETE CASCADE`) are only enforced when
/// asked for, and WAL lets readers proceed while a writer holds the lock.
#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<Connection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;",
            BUSY_TIMEOUT.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Opens (creating if needed) the database at `path` and brings its schema up to date.
pub fn establish_pool(
    path: impl AsRef<Path>,
    max_size: u32,
) -> Result<Pool, Box<dyn Error + Send + Sync + 'static>> {
    let url = path
        .as_ref()
        .to_str()
        .ok_or("database path is not valid UTF-8")?;
    let pool = diesel::r2d2::Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(ConnectionOptions))
        .build(ConnectionManager::<Connection>::new(url))?;

    let mut pooled = pool.get()?;
    let connection: &mut Connection = &mut pooled;
    for version in connection.run_pending_migrations(MIGRATIONS)? {
        log::info!("applied migration {version}");
    }
    Ok(pool)
}

#[test]
fn migrations() {
    use diesel::prelude::Connection as _;

    let mut connection = Connection::establish(":memory:").unwrap();
    connection.run_pending_migrations(MIGRATIONS).unwrap();
    connection.revert_all_migrations(MIGRATIONS).unwrap();
    connection.run_pending_migrations(MIGRATIONS).unwrap();
    assert!(!connection.has_pending_migration(MIGRATIONS).unwrap());
}

#[test]
fn deleting_recipe_leaves_no_orphans() {
    use diesel::dsl::count_star;
    use diesel::ExpressionMethods as _;
    use diesel::QueryDsl as _;
    use diesel::RunQueryDsl as _;

    let dir = tempfile::tempdir().unwrap();
    let pool = establish_pool(dir.path().join("data.sqlite"), 1).unwrap();
    let mut conn = pool.get().unwrap();

    conn.batch_execute(
        "INSERT INTO recipes (id, title, description, cooking_time, servings)
             VALUES (1, 'Soup', 'Hot', 30, 2);
         INSERT INTO ingredients (id, name, preferred_unit_id, category)
             VALUES (1, 'salt', 3, 'spices');
         INSERT INTO directions (recipe_id, direction_number, instruction)
             VALUES (1, 1, 'Boil'), (1, 2, 'Serve');
         INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity, unit_id)
             VALUES (1, 1, 1.5, 3);
         INSERT INTO schedules (recipe_id, start_date, end_date)
             VALUES (1, '2025-01-10', '2025-01-12');",
    )
    .unwrap();

    diesel::delete(schema::recipes::table.filter(schema::recipes::id.eq(1)))
        .execute(&mut *conn)
        .unwrap();

    let directions: i64 = schema::directions::table
        .select(count_star())
        .get_result(&mut *conn)
        .unwrap();
    let usages: i64 = schema::recipe_ingredients::table
        .select(count_star())
        .get_result(&mut *conn)
        .unwrap();
    let schedules: i64 = schema::schedules::table
        .select(count_star())
        .get_result(&mut *conn)
        .unwrap();
    assert_eq!((directions, usages, schedules), (0, 0, 0));
}

#[test]
fn schedule_date_range_is_checked_by_database() {
    let dir = tempfile::tempdir().unwrap();
    let pool = establish_pool(dir.path().join("data.sqlite"), 1).unwrap();
    let mut conn = pool.get().unwrap();

    conn.batch_execute(
        "INSERT INTO recipes (id, title, description, cooking_time, servings)
             VALUES (1, 'Soup', 'Hot', 30, 2);",
    )
    .unwrap();
    let result = conn.batch_execute(
        "INSERT INTO schedules (recipe_id, start_date, end_date)
             VALUES (1, '2025-01-12', '2025-01-10');",
    );
    assert!(result.is_err());
}
