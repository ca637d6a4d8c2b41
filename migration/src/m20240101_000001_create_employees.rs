use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend};

// The UNIQUE constraint on email is what makes concurrent creates safe; the
// service maps the violation back to a duplicate-entry error.
const POSTGRES_UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    id bigserial PRIMARY KEY,
    full_name text NOT NULL,
    email text NOT NULL,
    CONSTRAINT employees_email_key UNIQUE (email)
);
"#;

const SQLITE_UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE
);
"#;

const DOWN_SQL: &str = "DROP TABLE IF EXISTS employees";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sql = match manager.get_database_backend() {
            DatabaseBackend::Postgres => POSTGRES_UP_SQL,
            DatabaseBackend::Sqlite => SQLITE_UP_SQL,
            DatabaseBackend::MySql => {
                return Err(DbErr::Migration(
                    "employees migration supports postgres and sqlite only".to_string(),
                ));
            }
        };
        manager
            .get_connection()
            .execute_unprepared(sql)
            .await
            .map(|_| ())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(DOWN_SQL)
            .await
            .map(|_| ())
    }
}
