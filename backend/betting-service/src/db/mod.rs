pub mod audit_repo;
pub mod bet_repo;
pub mod payment_method_repo;
pub mod result_repo;
pub mod transaction_repo;
pub mod user_repo;

pub use db_pool::{create_pool, DbConfig};

use sqlx::PgPool;

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../migrations").run(pool).await
}

/// True when `err` is a unique violation on `constraint`
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
