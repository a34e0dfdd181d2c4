use std::ops::{Deref, DerefMut};
use std::time::Duration;

use error_stack::{Report, ResultExt};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Error, PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::KernelError;

use crate::error::ConvertError;
use crate::{env, env_or};

pub use self::{booking::*, event::*, user::*};

mod booking;
mod event;
mod user;

const POSTGRES_URL: &str = "POSTGRES_URL";
const POSTGRES_MAX_CONNECTIONS: &str = "POSTGRES_MAX_CONNECTIONS";
const POSTGRES_ACQUIRE_TIMEOUT_MS: &str = "POSTGRES_ACQUIRE_TIMEOUT_MS";
const TRANSACTION_TIMEOUT_MS: &str = "TRANSACTION_TIMEOUT_MS";

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
    transaction_timeout: u64,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let max_connections = env_or(POSTGRES_MAX_CONNECTIONS, 10u32)?;
        let acquire_timeout = env_or(POSTGRES_ACQUIRE_TIMEOUT_MS, 5000u64)?;
        let transaction_timeout = env_or(TRANSACTION_TIMEOUT_MS, 5000u64)?;
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_millis(acquire_timeout))
            .connect(&url)
            .await
            .convert_error()?;
        Ok(Self {
            pool,
            transaction_timeout,
        })
    }

    pub async fn migrate(&self) -> error_stack::Result<(), KernelError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable("Failed to run migrations")
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Every transaction gives up on row locks and long statements after
/// `TRANSACTION_TIMEOUT_MS`, which surfaces as [`KernelError::Timeout`].
#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresTransaction;

    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let mut transaction = self.pool.begin().await.convert_error()?;
        let timeout = self.transaction_timeout.to_string();
        // language=postgresql
        sqlx::query(
            r#"
            SELECT set_config('lock_timeout', $1, true),
                   set_config('statement_timeout', $1, true)
            "#,
        )
        .bind(&timeout)
        .execute(&mut *transaction)
        .await
        .convert_error()?;
        Ok(PostgresTransaction(transaction))
    }
}

pub struct PostgresTransaction(sqlx::Transaction<'static, Postgres>);

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl Deref for PostgresTransaction {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

const LOCK_NOT_AVAILABLE: &str = "55P03";
const QUERY_CANCELED: &str = "57014";
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const UNIQUE_VIOLATION: &str = "23505";

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = match &error {
                Error::PoolTimedOut => KernelError::Timeout,
                Error::Database(database) => match database.code().as_deref() {
                    Some(LOCK_NOT_AVAILABLE | QUERY_CANCELED) => KernelError::Timeout,
                    Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED | UNIQUE_VIOLATION) => {
                        KernelError::Concurrency
                    }
                    _ => KernelError::Internal,
                },
                _ => KernelError::Internal,
            };
            Report::from(error).change_context(context)
        })
    }
}

#[cfg(test)]
pub(in crate::database) mod test {
    use error_stack::Report;
    use kernel::KernelError;
    use sqlx::Error;

    use crate::database::postgres::PostgresDatabase;
    use crate::error::ConvertError;

    pub async fn database() -> error_stack::Result<PostgresDatabase, KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        Ok(db)
    }

    #[test]
    fn pool_timeout_is_retryable() {
        let report: Report<KernelError> = Err::<(), _>(Error::PoolTimedOut)
            .convert_error()
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Timeout);
        assert!(report.current_context().is_retryable());

        let report: Report<KernelError> = Err::<(), _>(Error::RowNotFound)
            .convert_error()
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Internal);
    }
}
