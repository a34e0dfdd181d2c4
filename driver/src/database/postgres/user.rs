use std::str::FromStr;

use sqlx::types::Uuid;
use sqlx::PgConnection;

use kernel::interface::query::UserQuery;
use kernel::interface::update::UserModifier;
use kernel::prelude::entity::{User, UserEmail, UserId, UserName, UserRole};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresUserRepository;

#[async_trait::async_trait]
impl UserQuery for PostgresUserRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        PgUserInternal::find_by_id(con, id).await
    }

    async fn find_by_email(
        &self,
        con: &mut PostgresTransaction,
        email: &UserEmail,
    ) -> error_stack::Result<Option<User>, KernelError> {
        PgUserInternal::find_by_email(con, email).await
    }
}

#[async_trait::async_trait]
impl UserModifier for PostgresUserRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        PgUserInternal::create(con, user).await
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    role: String,
}

impl TryFrom<UserRow> for User {
    type Error = error_stack::Report<KernelError>;
    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User::new(
            UserId::new(row.id),
            UserName::new(row.name),
            UserEmail::new(row.email),
            UserRole::from_str(&row.role)?,
        ))
    }
}

pub(in crate::database) struct PgUserInternal;

impl PgUserInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        let row = sqlx::query_as::<_, UserRow>(
            // language=postgresql
            r#"
            SELECT id, name, email, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_email(
        con: &mut PgConnection,
        email: &UserEmail,
    ) -> error_stack::Result<Option<User>, KernelError> {
        let row = sqlx::query_as::<_, UserRow>(
            // language=postgresql
            r#"
            SELECT id, name, email, role
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(User::try_from).transpose()
    }

    #[tracing::instrument(skip_all, fields(user_id = %user.id().as_ref()))]
    async fn create(con: &mut PgConnection, user: &User) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO users (id, name, email, role)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id().as_ref())
        .bind(user.name().as_ref())
        .bind(user.email().as_ref())
        .bind(user.role().as_str())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::UserQuery;
    use kernel::interface::update::UserModifier;
    use kernel::prelude::entity::{User, UserEmail, UserId, UserName, UserRole};
    use kernel::KernelError;

    use crate::database::postgres::test::database;
    use crate::database::postgres::user::PostgresUserRepository;

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn find_by_id_and_email() -> error_stack::Result<(), KernelError> {
        let db = database().await?;
        let mut connection = db.transact().await?;
        let id = UserId::new(Uuid::new_v4());
        let email = format!("{}@Example.com", id.as_ref());
        let user = User::new(
            id.clone(),
            UserName::new("test"),
            UserEmail::new(email.clone()),
            UserRole::Admin,
        );

        PostgresUserRepository
            .create(&mut connection, &user)
            .await?;

        let found = PostgresUserRepository
            .find_by_id(&mut connection, &id)
            .await?;
        assert_eq!(found, Some(user.clone()));

        let found = PostgresUserRepository
            .find_by_email(&mut connection, &UserEmail::new(email.to_uppercase()))
            .await?;
        assert_eq!(found, Some(user));
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn duplicate_email_is_a_conflict() -> error_stack::Result<(), KernelError> {
        let db = database().await?;
        let mut connection = db.transact().await?;
        let email = format!("{}@example.com", Uuid::new_v4());
        let first = User::new(
            UserId::new(Uuid::new_v4()),
            UserName::new("first"),
            UserEmail::new(email.clone()),
            UserRole::User,
        );
        let second = User::new(
            UserId::new(Uuid::new_v4()),
            UserName::new("second"),
            UserEmail::new(email),
            UserRole::User,
        );

        PostgresUserRepository
            .create(&mut connection, &first)
            .await?;
        let report = PostgresUserRepository
            .create(&mut connection, &second)
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Concurrency);
        Ok(())
    }
}
