use deadpool_redis::{redis, Connection};
use error_stack::Report;
use kernel::interface::session::SessionStore;
use kernel::prelude::entity::{Session, SessionToken, User};
use kernel::KernelError;
use time::{Duration, OffsetDateTime};

use crate::database::redis::{random_token, RedisDatabase};
use crate::env_or;
use crate::error::ConvertError;

const SESSION_TTL_SECS: &str = "SESSION_TTL_SECS";
const TOKEN_LENGTH: usize = 48;

pub struct RedisSessionStore {
    db: RedisDatabase,
    ttl: u64,
}

impl RedisSessionStore {
    pub fn new(db: RedisDatabase) -> error_stack::Result<Self, KernelError> {
        let ttl = env_or(SESSION_TTL_SECS, 7 * 24 * 60 * 60)?;
        if ttl == 0 {
            return Err(Report::new(KernelError::Internal)
                .attach_printable(format!("{SESSION_TTL_SECS} must be positive")));
        }
        Ok(Self { db, ttl })
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    #[tracing::instrument(skip_all, fields(user_id = %user.id().as_ref()))]
    async fn issue(&self, user: &User) -> error_stack::Result<Session, KernelError> {
        let mut con = self.db.connection().await?;
        let ttl = i64::try_from(self.ttl).unwrap_or(i64::MAX);
        let session = Session::new(
            SessionToken::new(random_token(TOKEN_LENGTH)),
            user.id().clone(),
            *user.role(),
            OffsetDateTime::now_utc().saturating_add(Duration::seconds(ttl)),
        );
        RedisSessionInternal::save(&mut con, &session, self.ttl).await?;
        Ok(session)
    }

    async fn find(
        &self,
        token: &SessionToken,
    ) -> error_stack::Result<Option<Session>, KernelError> {
        let mut con = self.db.connection().await?;
        let session = RedisSessionInternal::load(&mut con, token).await?;
        Ok(session.filter(|session| !session.is_expired_at(OffsetDateTime::now_utc())))
    }

    #[tracing::instrument(skip_all)]
    async fn revoke(&self, token: &SessionToken) -> error_stack::Result<(), KernelError> {
        let mut con = self.db.connection().await?;
        RedisSessionInternal::delete(&mut con, token).await
    }
}

fn key(token: &SessionToken) -> String {
    format!("session:{}", token.as_ref())
}

pub(in crate::database) struct RedisSessionInternal;

impl RedisSessionInternal {
    async fn save(
        con: &mut Connection,
        session: &Session,
        ttl: u64,
    ) -> error_stack::Result<(), KernelError> {
        let value = serde_json::to_string(session).convert_error()?;
        redis::cmd("SET")
            .arg(key(session.token()))
            .arg(value)
            .arg("EX")
            .arg(ttl)
            .query_async::<_, ()>(con)
            .await
            .convert_error()
    }

    async fn load(
        con: &mut Connection,
        token: &SessionToken,
    ) -> error_stack::Result<Option<Session>, KernelError> {
        let value: Option<String> = redis::cmd("GET")
            .arg(key(token))
            .query_async(con)
            .await
            .convert_error()?;
        value
            .map(|value| serde_json::from_str::<Session>(&value).convert_error())
            .transpose()
    }

    async fn delete(
        con: &mut Connection,
        token: &SessionToken,
    ) -> error_stack::Result<(), KernelError> {
        redis::cmd("DEL")
            .arg(key(token))
            .query_async::<_, ()>(con)
            .await
            .convert_error()
    }
}
