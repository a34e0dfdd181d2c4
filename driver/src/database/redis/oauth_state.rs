use deadpool_redis::redis;
use kernel::interface::session::OAuthStateStore;
use kernel::prelude::entity::OAuthState;
use kernel::KernelError;

use crate::database::redis::{random_token, RedisDatabase};
use crate::error::ConvertError;

const STATE_TTL_SECS: u64 = 10 * 60;
const STATE_LENGTH: usize = 32;

pub struct RedisOAuthStateStore {
    db: RedisDatabase,
}

impl RedisOAuthStateStore {
    pub fn new(db: RedisDatabase) -> Self {
        Self { db }
    }
}

fn key(state: &OAuthState) -> String {
    format!("oauth_state:{}", state.as_ref())
}

#[async_trait::async_trait]
impl OAuthStateStore for RedisOAuthStateStore {
    async fn issue(&self) -> error_stack::Result<OAuthState, KernelError> {
        let mut con = self.db.connection().await?;
        let state = OAuthState::new(random_token(STATE_LENGTH));
        redis::cmd("SET")
            .arg(key(&state))
            .arg(1)
            .arg("EX")
            .arg(STATE_TTL_SECS)
            .query_async::<_, ()>(&mut con)
            .await
            .convert_error()?;
        Ok(state)
    }

    // DEL reports how many keys it removed, so only the first caller sees 1.
    #[tracing::instrument(skip_all)]
    async fn consume(&self, state: &OAuthState) -> error_stack::Result<bool, KernelError> {
        let mut con = self.db.connection().await?;
        let removed: i64 = redis::cmd("DEL")
            .arg(key(state))
            .query_async(&mut con)
            .await
            .convert_error()?;
        Ok(removed == 1)
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::session::OAuthStateStore;
    use kernel::prelude::entity::OAuthState;
    use kernel::KernelError;

    use crate::database::redis::{RedisDatabase, RedisOAuthStateStore};

    #[test_with::env(REDIS_TEST)]
    #[tokio::test]
    async fn state_is_consumed_once() -> error_stack::Result<(), KernelError> {
        let store = RedisOAuthStateStore::new(RedisDatabase::new()?);
        let state = store.issue().await?;

        assert!(store.consume(&state).await?);
        assert!(!store.consume(&state).await?);
        assert!(!store.consume(&OAuthState::new("forged")).await?);
        Ok(())
    }
}
