use async_graphql::Result;
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::error::{PortalError, PortalResult};
use crate::models::account::AccountKind;
use crate::util::current_time;

/// A login token tied to a student or mentor account
#[derive(sqlx::FromRow, Clone, Debug)]
pub struct Session {
    pub key: String,
    pub account: AccountKind,
    pub account_id: i64,
    pub created_at: OffsetDateTime,
}

impl Session {
    /// The live session for `token`. Expired sessions are removed and treated as missing.
    pub async fn with_token(token: &str, lifetime: Duration, pool: &PgPool) -> PortalResult<Self> {
        let session = Self::with_token_opt(token, pool).await?.ok_or_else(|| {
            PortalError::Unauthorized("No login tied to the provided token".to_owned())
        })?;

        if session.is_expired(current_time(), lifetime) {
            Self::remove_key(&session.key, pool).await?;
            return Err(PortalError::Unauthorized(
                "Your login expired, please log in again".to_owned(),
            ));
        }

        Ok(session)
    }

    pub async fn with_token_opt(token: &str, pool: &PgPool) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM sessions WHERE key = $1")
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    pub fn is_expired(&self, now: OffsetDateTime, lifetime: Duration) -> bool {
        now - self.created_at > lifetime
    }

    /// Reuses the account's live session if it has one, otherwise starts a new one.
    pub async fn get_or_generate_token(
        account: AccountKind,
        account_id: i64,
        lifetime: Duration,
        pool: &PgPool,
    ) -> Result<String> {
        let existing = sqlx::query_as::<_, Self>(
            "SELECT * FROM sessions WHERE account = $1 AND account_id = $2
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(account)
        .bind(account_id)
        .fetch_optional(pool)
        .await?;

        if let Some(session) = existing {
            if !session.is_expired(current_time(), lifetime) {
                return Ok(session.key);
            }

            Self::remove_key(&session.key, pool).await?;
        }

        let token = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO sessions (key, account, account_id) VALUES ($1, $2, $3)")
            .bind(&token)
            .bind(account)
            .bind(account_id)
            .execute(pool)
            .await?;

        Ok(token)
    }

    pub async fn remove_key(key: &str, pool: &PgPool) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM sessions WHERE key = $1")
            .bind(key)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Removes every session belonging to the account.
    pub async fn remove(account: AccountKind, account_id: i64, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE account = $1 AND account_id = $2")
            .bind(account)
            .bind(account_id)
            .execute(pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use time::Duration;

    use super::Session;
    use crate::models::account::AccountKind;

    fn session_created_at(created_at: time::OffsetDateTime) -> Session {
        Session {
            key: "token".to_owned(),
            account: AccountKind::Student,
            account_id: 1,
            created_at,
        }
    }

    #[test]
    fn sessions_expire_after_their_lifetime() {
        let session = session_created_at(datetime!(2026-10-18 08:00 UTC));
        let lifetime = Duration::hours(24);

        assert!(!session.is_expired(datetime!(2026-10-19 08:00 UTC), lifetime));
        assert!(session.is_expired(datetime!(2026-10-19 08:01 UTC), lifetime));
    }
}
