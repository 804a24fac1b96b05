use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject};
use sqlx::PgPool;

use crate::models::account::{ensure_passwords_match, hash_password, password_matches};
use crate::models::event::Event;

#[derive(SimpleObject, sqlx::FromRow, Clone, Debug)]
#[graphql(complex)]
pub struct Mentor {
    /// The ID of the mentor
    pub id: i64,
    /// The mentor's full name
    pub name: String,
    /// The mentor's email, which must be unique
    pub email: String,
    /// The department the mentor belongs to
    pub department: String,

    #[graphql(skip)]
    pub pass_hash: String,
}

#[ComplexObject]
impl Mentor {
    /// The events this mentor has published, soonest first
    pub async fn events(&self, ctx: &Context<'_>) -> Result<Vec<Event>> {
        let pool: &PgPool = ctx.data_unchecked();
        Event::for_mentor(self.id, false, pool).await
    }
}

/// The public face of a mentor, shown alongside their events
#[derive(SimpleObject)]
pub struct MentorSummary {
    pub name: String,
    pub department: String,
}

impl From<Mentor> for MentorSummary {
    fn from(mentor: Mentor) -> Self {
        Self {
            name: mentor.name,
            department: mentor.department,
        }
    }
}

impl Mentor {
    pub async fn with_id(id: i64, pool: &PgPool) -> Result<Self> {
        Self::with_id_opt(id, pool)
            .await?
            .ok_or_else(|| format!("No mentor with id {}", id).into())
    }

    pub async fn with_id_opt(id: i64, pool: &PgPool) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM mentors WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn with_email_opt(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM mentors WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn with_credentials(email: &str, password: &str, pool: &PgPool) -> Result<Self> {
        if let Some(mentor) = Self::with_email_opt(email, pool).await? {
            if password_matches(password, &mentor.pass_hash)? {
                return Ok(mentor);
            }
        }

        Err("Invalid email or password".into())
    }

    pub async fn register(new_mentor: NewMentor, pool: &PgPool) -> Result<Self> {
        ensure_passwords_match(&new_mentor.password, &new_mentor.confirm_password)?;

        if Self::with_email_opt(&new_mentor.email, pool).await?.is_some() {
            return Err("Email already registered".into());
        }

        let pass_hash = hash_password(&new_mentor.password)?;
        let mentor = sqlx::query_as::<_, Self>(
            "INSERT INTO mentors (name, email, department, pass_hash) VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(new_mentor.name)
        .bind(new_mentor.email)
        .bind(new_mentor.department)
        .bind(pass_hash)
        .fetch_one(pool)
        .await?;

        tracing::info!(mentor = mentor.id, "registered mentor");

        Ok(mentor)
    }
}

#[derive(InputObject)]
pub struct NewMentor {
    pub name: String,
    pub email: String,
    pub department: String,
    pub password: String,
    pub confirm_password: String,
}
