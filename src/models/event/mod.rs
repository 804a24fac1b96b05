use async_graphql::{ComplexObject, Context, Enum, InputObject, Result, SimpleObject};
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::models::event::targeting::{EventTargeting, StudentProfile};
use crate::models::mentor::{Mentor, MentorSummary};
use crate::models::DateTime;
use crate::util::normalize_targets;

pub mod targeting;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Enum, sqlx::Type)]
#[sqlx(type_name = "event_category", rename_all = "snake_case")]
pub enum EventCategory {
    Workshop,
    Seminar,
    Competition,
    Meeting,
    Other,
}

impl Default for EventCategory {
    fn default() -> Self {
        EventCategory::Other
    }
}

#[derive(SimpleObject, sqlx::FromRow, Clone, Debug)]
#[graphql(complex)]
pub struct Event {
    /// The ID of the event
    pub id: i64,
    /// The mentor who published the event
    pub mentor_id: i64,
    /// The name of the event
    pub title: String,
    /// General information about the event
    pub description: String,
    /// When the event takes place
    pub event_date: DateTime,
    /// Where the event will be held
    pub location: String,
    /// What kind of event this is
    pub category: EventCategory,
    /// Inactive events are hidden from students
    pub is_active: bool,
    /// Whether every student can see the event, regardless of the filters below
    pub is_open_to_all: bool,
    /// The lowest USN the event is meant for (empty for no bound)
    pub start_usn: String,
    /// The highest USN the event is meant for (empty for no bound)
    pub end_usn: String,
    /// The semesters the event is meant for (empty for all)
    pub target_semesters: Vec<String>,
    /// The departments the event is meant for (empty for all)
    pub target_departments: Vec<String>,
    /// When the event was published
    pub created_at: DateTime,
}

#[ComplexObject]
impl Event {
    /// The mentor who published the event
    pub async fn mentor(&self, ctx: &Context<'_>) -> Result<MentorSummary> {
        let pool: &PgPool = ctx.data_unchecked();
        Mentor::with_id(self.mentor_id, pool).await.map(Into::into)
    }
}

impl Event {
    pub async fn with_id(id: i64, pool: &PgPool) -> Result<Self> {
        Self::with_id_opt(id, pool)
            .await?
            .ok_or_else(|| format!("No event with id {}", id).into())
    }

    pub async fn with_id_opt(id: i64, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Active events that haven't happened yet, soonest first
    pub async fn upcoming(now: OffsetDateTime, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM events WHERE is_active AND event_date >= $1 ORDER BY event_date",
        )
        .bind(now)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// The upcoming events the given student is allowed to see
    pub async fn upcoming_for_student(
        student: &StudentProfile<'_>,
        now: OffsetDateTime,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        Ok(Self::upcoming(now, pool)
            .await?
            .into_iter()
            .filter(|event| event.is_visible_to(student, now))
            .collect())
    }

    pub async fn for_mentor(
        mentor_id: i64,
        newest_first: bool,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let query = if newest_first {
            "SELECT * FROM events WHERE mentor_id = $1 ORDER BY event_date DESC"
        } else {
            "SELECT * FROM events WHERE mentor_id = $1 ORDER BY event_date"
        };

        sqlx::query_as::<_, Self>(query)
            .bind(mentor_id)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub fn targeting(&self) -> EventTargeting<'_> {
        EventTargeting {
            is_open_to_all: self.is_open_to_all,
            start_usn: &self.start_usn,
            end_usn: &self.end_usn,
            semesters: &self.target_semesters,
            departments: &self.target_departments,
        }
    }

    pub fn is_upcoming(&self, now: OffsetDateTime) -> bool {
        self.is_active && self.event_date.0 >= now
    }

    /// Inactive and past events are never visible; otherwise the event's targeting decides.
    pub fn is_visible_to(&self, student: &StudentProfile<'_>, now: OffsetDateTime) -> bool {
        self.is_upcoming(now) && self.targeting().is_eligible(student)
    }

    pub fn ensure_owned_by(&self, mentor_id: i64) -> Result<()> {
        if self.mentor_id == mentor_id {
            Ok(())
        } else {
            Err("Only the mentor who created this event can change it".into())
        }
    }

    pub async fn create(mentor_id: i64, new_event: NewEvent, pool: &PgPool) -> Result<Self> {
        let event = sqlx::query_as::<_, Self>(
            "INSERT INTO events
                 (mentor_id, title, description, event_date, location, category,
                  is_open_to_all, start_usn, end_usn, target_semesters, target_departments)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *",
        )
        .bind(mentor_id)
        .bind(new_event.title)
        .bind(new_event.description)
        .bind(new_event.event_date)
        .bind(new_event.location)
        .bind(new_event.category.unwrap_or_default())
        .bind(new_event.is_open_to_all)
        .bind(new_event.start_usn.unwrap_or_default())
        .bind(new_event.end_usn.unwrap_or_default())
        .bind(normalize_targets(new_event.target_semesters))
        .bind(normalize_targets(new_event.target_departments))
        .fetch_one(pool)
        .await?;

        tracing::info!(event = event.id, mentor = mentor_id, "created event");

        Ok(event)
    }

    pub async fn update(
        id: i64,
        mentor_id: i64,
        update: NewEvent,
        is_active: Option<bool>,
        pool: &PgPool,
    ) -> Result<Self> {
        Self::with_id(id, pool).await?.ensure_owned_by(mentor_id)?;

        sqlx::query_as::<_, Self>(
            "UPDATE events SET
                 title = $1, description = $2, event_date = $3, location = $4, category = $5,
                 is_active = COALESCE($6, is_active), is_open_to_all = $7, start_usn = $8,
                 end_usn = $9, target_semesters = $10, target_departments = $11
             WHERE id = $12
             RETURNING *",
        )
        .bind(update.title)
        .bind(update.description)
        .bind(update.event_date)
        .bind(update.location)
        .bind(update.category.unwrap_or_default())
        .bind(is_active)
        .bind(update.is_open_to_all)
        .bind(update.start_usn.unwrap_or_default())
        .bind(update.end_usn.unwrap_or_default())
        .bind(normalize_targets(update.target_semesters))
        .bind(normalize_targets(update.target_departments))
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: i64, mentor_id: i64, pool: &PgPool) -> Result<()> {
        Self::with_id(id, pool).await?.ensure_owned_by(mentor_id)?;

        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        tracing::info!(event = id, mentor = mentor_id, "deleted event");

        Ok(())
    }
}

#[derive(InputObject)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub event_date: DateTime,
    pub location: String,
    pub category: Option<EventCategory>,
    pub is_open_to_all: bool,
    pub start_usn: Option<String>,
    pub end_usn: Option<String>,
    pub target_semesters: Option<Vec<String>>,
    pub target_departments: Option<Vec<String>>,
}
