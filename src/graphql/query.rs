use async_graphql::{Context, Object, Result};
use sqlx::PgPool;

use crate::graphql::guards::{MentorLoggedIn, StudentLoggedIn};
use crate::models::event::Event;
use crate::models::mentor::Mentor;
use crate::models::student::{Student, StudentRecord};
use crate::util::current_time;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The logged-in student, with their grades and activities
    #[graphql(guard = "StudentLoggedIn")]
    pub async fn student_record(&self, ctx: &Context<'_>) -> Result<StudentRecord> {
        let pool: &PgPool = ctx.data_unchecked();
        let user = ctx.data_unchecked::<Student>();

        StudentRecord::load(user.id, pool).await
    }

    /// The upcoming events the logged-in student is eligible for
    #[graphql(guard = "StudentLoggedIn")]
    pub async fn events(&self, ctx: &Context<'_>) -> Result<Vec<Event>> {
        let pool: &PgPool = ctx.data_unchecked();
        let user = ctx.data_unchecked::<Student>();

        Event::upcoming_for_student(&user.profile(), current_time(), pool).await
    }

    /// The logged-in mentor
    #[graphql(guard = "MentorLoggedIn")]
    pub async fn mentor(&self, ctx: &Context<'_>) -> Mentor {
        ctx.data_unchecked::<Mentor>().clone()
    }

    /// The logged-in mentor's events, latest first
    #[graphql(guard = "MentorLoggedIn")]
    pub async fn mentor_events(&self, ctx: &Context<'_>) -> Result<Vec<Event>> {
        let pool: &PgPool = ctx.data_unchecked();
        let mentor = ctx.data_unchecked::<Mentor>();

        Event::for_mentor(mentor.id, true, pool).await
    }

    /// Looks up a student by USN, with their grades and activities
    #[graphql(guard = "MentorLoggedIn")]
    pub async fn search_student(&self, ctx: &Context<'_>, usn: String) -> Result<StudentRecord> {
        let pool: &PgPool = ctx.data_unchecked();
        let student = Student::with_usn(&usn, pool).await?;

        StudentRecord::load(student.id, pool).await
    }
}
