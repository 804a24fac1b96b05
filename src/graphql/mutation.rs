use async_graphql::{Context, Object, Result};
use sqlx::PgPool;
use time::Duration;

use crate::config::Config;
use crate::file::discard_upload;
use crate::graphql::guards::{MentorLoggedIn, StudentLoggedIn};
use crate::graphql::SUCCESS_MESSAGE;
use crate::models::account::AccountKind;
use crate::models::activity::{Activity, NewActivity};
use crate::models::event::{Event, NewEvent};
use crate::models::grade::{AicteGrade, GradeStatus, NewAicteGrade};
use crate::models::mentor::{Mentor, NewMentor};
use crate::models::points::ensure_valid_points;
use crate::models::session::Session;
use crate::models::student::{NewStudent, Student, StudentUpdate};

pub struct MutationRoot;

fn session_lifetime(ctx: &Context<'_>) -> Duration {
    Duration::hours(ctx.data_unchecked::<Config>().session_hours)
}

#[Object]
impl MutationRoot {
    /// Registers a new student
    pub async fn register_student(
        &self,
        ctx: &Context<'_>,
        new_student: NewStudent,
    ) -> Result<Student> {
        let pool: &PgPool = ctx.data_unchecked();
        Student::register(new_student, pool).await
    }

    /// Gets a login token for a student on successful login
    pub async fn login(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> Result<String> {
        let pool: &PgPool = ctx.data_unchecked();
        let student = Student::with_credentials(&email, &password, pool).await?;

        Session::get_or_generate_token(
            AccountKind::Student,
            student.id,
            session_lifetime(ctx),
            pool,
        )
        .await
    }

    /// Registers a new mentor
    pub async fn register_mentor(
        &self,
        ctx: &Context<'_>,
        new_mentor: NewMentor,
    ) -> Result<Mentor> {
        let pool: &PgPool = ctx.data_unchecked();
        Mentor::register(new_mentor, pool).await
    }

    /// Gets a login token for a mentor on successful login
    pub async fn mentor_login(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> Result<String> {
        let pool: &PgPool = ctx.data_unchecked();
        let mentor = Mentor::with_credentials(&email, &password, pool).await?;

        Session::get_or_generate_token(AccountKind::Mentor, mentor.id, session_lifetime(ctx), pool)
            .await
    }

    /// Logs the current student or mentor out
    pub async fn logout(&self, ctx: &Context<'_>) -> Result<&'static str> {
        let pool: &PgPool = ctx.data_unchecked();
        let (account, account_id) = if let Some(student) = ctx.data_opt::<Student>() {
            (AccountKind::Student, student.id)
        } else if let Some(mentor) = ctx.data_opt::<Mentor>() {
            (AccountKind::Mentor, mentor.id)
        } else {
            return Err("Not currently logged in".into());
        };

        Session::remove(account, account_id, pool).await?;

        Ok(SUCCESS_MESSAGE)
    }

    /// Updates the current student's profile
    #[graphql(guard = "StudentLoggedIn")]
    pub async fn update_profile(
        &self,
        ctx: &Context<'_>,
        update: StudentUpdate,
    ) -> Result<Student> {
        let pool: &PgPool = ctx.data_unchecked();
        let config = ctx.data_unchecked::<Config>();
        let user = ctx.data_unchecked::<Student>();

        let profile_picture = if let Some(picture) = &update.profile_picture {
            Some(picture.save(&config.upload_dir)?)
        } else {
            None
        };

        let updated = Student::update_profile(user.id, update, profile_picture.clone(), pool).await;
        if let (Err(_), Some(picture)) = (&updated, &profile_picture) {
            discard_upload(&config.upload_dir, picture);
        }

        updated
    }

    /// Submits an AICTE grade for mentor approval
    #[graphql(guard = "StudentLoggedIn")]
    pub async fn add_aicte_grade(
        &self,
        ctx: &Context<'_>,
        new_grade: NewAicteGrade,
    ) -> Result<AicteGrade> {
        let pool: &PgPool = ctx.data_unchecked();
        let config = ctx.data_unchecked::<Config>();
        let user = ctx.data_unchecked::<Student>();

        // don't store the proof for a claim that will be rejected anyway
        ensure_valid_points(new_grade.points)?;
        let proof_document = new_grade.proof_document.save(&config.upload_dir)?;

        let grade = AicteGrade::submit(user.id, &proof_document, &new_grade, pool).await;
        if grade.is_err() {
            discard_upload(&config.upload_dir, &proof_document);
        }

        grade
    }

    /// Records an activity, which counts towards the student's total immediately
    #[graphql(guard = "StudentLoggedIn")]
    pub async fn add_activity(
        &self,
        ctx: &Context<'_>,
        new_activity: NewActivity,
    ) -> Result<Activity> {
        let pool: &PgPool = ctx.data_unchecked();
        let user = ctx.data_unchecked::<Student>();

        Activity::create(user.id, new_activity, pool).await
    }

    /// Approves, rejects, or resets an AICTE grade
    #[graphql(guard = "MentorLoggedIn")]
    pub async fn update_grade_status(
        &self,
        ctx: &Context<'_>,
        grade_id: i64,
        status: GradeStatus,
    ) -> Result<AicteGrade> {
        let pool: &PgPool = ctx.data_unchecked();
        AicteGrade::set_status(grade_id, status, pool).await
    }

    /// Publishes a new event
    #[graphql(guard = "MentorLoggedIn")]
    pub async fn create_event(&self, ctx: &Context<'_>, new_event: NewEvent) -> Result<Event> {
        let pool: &PgPool = ctx.data_unchecked();
        let mentor = ctx.data_unchecked::<Mentor>();

        Event::create(mentor.id, new_event, pool).await
    }

    /// Updates one of the current mentor's events
    #[graphql(guard = "MentorLoggedIn")]
    pub async fn update_event(
        &self,
        ctx: &Context<'_>,
        id: i64,
        update: NewEvent,
        is_active: Option<bool>,
    ) -> Result<Event> {
        let pool: &PgPool = ctx.data_unchecked();
        let mentor = ctx.data_unchecked::<Mentor>();

        Event::update(id, mentor.id, update, is_active, pool).await
    }

    /// Deletes one of the current mentor's events and returns its ID
    #[graphql(guard = "MentorLoggedIn")]
    pub async fn delete_event(&self, ctx: &Context<'_>, id: i64) -> Result<i64> {
        let pool: &PgPool = ctx.data_unchecked();
        let mentor = ctx.data_unchecked::<Mentor>();
        Event::delete(id, mentor.id, pool).await?;

        Ok(id)
    }
}
