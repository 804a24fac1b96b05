use async_graphql::{InputObject, Result, SimpleObject};
use sqlx::{PgExecutor, PgPool};

use crate::file::UploadedFile;
use crate::models::account::{ensure_passwords_match, hash_password, password_matches};
use crate::models::activity::Activity;
use crate::models::event::targeting::StudentProfile;
use crate::models::grade::AicteGrade;
use crate::models::points::reconcile;

#[derive(SimpleObject, sqlx::FromRow, Clone, Debug)]
pub struct Student {
    /// The ID of the student
    pub id: i64,
    /// The student's full name
    pub name: String,
    /// The student's university seat number
    pub usn: String,
    /// The student's email, which must be unique
    pub email: String,
    /// Where the student's profile picture is served from, if they uploaded one
    pub profile_picture: String,
    /// The student's phone number
    pub phone: String,
    /// The student's department (CSE, ISE, etc.)
    pub department: String,
    /// The student's year of study
    pub year: String,
    /// The student's current semester
    pub semester: String,
    /// Activity points plus approved AICTE grade points
    pub total_points: i64,

    #[graphql(skip)]
    pub pass_hash: String,
}

impl Student {
    pub async fn with_id_opt(id: i64, pool: &PgPool) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn with_email_opt(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM students WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// The first student registered under the given USN
    pub async fn with_usn(usn: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM students WHERE usn = $1 ORDER BY id LIMIT 1")
            .bind(usn)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| "Student not found".into())
    }

    /// The student with the given credentials, if they are correct
    pub async fn with_credentials(email: &str, password: &str, pool: &PgPool) -> Result<Self> {
        if let Some(student) = Self::with_email_opt(email, pool).await? {
            if password_matches(password, &student.pass_hash)? {
                return Ok(student);
            }
        }

        Err("Invalid email or password".into())
    }

    pub fn profile(&self) -> StudentProfile<'_> {
        StudentProfile {
            usn: &self.usn,
            semester: &self.semester,
            department: &self.department,
        }
    }

    pub async fn register(new_student: NewStudent, pool: &PgPool) -> Result<Self> {
        ensure_passwords_match(&new_student.password, &new_student.confirm_password)?;

        if Self::with_email_opt(&new_student.email, pool).await?.is_some() {
            return Err("Email already registered".into());
        }

        let pass_hash = hash_password(&new_student.password)?;
        let student = sqlx::query_as::<_, Self>(
            "INSERT INTO students (name, usn, email, pass_hash) VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(new_student.name)
        .bind(new_student.usn)
        .bind(new_student.email)
        .bind(pass_hash)
        .fetch_one(pool)
        .await?;

        tracing::info!(student = student.id, usn = %student.usn, "registered student");

        Ok(student)
    }

    /// Updates the provided profile fields, leaving the rest as they were.
    pub async fn update_profile(
        id: i64,
        update: StudentUpdate,
        profile_picture: Option<String>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE students SET
                 name = COALESCE($1, name), phone = COALESCE($2, phone),
                 department = COALESCE($3, department), year = COALESCE($4, year),
                 semester = COALESCE($5, semester),
                 profile_picture = COALESCE($6, profile_picture)
             WHERE id = $7
             RETURNING *",
        )
        .bind(update.name)
        .bind(update.phone)
        .bind(update.department)
        .bind(update.year)
        .bind(update.semester)
        .bind(profile_picture)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| format!("No student with id {}", id).into())
    }

    /// Atomically shifts the cached total by `delta`.
    pub async fn adjust_points<'e>(
        id: i64,
        delta: i64,
        executor: impl PgExecutor<'e>,
    ) -> Result<()> {
        let result =
            sqlx::query("UPDATE students SET total_points = total_points + $1 WHERE id = $2")
                .bind(delta)
                .bind(id)
                .execute(executor)
                .await?;

        if result.rows_affected() == 0 {
            return Err(format!("No student with id {}", id).into());
        }

        tracing::debug!(student = id, delta, "adjusted point total");

        Ok(())
    }

    async fn set_total_points<'e>(
        id: i64,
        total: i64,
        executor: impl PgExecutor<'e>,
    ) -> Result<()> {
        sqlx::query("UPDATE students SET total_points = $1 WHERE id = $2")
            .bind(total)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }
}

/// A student along with everything they have submitted
#[derive(SimpleObject)]
pub struct StudentRecord {
    pub student: Student,
    /// The student's AICTE grades, newest first
    pub aicte_grades: Vec<AicteGrade>,
    /// The student's activities, newest first
    pub activities: Vec<Activity>,
}

impl StudentRecord {
    /// Loads the student's submissions and repairs their cached total if it drifted.
    ///
    /// The student row is locked for the whole recompute, so a point adjustment that is
    /// still in flight either commits before the submissions are read or waits until the
    /// corrected total is written.
    pub async fn load(student_id: i64, pool: &PgPool) -> Result<Self> {
        let mut transaction = pool.begin().await?;

        let mut student =
            sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1 FOR UPDATE")
                .bind(student_id)
                .fetch_optional(&mut transaction)
                .await?
                .ok_or_else(|| format!("No student with id {}", student_id))?;
        let aicte_grades = AicteGrade::for_student(student.id, &mut transaction).await?;
        let activities = Activity::for_student(student.id, &mut transaction).await?;

        let reconciliation = reconcile(student.total_points, &activities, &aicte_grades);
        if reconciliation.stale {
            tracing::warn!(
                student = student.id,
                cached = student.total_points,
                recomputed = reconciliation.total,
                "correcting stale point total"
            );
            Student::set_total_points(student.id, reconciliation.total, &mut transaction).await?;
            student.total_points = reconciliation.total;
        }

        transaction.commit().await?;

        Ok(Self {
            student,
            aicte_grades,
            activities,
        })
    }
}

#[derive(InputObject)]
pub struct NewStudent {
    pub name: String,
    pub usn: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(InputObject)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub semester: Option<String>,
    pub profile_picture: Option<UploadedFile>,
}
