use async_graphql::{Enum, InputObject, Result, SimpleObject};
use sqlx::{PgExecutor, PgPool};

use crate::file::UploadedFile;
use crate::models::points::{ensure_valid_points, status_change_delta};
use crate::models::student::Student;
use crate::models::DateTime;

/// Where an AICTE grade is in the review process
#[derive(Clone, Copy, Debug, PartialEq, Eq, Enum, sqlx::Type)]
#[sqlx(type_name = "grade_status", rename_all = "snake_case")]
pub enum GradeStatus {
    Pending,
    Approved,
    Rejected,
}

impl Default for GradeStatus {
    fn default() -> Self {
        GradeStatus::Pending
    }
}

/// A point claim backed by a proof document, reviewed by a mentor
#[derive(SimpleObject, sqlx::FromRow, Clone, Debug)]
pub struct AicteGrade {
    /// The ID of the grade
    pub id: i64,
    /// The student who submitted the grade
    pub student_id: i64,
    /// What the points were earned for
    pub activity_name: String,
    /// How many points the grade is worth once approved
    pub points: i64,
    /// Where the uploaded proof is served from
    pub proof_document: String,
    /// When the grade was submitted
    pub date_added: DateTime,
    /// The current review status
    pub status: GradeStatus,
}

impl AicteGrade {
    /// All grades for a student, newest first
    pub async fn for_student<'e>(
        student_id: i64,
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM aicte_grades WHERE student_id = $1 ORDER BY date_added DESC",
        )
        .bind(student_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    /// Submits a new grade for review. Its points don't count until a mentor approves it.
    pub async fn submit(
        student_id: i64,
        proof_document: &str,
        new_grade: &NewAicteGrade,
        pool: &PgPool,
    ) -> Result<Self> {
        let points = ensure_valid_points(new_grade.points)?;

        sqlx::query_as::<_, Self>(
            "INSERT INTO aicte_grades (student_id, activity_name, points, proof_document, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(student_id)
        .bind(&new_grade.activity_name)
        .bind(points)
        .bind(proof_document)
        .bind(GradeStatus::Pending)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Moves the grade to `status`, adjusting the student's total by the resulting delta.
    ///
    /// The grade row stays locked until the point adjustment commits, so concurrent
    /// reviews of the same grade are applied one after the other.
    pub async fn set_status(id: i64, status: GradeStatus, pool: &PgPool) -> Result<Self> {
        let mut transaction = pool.begin().await?;

        let grade =
            sqlx::query_as::<_, Self>("SELECT * FROM aicte_grades WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut transaction)
                .await?
                .ok_or("Grade not found")?;

        if grade.status == status {
            transaction.commit().await?;
            return Ok(grade);
        }

        let updated = sqlx::query_as::<_, Self>(
            "UPDATE aicte_grades SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_one(&mut transaction)
        .await?;

        let delta = status_change_delta(grade.points, grade.status, status);
        if delta != 0 {
            Student::adjust_points(grade.student_id, delta, &mut transaction).await?;
        }

        transaction.commit().await?;

        tracing::info!(
            grade = id,
            student = grade.student_id,
            from = ?grade.status,
            to = ?status,
            delta,
            "grade status changed"
        );

        Ok(updated)
    }
}

#[derive(InputObject)]
pub struct NewAicteGrade {
    pub activity_name: String,
    pub points: i64,
    pub proof_document: UploadedFile,
}

#[cfg(test)]
mod tests {
    use super::GradeStatus;

    #[test]
    fn grades_start_pending() {
        assert_eq!(GradeStatus::default(), GradeStatus::Pending);
    }
}
