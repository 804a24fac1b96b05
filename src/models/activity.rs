use async_graphql::{InputObject, Result, SimpleObject};
use sqlx::{PgExecutor, PgPool};

use crate::models::points::{activity_added_delta, ensure_valid_points};
use crate::models::student::Student;
use crate::models::DateTime;

/// A point-earning record that counts as soon as it is added
#[derive(SimpleObject, sqlx::FromRow, Clone, Debug)]
pub struct Activity {
    /// The ID of the activity
    pub id: i64,
    /// The student who did the activity
    pub student_id: i64,
    /// The name of the activity
    pub activity_name: String,
    /// What the student did
    pub description: String,
    /// How many points the activity is worth
    pub points: i64,
    /// When the activity was recorded
    pub date_time: DateTime,
}

impl Activity {
    /// All activities for a student, newest first
    pub async fn for_student<'e>(
        student_id: i64,
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM activities WHERE student_id = $1 ORDER BY date_time DESC",
        )
        .bind(student_id)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    pub async fn create(
        student_id: i64,
        new_activity: NewActivity,
        pool: &PgPool,
    ) -> Result<Self> {
        let points = ensure_valid_points(new_activity.points)?;
        let mut transaction = pool.begin().await?;

        let activity = sqlx::query_as::<_, Self>(
            "INSERT INTO activities (student_id, activity_name, description, points)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(student_id)
        .bind(new_activity.activity_name)
        .bind(new_activity.description)
        .bind(points)
        .fetch_one(&mut transaction)
        .await?;

        Student::adjust_points(student_id, activity_added_delta(points), &mut transaction).await?;
        transaction.commit().await?;

        Ok(activity)
    }
}

#[derive(InputObject)]
pub struct NewActivity {
    pub activity_name: String,
    pub description: String,
    pub points: i64,
}
