use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::Date;

/// Review state of a submission. Stored as the display text so rows stay
/// readable in the database file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum ReviewStatus {
    #[serde(rename = "Under Review")]
    #[sqlx(rename = "Under Review")]
    UnderReview,
    #[serde(rename = "Approved")]
    #[sqlx(rename = "Approved")]
    Approved,
    #[serde(rename = "Rejected")]
    #[sqlx(rename = "Rejected")]
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub course: String,
    pub description: String,
    pub file_path: String,
    pub status: ReviewStatus,
    pub date: Date,
}

/// Admin-listing row: project fields joined with the owning student.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SubmissionWithStudent {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub course: String,
    pub description: String,
    pub file_path: String,
    pub status: ReviewStatus,
    pub date: Date,
    pub student_name: String,
    pub email: String,
}

impl Project {
    pub async fn create(
        db: &SqlitePool,
        user_id: i64,
        title: &str,
        course: &str,
        description: &str,
        file_path: &str,
        date: Date,
    ) -> Result<Project, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (user_id, title, course, description, file_path, date)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, title, course, description, file_path, status, date
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(course)
        .bind(description)
        .bind(file_path)
        .bind(date)
        .fetch_one(db)
        .await
    }

    /// A user's submissions, newest first.
    pub async fn list_for_user(
        db: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT id, user_id, title, course, description, file_path, status, date
            FROM projects
            WHERE user_id = ?
            ORDER BY id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    /// Every submission joined with its owner, newest first. Projects whose
    /// owner row is missing fall out of the inner join.
    pub async fn list_all_with_students(
        db: &SqlitePool,
    ) -> Result<Vec<SubmissionWithStudent>, sqlx::Error> {
        sqlx::query_as::<_, SubmissionWithStudent>(
            r#"
            SELECT p.id, p.user_id, p.title, p.course, p.description,
                   p.file_path, p.status, p.date,
                   u.name AS student_name, u.email
            FROM projects p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.id DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    /// Returns `true` iff a row was updated.
    pub async fn update_status(
        db: &SqlitePool,
        id: i64,
        status: ReviewStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE projects SET status = ? WHERE id = ?
            "#,
        )
        .bind(status)
        .bind(id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
