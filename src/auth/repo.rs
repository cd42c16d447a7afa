use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
}

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Create a new user with a hashed password. Surfaces the unique-email
    /// constraint as a database error for the handler to classify.
    pub async fn create(
        db: &SqlitePool,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, email, password_hash, role
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations");
        pool
    }

    #[tokio::test]
    async fn create_and_find_roundtrip() {
        let pool = test_pool().await;
        let created = User::create(&pool, "Alice", "alice@example.com", "hash", Role::Student)
            .await
            .expect("create user");

        let found = User::find_by_email(&pool, "alice@example.com")
            .await
            .expect("query")
            .expect("user present");
        assert_eq!(found.id, created.id);
        assert_eq!(found.name, "Alice");
        assert_eq!(found.role, Role::Student);

        let missing = User::find_by_email(&pool, "nobody@example.com")
            .await
            .expect("query");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_unique_violation() {
        let pool = test_pool().await;
        User::create(&pool, "Alice", "alice@example.com", "hash", Role::Student)
            .await
            .expect("first create");

        let err = User::create(&pool, "Other", "alice@example.com", "hash2", Role::Student)
            .await
            .expect_err("second create must fail");
        let is_unique = err
            .as_database_error()
            .is_some_and(|d| d.is_unique_violation());
        assert!(is_unique, "expected unique violation, got {err:?}");

        // First account is unaffected.
        let alice = User::find_by_email(&pool, "alice@example.com")
            .await
            .expect("query")
            .expect("still present");
        assert_eq!(alice.name, "Alice");
    }
}
