use super::{is_unique_violation, Database, Role, User, UserRecord};
use crate::error::{AppError, Result};
use tracing::info;

const SQL_INSERT_USER: &str = r#"
INSERT INTO users (name, email, password, role)
VALUES (?1, ?2, ?3, ?4)
"#;

const SQL_USER_BY_EMAIL: &str = r#"
SELECT id, name, email, password, role, created_at
FROM users
WHERE email = ?1
"#;

const SQL_USER_BY_ID: &str = r#"
SELECT id, name, email, password, role, created_at
FROM users
WHERE id = ?1
"#;

const SQL_LIST_USERS: &str = r#"
SELECT id, name, email, role, created_at
FROM users
ORDER BY id
"#;

impl Database {
    /// Insert a user; `password_digest` must already be hashed.
    /// Returns the new user id.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_digest: &str,
        role: Role,
    ) -> Result<i64> {
        let result = sqlx::query(SQL_INSERT_USER)
            .bind(name)
            .bind(email)
            .bind(password_digest)
            .bind(role)
            .execute(self.pool())
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("User with this email already exists".to_string())
                } else {
                    AppError::Database(e)
                }
            })?;

        let user_id = result.last_insert_rowid();
        info!(user_id, role = %role, "Created user");
        Ok(user_id)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(SQL_USER_BY_EMAIL)
            .bind(email)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    pub async fn get_user_by_id(&self, user_id: i64) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(SQL_USER_BY_ID)
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    pub async fn count_users_by_role(&self, role: Role) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = ?1")
            .bind(role)
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(SQL_LIST_USERS)
            .fetch_all(self.pool())
            .await?;
        Ok(users)
    }

    pub async fn count_users(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}
