use crate::adapters::database::records::UserRecord;
use crate::domain::user::User;
use crate::error::Result;
use sqlx::PgConnection;

#[derive(Clone, Debug, Default)]
pub struct UserRepository {}

impl UserRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// Fetches every user whose id is in `ids`.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn find_by_ids(&self, conn: &mut PgConnection, ids: &[&str]) -> Result<Vec<User>> {
        let ids: Vec<String> = ids.iter().map(|id| (*id).to_string()).collect();

        let users = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, display_name, created_at, last_login_at
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(conn)
        .await?;

        Ok(users.into_iter().map(Into::into).collect())
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn find_by_id(&self, conn: &mut PgConnection, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, display_name, created_at, last_login_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(user.map(Into::into))
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn count(&self, conn: &mut PgConnection) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(conn).await?;
        Ok(count)
    }

    /// Inserts a user, leaving an existing row with the same id untouched.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the insert fails.
    #[tracing::instrument(level = "debug", skip(self, conn, user), fields(user_id = %user.id))]
    pub(crate) async fn insert(&self, conn: &mut PgConnection, user: &User) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, display_name, created_at, last_login_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&user.id)
        .bind(&user.display_name)
        .bind(user.created_at)
        .bind(user.last_login_at)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
