use crate::adapters::database::records::ChatRoomRecord;
use crate::domain::chat_room::ChatRoom;
use crate::error::{AppError, Result};
use sqlx::PgConnection;

#[derive(Clone, Debug, Default)]
pub struct ChatRoomRepository {}

impl ChatRoomRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// Looks up the room for an unordered member pair.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn find_by_pair(&self, conn: &mut PgConnection, a: &str, b: &str) -> Result<Option<ChatRoom>> {
        // Match both orderings by equality. LEAST/GREATEST sort by the database
        // collation, which need not agree with a byte-wise sort.
        let room = sqlx::query_as::<_, ChatRoomRecord>(
            r#"
            SELECT id, member1_id, member2_id, created_at
            FROM chat_rooms
            WHERE (member1_id = $1 AND member2_id = $2)
               OR (member1_id = $2 AND member2_id = $1)
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_optional(conn)
        .await?;

        Ok(room.map(Into::into))
    }

    /// Creates a room.
    ///
    /// # Errors
    /// Returns `AppError::Conflict` if a room for the pair already exists.
    /// Returns `AppError::Database` if the insert fails otherwise.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn create(
        &self,
        conn: &mut PgConnection,
        member1_id: &str,
        member2_id: &str,
    ) -> Result<ChatRoom> {
        let result = sqlx::query_as::<_, ChatRoomRecord>(
            r#"
            INSERT INTO chat_rooms (member1_id, member2_id)
            VALUES ($1, $2)
            RETURNING id, member1_id, member2_id, created_at
            "#,
        )
        .bind(member1_id)
        .bind(member2_id)
        .fetch_one(conn)
        .await;

        match result {
            Ok(record) => Ok(record.into()),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some("23505") => {
                // Unique violation on chat_rooms_member_pair_idx
                Err(AppError::Conflict("Chat room already exists".to_string()))
            }
            Err(e) => Err(AppError::Database(e)),
        }
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn find_for_user(&self, conn: &mut PgConnection, user_id: &str) -> Result<Vec<ChatRoom>> {
        let rooms = sqlx::query_as::<_, ChatRoomRecord>(
            r#"
            SELECT id, member1_id, member2_id, created_at
            FROM chat_rooms
            WHERE member1_id = $1 OR member2_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(conn)
        .await?;

        Ok(rooms.into_iter().map(Into::into).collect())
    }

    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn find_by_id(&self, conn: &mut PgConnection, id: i64) -> Result<Option<ChatRoom>> {
        let room = sqlx::query_as::<_, ChatRoomRecord>(
            r#"
            SELECT id, member1_id, member2_id, created_at
            FROM chat_rooms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(room.map(Into::into))
    }
}
