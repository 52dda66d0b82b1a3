use crate::adapters::database::records::MessageRecord;
use crate::domain::message::Message;
use crate::error::Result;
use sqlx::PgConnection;

#[derive(Clone, Debug, Default)]
pub struct MessageRepository {}

impl MessageRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// Records a new message in the database.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the insert fails.
    #[tracing::instrument(level = "debug", skip(self, conn, content))]
    pub(crate) async fn create(
        &self,
        conn: &mut PgConnection,
        content: &str,
        sender_id: &str,
        chat_room_id: i64,
    ) -> Result<Message> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r#"
            INSERT INTO messages (content, sender_id, chat_room_id)
            VALUES ($1, $2, $3)
            RETURNING id, content, sender_id, chat_room_id, created_at
            "#,
        )
        .bind(content)
        .bind(sender_id)
        .bind(chat_room_id)
        .fetch_one(conn)
        .await?;

        Ok(record.into())
    }

    /// Fetches every message of a room, oldest first.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(level = "debug", skip(self, conn))]
    pub(crate) async fn find_by_room(&self, conn: &mut PgConnection, chat_room_id: i64) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, content, sender_id, chat_room_id, created_at
            FROM messages
            WHERE chat_room_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(chat_room_id)
        .fetch_all(conn)
        .await?;

        Ok(messages.into_iter().map(Into::into).collect())
    }
}
