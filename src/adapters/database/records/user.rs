use crate::domain::user::User;
use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct UserRecord {
    pub(crate) id: String,
    pub(crate) display_name: String,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) last_login_at: OffsetDateTime,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            display_name: record.display_name,
            created_at: record.created_at,
            last_login_at: record.last_login_at,
        }
    }
}
