use time::OffsetDateTime;

/// An account imported from an external source. Never created over HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub created_at: OffsetDateTime,
    pub last_login_at: OffsetDateTime,
}
