use time::OffsetDateTime;

/// A two-party room. Member order is insignificant; `member1_id` is simply
/// whoever sent the first message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRoom {
    pub id: i64,
    pub member1_id: String,
    pub member2_id: String,
    pub created_at: OffsetDateTime,
}

impl ChatRoom {
    #[must_use]
    pub fn has_member(&self, user_id: &str) -> bool {
        self.member1_id == user_id || self.member2_id == user_id
    }
}

/// The unordered pair of user ids identifying a room, stored lowest first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberPair {
    low: String,
    high: String,
}

impl MemberPair {
    #[must_use]
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self { low: a.to_string(), high: b.to_string() }
        } else {
            Self { low: b.to_string(), high: a.to_string() }
        }
    }

    #[must_use]
    pub fn low(&self) -> &str {
        &self.low
    }

    #[must_use]
    pub fn high(&self) -> &str {
        &self.high
    }

    #[must_use]
    pub fn is_self_pair(&self) -> bool {
        self.low == self.high
    }
}
