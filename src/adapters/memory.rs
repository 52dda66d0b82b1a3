//! In-memory `ChatRepository` used by tests and local experiments.
//!
//! Enforces the same one-room-per-pair rule as the PostgreSQL schema, and can
//! be told to fail or to miss pair lookups so error paths can be exercised.

use crate::domain::chat_room::{ChatRoom, MemberPair};
use crate::domain::message::Message;
use crate::domain::repository::ChatRepository;
use crate::domain::user::User;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use time::OffsetDateTime;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<String, User>,
    rooms: Vec<ChatRoom>,
    room_index: HashMap<MemberPair, i64>,
    messages: Vec<Message>,
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryChatRepository {
    tables: Arc<Mutex<Tables>>,
    unavailable: Arc<AtomicBool>,
    missed_pair_lookups: Arc<AtomicUsize>,
}

impl InMemoryChatRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository pre-populated with users named by id.
    #[must_use]
    pub fn with_users(ids: &[&str]) -> Self {
        let now = OffsetDateTime::now_utc();
        let mut tables = Tables::default();
        for id in ids {
            tables.users.insert(
                (*id).to_string(),
                User {
                    id: (*id).to_string(),
                    display_name: format!("User {id}"),
                    created_at: now,
                    last_login_at: now,
                },
            );
        }
        Self { tables: Arc::new(Mutex::new(tables)), ..Self::default() }
    }

    /// While set, every call fails as if the database were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Makes the next `count` pair lookups report no room, mimicking a
    /// concurrent writer that commits between lookup and insert.
    pub fn miss_next_pair_lookups(&self, count: usize) {
        self.missed_pair_lookups.store(count, Ordering::SeqCst);
    }

    pub async fn room_count(&self) -> usize {
        self.tables.lock().await.rooms.len()
    }

    pub async fn message_count(&self) -> usize {
        self.tables.lock().await.messages.len()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn find_users_by_ids(&self, ids: &[&str]) -> Result<Vec<User>> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        Ok(tables.users.values().filter(|u| ids.contains(&u.id.as_str())).cloned().collect())
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.check_available()?;
        Ok(self.tables.lock().await.users.get(id).cloned())
    }

    async fn find_room_by_member_pair(&self, a: &str, b: &str) -> Result<Option<ChatRoom>> {
        self.check_available()?;
        let missed = self
            .missed_pair_lookups
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if missed {
            return Ok(None);
        }

        let tables = self.tables.lock().await;
        let room = tables
            .room_index
            .get(&MemberPair::new(a, b))
            .and_then(|id| tables.rooms.iter().find(|r| r.id == *id))
            .cloned();
        Ok(room)
    }

    async fn create_room(&self, member1_id: &str, member2_id: &str) -> Result<ChatRoom> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;

        let pair = MemberPair::new(member1_id, member2_id);
        if tables.room_index.contains_key(&pair) {
            return Err(AppError::Conflict("Chat room already exists".to_string()));
        }

        let room = ChatRoom {
            id: i64::try_from(tables.rooms.len()).map_err(|_| AppError::Internal("room id overflow".into()))? + 1,
            member1_id: member1_id.to_string(),
            member2_id: member2_id.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        tables.room_index.insert(pair, room.id);
        tables.rooms.push(room.clone());
        Ok(room)
    }

    async fn create_message(&self, content: &str, sender_id: &str, chat_room_id: i64) -> Result<Message> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;

        let message = Message {
            id: i64::try_from(tables.messages.len())
                .map_err(|_| AppError::Internal("message id overflow".into()))?
                + 1,
            content: content.to_string(),
            sender_id: sender_id.to_string(),
            chat_room_id,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.messages.push(message.clone());
        Ok(message)
    }

    async fn find_rooms_for_user(&self, user_id: &str) -> Result<Vec<ChatRoom>> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        Ok(tables.rooms.iter().filter(|r| r.has_member(user_id)).cloned().collect())
    }

    async fn find_room_by_id(&self, id: i64) -> Result<Option<ChatRoom>> {
        self.check_available()?;
        Ok(self.tables.lock().await.rooms.iter().find(|r| r.id == id).cloned())
    }

    async fn find_messages_by_room(&self, chat_room_id: i64) -> Result<Vec<Message>> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        Ok(tables.messages.iter().filter(|m| m.chat_room_id == chat_room_id).cloned().collect())
    }

    async fn count_users(&self) -> Result<i64> {
        self.check_available()?;
        let count = self.tables.lock().await.users.len();
        i64::try_from(count).map_err(|_| AppError::Internal("user count overflow".into()))
    }

    async fn insert_user(&self, user: &User) -> Result<bool> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        if tables.users.contains_key(&user.id) {
            return Ok(false);
        }
        tables.users.insert(user.id.clone(), user.clone());
        Ok(true)
    }

    async fn ping(&self) -> Result<()> {
        self.check_available()
    }
}
