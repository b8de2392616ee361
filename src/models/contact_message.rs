use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_MESSAGE_LIMIT: i64 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub message: String,
    pub read: bool,
    pub replied: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewContactMessage {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFlag {
    Read,
    Replied,
}

impl MessageFlag {
    pub fn column(self) -> &'static str {
        match self {
            MessageFlag::Read => "read",
            MessageFlag::Replied => "replied",
        }
    }
}
