//! In-memory user credential store.
//!
//! Pingboard keeps no persisted state; registered users live only for the
//! lifetime of the process and are lost on restart.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::info;

use pingboard_core::error::AppError;
use pingboard_core::types::UserId;

/// A registered user record.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Stable user identity (the username).
    pub id: UserId,
    /// Argon2id password hash (PHC string).
    pub password_hash: String,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

/// Thread-safe in-memory store of registered users, keyed by username.
#[derive(Debug, Default)]
pub struct UserStore {
    users: DashMap<String, UserRecord>,
}

impl UserStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    /// Registers a new user with a pre-hashed password.
    ///
    /// Fails with a conflict error if the username is already taken.
    pub fn register(&self, username: &str, password_hash: String) -> Result<UserRecord, AppError> {
        let record = UserRecord {
            id: UserId::new(username),
            password_hash,
            created_at: Utc::now(),
        };

        match self.users.entry(username.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(AppError::conflict("User already exists"))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(record.clone());
                info!(username = %username, "User registered");
                Ok(record)
            }
        }
    }

    /// Looks up a user by username.
    pub fn get(&self, username: &str) -> Option<UserRecord> {
        self.users.get(username).map(|r| r.value().clone())
    }

    /// Returns the number of registered users.
    pub fn count(&self) -> usize {
        self.users.len()
    }
}
