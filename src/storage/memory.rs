use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{App, AppRegistry, StorageError, User, UserStore};

#[derive(Default)]
struct Tables {
    users: HashMap<i64, (User, bool)>,
    apps: HashMap<i32, App>,
    next_id: i64,
}

/// Map-backed store. One lock guards every table, so duplicate checks and
/// inserts are atomic like the unique index in Postgres.
#[derive(Default)]
pub struct MemoryStorage {
    tables: Mutex<Tables>,
}

impl MemoryStorage {
    pub fn with_app(self, id: i32, name: &str, secret: &str) -> Self {
        self.tables.lock().expect("memory storage lock").apps.insert(
            id,
            App {
                id,
                name: name.into(),
                secret: secret.into(),
            },
        );
        self
    }

    pub fn set_admin(&self, user_id: i64, is_admin: bool) {
        if let Some(row) = self
            .tables
            .lock()
            .expect("memory storage lock")
            .users
            .get_mut(&user_id)
        {
            row.1 = is_admin;
        }
    }

    pub fn users_with_email(&self, email: &str) -> usize {
        self.tables
            .lock()
            .expect("memory storage lock")
            .users
            .values()
            .filter(|(u, _)| u.email == email)
            .count()
    }
}

#[async_trait]
impl UserStore for MemoryStorage {
    async fn save_user(&self, email: &str, pass_hash: &[u8]) -> Result<i64, StorageError> {
        let mut t = self.tables.lock().expect("memory storage lock");
        if t.users.values().any(|(u, _)| u.email == email) {
            return Err(StorageError::UserExists);
        }
        t.next_id += 1;
        let id = t.next_id;
        let user = User {
            id,
            email: email.into(),
            pass_hash: pass_hash.to_vec(),
        };
        t.users.insert(id, (user, false));
        Ok(id)
    }

    async fn user_by_email(&self, email: &str) -> Result<User, StorageError> {
        let t = self.tables.lock().expect("memory storage lock");
        t.users
            .values()
            .find(|(u, _)| u.email == email)
            .map(|(u, _)| u.clone())
            .ok_or(StorageError::UserNotFound)
    }

    async fn is_admin(&self, user_id: i64) -> Result<bool, StorageError> {
        let t = self.tables.lock().expect("memory storage lock");
        t.users
            .get(&user_id)
            .map(|(_, admin)| *admin)
            .ok_or(StorageError::UserNotFound)
    }
}

#[async_trait]
impl AppRegistry for MemoryStorage {
    async fn app(&self, app_id: i32) -> Result<App, StorageError> {
        let t = self.tables.lock().expect("memory storage lock");
        t.apps.get(&app_id).cloned().ok_or(StorageError::AppNotFound)
    }
}
