use super::{NewUser, StoreError, UserRecord, UserStore};
use async_trait::async_trait;
use std::collections::{hash_map::Entry, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local store keyed by email. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<Uuid, StoreError> {
        let mut users = self.users.write().await;
        match users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate),
            Entry::Vacant(slot) => {
                let id = user.id;
                slot.insert(user.into_record());
                Ok(id)
            }
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PasswordHash;
    use chrono::Utc;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            id: Uuid::now_v7(),
            name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            email: email.to_string(),
            phone: "+44 20 0000 0000".to_string(),
            password_hash: PasswordHash::from_stored("$2b$04$placeholder".to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_then_find() -> Result<(), StoreError> {
        let store = MemoryUserStore::new();
        assert!(store.is_empty().await);

        let user = new_user("a@x.com");
        let expected = user.id;
        let id = store.insert_user(user).await?;
        assert_eq!(id, expected);

        let found = store.find_user_by_email("a@x.com").await?;
        assert_eq!(found.map(|u| u.id), Some(id));
        assert!(store.find_user_by_email("b@x.com").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() -> Result<(), StoreError> {
        let store = MemoryUserStore::new();
        store.insert_user(new_user("a@x.com")).await?;
        assert!(matches!(
            store.insert_user(new_user("a@x.com")).await,
            Err(StoreError::Duplicate)
        ));
        assert_eq!(store.len().await, 1);
        Ok(())
    }
}
