//! # Notification Store
//!
//! The per-user activity feed.
//!
//! ```text
//! DataStore / AuthStore ──notify()──► [newest, ..., oldest] ──► "notifications"
//!                                           │
//!               for_user(id) / unread_count(id) (tab badge)
//! ```
//!
//! Every user's notifications share one list; reads filter by `user_id`.
//! Entries are never removed.

use std::sync::Arc;

use catalog_core::{Notification, NotificationKind};
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::storage::{keys, load_json, save_json, SharedStorage};

/// Handle to the notification feed. Clones share the same feed.
#[derive(Clone)]
pub struct NotificationStore {
    notifications: Arc<Mutex<Vec<Notification>>>,
    storage: SharedStorage,
}

impl NotificationStore {
    /// Restores the feed from storage (empty if nothing is stored).
    pub async fn load(storage: SharedStorage) -> StoreResult<Self> {
        let notifications: Vec<Notification> = load_json(storage.as_ref(), keys::NOTIFICATIONS)
            .await?
            .unwrap_or_default();

        info!(count = notifications.len(), "Notification feed loaded");

        Ok(NotificationStore {
            notifications: Arc::new(Mutex::new(notifications)),
            storage,
        })
    }

    /// Records a new unread notification for `user_id` at the head of the feed.
    pub async fn notify(
        &self,
        user_id: &str,
        kind: NotificationKind,
        message: impl Into<String>,
    ) -> StoreResult<Notification> {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            message: message.into(),
            kind,
            timestamp: Utc::now(),
            read: false,
        };

        debug!(user_id = %user_id, kind = %kind, "Adding notification");

        let mut notifications = self.notifications.lock().await;
        notifications.insert(0, notification.clone());
        save_json(self.storage.as_ref(), keys::NOTIFICATIONS, &*notifications).await?;

        Ok(notification)
    }

    /// Marks one notification as read.
    pub async fn mark_as_read(&self, id: &str) -> StoreResult<()> {
        let mut notifications = self.notifications.lock().await;

        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| StoreError::not_found("Notification", id))?;
        notification.read = true;

        save_json(self.storage.as_ref(), keys::NOTIFICATIONS, &*notifications).await
    }

    /// Marks every notification of `user_id` as read.
    ///
    /// ## Returns
    /// How many notifications changed.
    pub async fn mark_all_as_read(&self, user_id: &str) -> StoreResult<usize> {
        let mut notifications = self.notifications.lock().await;

        let mut changed = 0;
        for n in notifications.iter_mut().filter(|n| n.user_id == user_id && !n.read) {
            n.read = true;
            changed += 1;
        }

        debug!(user_id = %user_id, changed, "Marked notifications as read");
        save_json(self.storage.as_ref(), keys::NOTIFICATIONS, &*notifications).await?;

        Ok(changed)
    }

    /// The feed of `user_id`, newest first.
    pub async fn for_user(&self, user_id: &str) -> Vec<Notification> {
        self.notifications
            .lock()
            .await
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Unread notifications of `user_id`.
    pub async fn unread_count(&self, user_id: &str) -> usize {
        self.notifications
            .lock()
            .await
            .iter()
            .filter(|n| n.user_id == user_id && !n.read)
            .count()
    }

    /// Every notification of every user, newest first.
    pub async fn all(&self) -> Vec<Notification> {
        self.notifications.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryKeyValueStore};

    async fn store() -> (NotificationStore, Arc<MemoryKeyValueStore>) {
        let memory = Arc::new(MemoryKeyValueStore::new());
        let store = NotificationStore::load(memory.clone()).await.unwrap();
        (store, memory)
    }

    #[tokio::test]
    async fn test_newest_first() {
        let (store, _) = store().await;
        store
            .notify("u-1", NotificationKind::ProductAdded, "first")
            .await
            .unwrap();
        store
            .notify("u-1", NotificationKind::ProductUpdated, "second")
            .await
            .unwrap();

        let feed = store.for_user("u-1").await;
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].message, "second");
        assert!(!feed[0].read);
    }

    #[tokio::test]
    async fn test_mark_all_only_touches_one_user() {
        let (store, _) = store().await;
        store.notify("u-1", NotificationKind::ProductAdded, "a").await.unwrap();
        store.notify("u-2", NotificationKind::ProductAdded, "b").await.unwrap();
        store.notify("u-1", NotificationKind::ProductDeleted, "c").await.unwrap();

        assert_eq!(store.mark_all_as_read("u-1").await.unwrap(), 2);

        assert_eq!(store.unread_count("u-1").await, 0);
        assert_eq!(store.unread_count("u-2").await, 1);
        assert!(store.for_user("u-2").await.iter().all(|n| !n.read));
    }

    #[tokio::test]
    async fn test_mark_as_read() {
        let (store, _) = store().await;
        let n = store.notify("u-1", NotificationKind::ProfileUpdated, "x").await.unwrap();

        store.mark_as_read(&n.id).await.unwrap();
        assert_eq!(store.unread_count("u-1").await, 0);

        let err = store.mark_as_read("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_feed_survives_reload() {
        let (store, memory) = store().await;
        store.notify("u-1", NotificationKind::SellerAdded, "s").await.unwrap();

        let stored = memory.get(keys::NOTIFICATIONS).await.unwrap().unwrap();
        assert!(stored.contains("\"type\":\"seller_added\""));
        assert!(stored.contains("\"userId\":\"u-1\""));

        let reloaded = NotificationStore::load(memory).await.unwrap();
        assert_eq!(reloaded.all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_memory_state() {
        let (store, memory) = store().await;
        memory.fail_writes(true);

        let err = store
            .notify("u-1", NotificationKind::ProductAdded, "a")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Persistence { .. }));
        assert_eq!(store.unread_count("u-1").await, 1);
    }
}
