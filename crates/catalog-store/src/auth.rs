//! # Auth Store
//!
//! Local accounts and the single active session.
//!
//! ## State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AuthState                                                              │
//! │  ├── users: Vec<User>           ◄──► "users" (seed list until written)  │
//! │  └── session: Option<SessionUser> ◄──► "user"                            │
//! │                                                                         │
//! │  login ─────────► session = Some(user.session())                        │
//! │  logout ────────► session = None, "user" removed                        │
//! │  register ──────► users.push(..)        (session untouched)             │
//! │  change_password► users[i].password = hash(new)                         │
//! │  update_profile ► users[i] + session renamed, profile_updated notified  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session never carries a password: [`SessionUser`] has no such field.

use catalog_core::validation::{validate_email, validate_password, validate_person_name};
use catalog_core::{NotificationKind, SessionUser, User};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PasswordScheme;
use crate::error::{StoreError, StoreResult};
use crate::notifications::NotificationStore;
use crate::password::{hash_password, verify_password};
use crate::storage::{keys, load_json, save_json, SharedStorage};

struct AuthState {
    users: Vec<User>,
    session: Option<SessionUser>,
}

/// Accounts and session.
pub struct AuthStore {
    state: Mutex<AuthState>,
    storage: SharedStorage,
    notifications: NotificationStore,
    password_scheme: PasswordScheme,
}

impl AuthStore {
    /// Restores users and session from storage.
    ///
    /// `seed_users` is the list used when storage holds no `users` entry.
    pub async fn load(
        storage: SharedStorage,
        seed_users: Vec<User>,
        notifications: NotificationStore,
        password_scheme: PasswordScheme,
    ) -> StoreResult<Self> {
        let users = load_json(storage.as_ref(), keys::USERS)
            .await?
            .unwrap_or(seed_users);
        let session: Option<SessionUser> = load_json(storage.as_ref(), keys::USER).await?;

        info!(
            users = users.len(),
            restored_session = session.is_some(),
            "Auth store loaded"
        );

        Ok(AuthStore {
            state: Mutex::new(AuthState { users, session }),
            storage,
            notifications,
            password_scheme,
        })
    }

    /// Starts a session for the user with this email and password.
    pub async fn login(&self, email: &str, password: &str) -> StoreResult<SessionUser> {
        let mut state = self.state.lock().await;

        let user = state.users.iter().find(|u| u.email == email);
        let session = match user {
            Some(user) if verify_password(password, &user.password).await => user.session(),
            _ => {
                warn!(email = %email, "Login rejected");
                return Err(StoreError::InvalidCredentials);
            }
        };

        state.session = Some(session.clone());
        save_json(self.storage.as_ref(), keys::USER, &session).await?;

        info!(user_id = %session.id, "User logged in");
        Ok(session)
    }

    /// Creates an account. Does not log the new user in.
    ///
    /// ## Returns
    /// The new user's id.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> StoreResult<String> {
        validate_person_name(name)?;
        validate_email(email)?;
        validate_password(password)?;
        let password = hash_password(password, self.password_scheme).await?;

        let mut state = self.state.lock().await;

        if state.users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail(email.to_string()));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.trim().to_string(),
            password,
        };
        let id = user.id.clone();

        state.users.push(user);
        save_json(self.storage.as_ref(), keys::USERS, &state.users).await?;

        info!(user_id = %id, "User registered");
        Ok(id)
    }

    /// Ends the session and forgets it in storage.
    pub async fn logout(&self) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        if let Some(session) = state.session.take() {
            info!(user_id = %session.id, "User logged out");
        }
        self.storage.remove(keys::USER).await
    }

    /// Replaces the password of the account with this email.
    pub async fn change_password(&self, email: &str, new_password: &str) -> StoreResult<()> {
        validate_password(new_password)?;
        let password = hash_password(new_password, self.password_scheme).await?;

        let mut state = self.state.lock().await;

        let user = state
            .users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or_else(|| StoreError::not_found("User", email))?;
        user.password = password;
        debug!(user_id = %user.id, "Password changed");

        save_json(self.storage.as_ref(), keys::USERS, &state.users).await
    }

    /// Renames the logged-in user and/or changes their email.
    pub async fn update_profile(&self, name: &str, email: &str) -> StoreResult<SessionUser> {
        validate_person_name(name)?;
        validate_email(email)?;

        let mut state = self.state.lock().await;

        let current_id = state
            .session
            .as_ref()
            .map(|s| s.id.clone())
            .ok_or(StoreError::NotAuthenticated)?;

        if state
            .users
            .iter()
            .any(|u| u.email == email && u.id != current_id)
        {
            return Err(StoreError::DuplicateEmail(email.to_string()));
        }

        let name = name.trim().to_string();
        if let Some(user) = state.users.iter_mut().find(|u| u.id == current_id) {
            user.name = name.clone();
            user.email = email.to_string();
        }
        let session = SessionUser {
            id: current_id,
            email: email.to_string(),
            name,
        };
        state.session = Some(session.clone());

        save_json(self.storage.as_ref(), keys::USERS, &state.users).await?;
        save_json(self.storage.as_ref(), keys::USER, &session).await?;
        drop(state);

        self.notifications
            .notify(
                &session.id,
                NotificationKind::ProfileUpdated,
                "Your profile was updated",
            )
            .await?;

        info!(user_id = %session.id, "Profile updated");
        Ok(session)
    }

    /// The logged-in user, if any.
    pub async fn current_user(&self) -> Option<SessionUser> {
        self.state.lock().await.session.clone()
    }

    /// The logged-in user, or `NotAuthenticated`.
    pub async fn require_user(&self) -> StoreResult<SessionUser> {
        self.current_user().await.ok_or(StoreError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryKeyValueStore};
    use std::sync::Arc;

    fn seed_users() -> Vec<User> {
        vec![
            User {
                id: "1".into(),
                email: "john@example.com".into(),
                name: "John Doe".into(),
                password: "Password123".into(),
            },
            User {
                id: "2".into(),
                email: "jane@example.com".into(),
                name: "Jane Smith".into(),
                password: "Password123".into(),
            },
        ]
    }

    async fn store_on(memory: Arc<MemoryKeyValueStore>, scheme: PasswordScheme) -> AuthStore {
        let notifications = NotificationStore::load(memory.clone()).await.unwrap();
        AuthStore::load(memory, seed_users(), notifications, scheme)
            .await
            .unwrap()
    }

    async fn store() -> (AuthStore, Arc<MemoryKeyValueStore>) {
        let memory = Arc::new(MemoryKeyValueStore::new());
        (store_on(memory.clone(), PasswordScheme::Argon2).await, memory)
    }

    #[tokio::test]
    async fn test_login_success_persists_session_without_password() {
        let (auth, memory) = store().await;

        let session = auth.login("john@example.com", "Password123").await.unwrap();
        assert_eq!(session.id, "1");
        assert_eq!(auth.current_user().await, Some(session));

        let stored = memory.get(keys::USER).await.unwrap().unwrap();
        assert!(!stored.contains("password"));
        assert!(!stored.contains("Password123"));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let (auth, _) = store().await;

        let err = auth.login("john@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));
        let err = auth.login("nobody@example.com", "Password123").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));
        assert_eq!(auth.current_user().await, None);
    }

    #[tokio::test]
    async fn test_register_then_login_with_hashed_password() {
        let (auth, memory) = store().await;

        let id = auth
            .register("New User", "new@example.com", "Secret99")
            .await
            .unwrap();
        assert_eq!(auth.current_user().await, None);

        let stored = memory.get(keys::USERS).await.unwrap().unwrap();
        assert!(stored.contains("$argon2"));
        assert!(!stored.contains("Secret99"));

        let session = auth.login("new@example.com", "Secret99").await.unwrap();
        assert_eq!(session.id, id);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (auth, memory) = store().await;

        let err = auth
            .register("Another", "john@example.com", "Secret99")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));
        assert_eq!(memory.write_count(), 0);
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let (auth, _) = store().await;

        let err = auth.register("N", "n@example.com", "Secret99").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        let err = auth.register("Name", "not-an-email", "Secret99").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        let err = auth.register("Name", "n@example.com", "weak").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_registered_users_survive_reload() {
        let memory = Arc::new(MemoryKeyValueStore::new());
        let auth = store_on(memory.clone(), PasswordScheme::Plain).await;
        auth.register("New User", "new@example.com", "Secret99")
            .await
            .unwrap();
        auth.login("new@example.com", "Secret99").await.unwrap();

        let reloaded = store_on(memory, PasswordScheme::Plain).await;
        assert_eq!(
            reloaded.current_user().await.map(|u| u.email),
            Some("new@example.com".to_string())
        );
        assert!(reloaded.login("new@example.com", "Secret99").await.is_ok());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (auth, memory) = store().await;
        auth.login("john@example.com", "Password123").await.unwrap();

        auth.logout().await.unwrap();

        assert_eq!(auth.current_user().await, None);
        assert_eq!(memory.get(keys::USER).await.unwrap(), None);
        assert!(matches!(
            auth.require_user().await,
            Err(StoreError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_change_password() {
        let (auth, _) = store().await;

        auth.change_password("jane@example.com", "Changed42")
            .await
            .unwrap();

        assert!(auth.login("jane@example.com", "Password123").await.is_err());
        assert!(auth.login("jane@example.com", "Changed42").await.is_ok());

        let err = auth
            .change_password("ghost@example.com", "Changed42")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_profile() {
        let memory = Arc::new(MemoryKeyValueStore::new());
        let notifications = NotificationStore::load(memory.clone()).await.unwrap();
        let auth = AuthStore::load(
            memory.clone(),
            seed_users(),
            notifications.clone(),
            PasswordScheme::Argon2,
        )
        .await
        .unwrap();

        let err = auth.update_profile("John", "john@example.com").await.unwrap_err();
        assert!(matches!(err, StoreError::NotAuthenticated));

        auth.login("john@example.com", "Password123").await.unwrap();

        let err = auth
            .update_profile("John", "jane@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));

        let session = auth
            .update_profile("Johnny", "johnny@example.com")
            .await
            .unwrap();
        assert_eq!(session.name, "Johnny");
        assert_eq!(auth.current_user().await, Some(session));

        assert!(auth.login("johnny@example.com", "Password123").await.is_ok());

        let feed = notifications.for_user("1").await;
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].kind, NotificationKind::ProfileUpdated);
    }
}
