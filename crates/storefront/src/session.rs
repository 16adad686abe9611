//! Auth session state backed by a client-persisted key-value store.
//!
//! The storefront tracks sign-in state through three independent entries
//! (bearer token, display name, email) under fixed keys. [`AuthSession`]
//! re-hydrates from the store once at construction; `login` and `logout`
//! mutate the store and the in-memory state synchronously, with no network
//! calls.
//!
//! Session expiry (a 401 from the gateway) is surfaced as a
//! [`SessionEvent::Expired`] on a broadcast channel rather than a hidden
//! navigation side effect; the UI layer subscribes and decides what to do.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::broadcast;

/// Storage key for the bearer credential.
pub const TOKEN_KEY: &str = "authToken";
/// Storage key for the signed-in user's display name.
pub const USER_NAME_KEY: &str = "userName";
/// Storage key for the signed-in user's email.
pub const USER_EMAIL_KEY: &str = "userEmail";

/// A client-persisted string key-value store.
///
/// Each write is a single atomic operation; there is no cross-key
/// transactionality, matching the storage the storefront runs against.
pub trait CredentialStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
    /// Store `value` under `key`, replacing any previous value.
    fn insert(&self, key: &str, value: &str);
    /// Remove the entry under `key` if present.
    fn remove(&self, key: &str);
}

/// In-memory [`CredentialStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store wrapped for shared ownership.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn insert(&self, key: &str, value: &str) {
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
    }
}

/// Events emitted by the data layer about the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The gateway rejected the stored credential (401); it has been cleared.
    Expired,
}

/// Broadcast handle for [`SessionEvent`]s.
///
/// Cheap to clone; every subscriber sees every event emitted after it
/// subscribed.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    /// Create a new event channel.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(16);
        Self { tx }
    }

    /// Subscribe to session events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all current subscribers.
    ///
    /// Emitting with no subscribers is not an error; the event is dropped.
    pub fn emit(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the in-memory session state.
#[derive(Debug, Clone, Default)]
struct SessionState {
    authenticated: bool,
    user_name: Option<String>,
    user_email: Option<String>,
}

/// Sign-in state for the storefront.
///
/// Hydrates once from the backing [`CredentialStore`] at construction:
/// a stored token means the user is considered signed in. `login` and
/// `logout` are synchronous and touch only the store.
pub struct AuthSession {
    store: Arc<dyn CredentialStore>,
    state: Mutex<SessionState>,
}

impl AuthSession {
    /// Create a session handle, hydrating from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let state = if store.get(TOKEN_KEY).is_some() {
            SessionState {
                authenticated: true,
                user_name: store.get(USER_NAME_KEY),
                user_email: store.get(USER_EMAIL_KEY),
            }
        } else {
            SessionState::default()
        };

        Self {
            store,
            state: Mutex::new(state),
        }
    }

    /// Record a successful sign-in.
    ///
    /// Writes all three entries and flips the state to authenticated.
    /// No network call is made; the token is whatever the auth endpoint
    /// returned.
    pub fn login(&self, token: &str, name: &str, email: &str) {
        self.store.insert(TOKEN_KEY, token);
        self.store.insert(USER_NAME_KEY, name);
        self.store.insert(USER_EMAIL_KEY, email);

        let mut state = self.lock_state();
        state.authenticated = true;
        state.user_name = Some(name.to_owned());
        state.user_email = Some(email.to_owned());
    }

    /// Clear the session.
    ///
    /// Removes all three entries and flips the state to unauthenticated.
    pub fn logout(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(USER_NAME_KEY);
        self.store.remove(USER_EMAIL_KEY);

        let mut state = self.lock_state();
        *state = SessionState::default();
    }

    /// Whether a user is currently signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock_state().authenticated
    }

    /// Display name of the signed-in user, if any.
    #[must_use]
    pub fn user_name(&self) -> Option<String> {
        self.lock_state().user_name.clone()
    }

    /// Email of the signed-in user, if any.
    #[must_use]
    pub fn user_email(&self) -> Option<String> {
        self.lock_state().user_email.clone()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_then_read() {
        let store = MemoryCredentialStore::shared();
        let session = AuthSession::new(store.clone());

        assert!(!session.is_authenticated());

        session.login("t", "Name", "e@x.com");
        assert!(session.is_authenticated());
        assert_eq!(session.user_name().as_deref(), Some("Name"));
        assert_eq!(session.user_email().as_deref(), Some("e@x.com"));

        // All three entries landed in the store.
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("t"));
        assert_eq!(store.get(USER_NAME_KEY).as_deref(), Some("Name"));
        assert_eq!(store.get(USER_EMAIL_KEY).as_deref(), Some("e@x.com"));
    }

    #[test]
    fn test_logout_resets_everything() {
        let store = MemoryCredentialStore::shared();
        let session = AuthSession::new(store.clone());

        session.login("t", "Name", "e@x.com");
        session.logout();

        assert!(!session.is_authenticated());
        assert_eq!(session.user_name(), None);
        assert_eq!(session.user_email(), None);
        assert_eq!(store.get(TOKEN_KEY), None);
        assert_eq!(store.get(USER_NAME_KEY), None);
        assert_eq!(store.get(USER_EMAIL_KEY), None);
    }

    #[test]
    fn test_hydrates_from_existing_store() {
        let store = MemoryCredentialStore::shared();
        store.insert(TOKEN_KEY, "existing-token");
        store.insert(USER_NAME_KEY, "Returning Reader");
        store.insert(USER_EMAIL_KEY, "reader@example.com");

        let session = AuthSession::new(store);
        assert!(session.is_authenticated());
        assert_eq!(session.user_name().as_deref(), Some("Returning Reader"));
    }

    #[test]
    fn test_no_token_means_unauthenticated() {
        let store = MemoryCredentialStore::shared();
        // Name without a token does not count as a session.
        store.insert(USER_NAME_KEY, "Orphan Name");

        let session = AuthSession::new(store);
        assert!(!session.is_authenticated());
        assert_eq!(session.user_name(), None);
    }

    #[tokio::test]
    async fn test_session_events_broadcast() {
        let events = SessionEvents::new();
        let mut rx = events.subscribe();

        events.emit(SessionEvent::Expired);
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::Expired);
        assert!(rx.try_recv().is_err());
    }
}
