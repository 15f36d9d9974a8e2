//! Session Context
//!
//! The bearer credential shared by every backend command, and the
//! sign-out notifications the front end listens to.

use tokio::sync::{watch, RwLock};

use crate::credential_store::{CredentialStore, StoredCredential};
use crate::error::{GroceryError, GroceryResult};

/// Screen the front end should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    SignedIn,
}

/// Session holding the current credential
///
/// Only the login flow sets the token; sign-out (explicit or after a 403)
/// clears it, wipes the credential store and notifies subscribers.
pub struct Session {
    token: RwLock<Option<String>>,
    store: Option<CredentialStore>,
    state: watch::Sender<SessionState>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Signed-out, in-memory session
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::SignedOut);
        Self {
            token: RwLock::new(None),
            store: None,
            state,
        }
    }

    /// In-memory session that starts signed in
    pub fn with_token(token: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SessionState::SignedIn);
        Self {
            token: RwLock::new(Some(token.into())),
            store: None,
            state,
        }
    }

    /// Session backed by a credential store, resuming any saved credential
    pub fn restore(store: CredentialStore) -> Self {
        let token = store.load().map(|credential| credential.token);
        let initial = if token.is_some() {
            SessionState::SignedIn
        } else {
            SessionState::SignedOut
        };
        let (state, _) = watch::channel(initial);
        Self {
            token: RwLock::new(token),
            store: Some(store),
            state,
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Current token, or `NotSignedIn`
    pub async fn bearer(&self) -> GroceryResult<String> {
        self.token().await.ok_or(GroceryError::NotSignedIn)
    }

    pub async fn is_signed_in(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Store a freshly issued token
    pub async fn set_token(&self, token: String) -> GroceryResult<()> {
        if let Some(store) = &self.store {
            store.save(&StoredCredential {
                token: token.clone(),
            })?;
        }
        *self.token.write().await = Some(token);
        self.state.send_replace(SessionState::SignedIn);
        log::info!("Session signed in");
        Ok(())
    }

    /// Drop the credential and notify subscribers
    pub async fn sign_out(&self) {
        *self.token.write().await = None;
        if let Some(store) = &self.store {
            if let Err(e) = store.clear() {
                log::warn!("Failed to clear stored credential: {}", e);
            }
        }
        self.state.send_replace(SessionState::SignedOut);
        log::info!("Session signed out");
    }

    /// Login screen without a credential, list screen with one
    pub async fn starting_route(&self) -> Route {
        if self.is_signed_in().await {
            Route::List
        } else {
            Route::Login
        }
    }

    /// Watch sign-in / sign-out transitions
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}
