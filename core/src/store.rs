//! In-memory session state: the token pair and the cached profile.
//!
//! # Design
//! All session mutation funnels through this store, so token writes happen
//! in exactly one place. The store is cheap to clone and share; the inner
//! state sits behind a single async mutex. A failed refresh does not clear
//! anything here: tokens are only written on login or refresh success and
//! removed on logout.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::types::{AuthTokens, Profile};

#[derive(Debug, Default)]
struct SessionState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    profile: Option<Profile>,
}

/// Shared holder for the current session's tokens and cached profile.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    state: Arc<Mutex<SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store both tokens, replacing whatever was there.
    pub async fn set_tokens(&self, tokens: &AuthTokens) {
        let mut state = self.state.lock().await;
        state.access_token = Some(tokens.access.clone());
        state.refresh_token = Some(tokens.refresh.clone());
    }

    /// Replace only the access token, keeping the refresh token.
    pub async fn set_access_token(&self, access: String) {
        self.state.lock().await.access_token = Some(access);
    }

    /// Drop both tokens. The cached profile stays; it is public data.
    pub async fn clear_tokens(&self) {
        let mut state = self.state.lock().await;
        state.access_token = None;
        state.refresh_token = None;
    }

    pub async fn cache_profile(&self, profile: Profile) {
        self.state.lock().await.profile = Some(profile);
    }

    pub async fn access_token(&self) -> Option<String> {
        self.state.lock().await.access_token.clone()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.state.lock().await.refresh_token.clone()
    }

    pub async fn cached_profile(&self) -> Option<Profile> {
        self.state.lock().await.profile.clone()
    }
}
