//! In-memory session store
//!
//! Tokens and a generation counter live behind one `RwLock`. Every replace or
//! clear bumps the generation, which lets a caller that saw a 401 tell whether
//! someone else already dealt with it. Login and refresh are serialized by
//! [`SessionStore::gate`].

use erpbridge_domain::TokenPair;
use tokio::sync::{Mutex, MutexGuard, RwLock};

/// Point-in-time view of the session.
#[derive(Debug, Clone)]
pub(crate) struct SessionSnapshot {
    pub tokens: Option<TokenPair>,
    pub generation: u64,
}

#[derive(Debug, Default)]
struct SessionState {
    tokens: Option<TokenPair>,
    generation: u64,
}

#[derive(Debug, Default)]
pub(crate) struct SessionStore {
    state: RwLock<SessionState>,
    gate: Mutex<()>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        SessionSnapshot { tokens: state.tokens.clone(), generation: state.generation }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.tokens.is_some()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.state.read().await.tokens.as_ref().and_then(|t| t.refresh_token.clone())
    }

    pub async fn replace(&self, tokens: TokenPair) -> SessionSnapshot {
        let mut state = self.state.write().await;
        state.tokens = Some(tokens);
        state.generation += 1;
        SessionSnapshot { tokens: state.tokens.clone(), generation: state.generation }
    }

    /// Drop the tokens, returning what was held.
    pub async fn clear(&self) -> Option<TokenPair> {
        let mut state = self.state.write().await;
        let previous = state.tokens.take();
        if previous.is_some() {
            state.generation += 1;
        }
        previous
    }

    /// Single-flight gate for login and refresh.
    pub async fn gate(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }
}
