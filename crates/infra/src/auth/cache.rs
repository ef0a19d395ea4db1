use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::token::Token;

/// In-memory token cache keyed by client id
///
/// Clones share the same map. Reads take the shared lock; inserts and clears
/// take the exclusive lock, so a reader never sees a partially written entry.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    tokens: Arc<RwLock<HashMap<String, Token>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, client_id: &str) -> Option<Token> {
        self.tokens.read().await.get(client_id).cloned()
    }

    /// Store `token`, replacing any previous entry for `client_id`
    pub async fn insert(&self, client_id: impl Into<String>, token: Token) {
        self.tokens.write().await.insert(client_id.into(), token);
    }

    /// Drop every cached token
    pub async fn clear(&self) {
        self.tokens.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}
