//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::gemini::GeminiClient;
use crate::services::SentimentClassifier;
use crate::supabase::{AuthClient, FeedbackStore, UserStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and the clients for
/// the managed services. There is no connection pool or cache here - every
/// piece of state the portal reads lives behind the external services.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    auth: AuthClient,
    users: UserStore,
    feedback: FeedbackStore,
    classifier: SentimentClassifier,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let auth = AuthClient::new(&config.supabase);
        let users = UserStore::new(&config.supabase);
        let feedback = FeedbackStore::new(&config.supabase);
        let classifier = SentimentClassifier::new(GeminiClient::new(&config.gemini));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                users,
                feedback,
                classifier,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the auth-service client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Get a reference to the elevated users store.
    #[must_use]
    pub fn users(&self) -> &UserStore {
        &self.inner.users
    }

    /// Get a reference to the feedback store.
    #[must_use]
    pub fn feedback(&self) -> &FeedbackStore {
        &self.inner.feedback
    }

    /// Get a reference to the sentiment classifier.
    #[must_use]
    pub fn classifier(&self) -> &SentimentClassifier {
        &self.inner.classifier
    }
}
