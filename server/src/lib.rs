pub mod database;
pub mod handlers;
pub mod ports;
pub mod tower_middle;

use std::sync::Arc;

use shared::config::LiveConfig;

use crate::ports::{AuthService, JokeRepository, UserRepository};

/// Everything a request handler can reach. Cloned once per connection.
#[derive(Clone)]
pub struct AppState {
    pub config: LiveConfig,
    pub jokes: Arc<dyn JokeRepository>,
    pub users: Arc<dyn UserRepository>,
    pub auth: Arc<dyn AuthService>,
}

impl AppState {
    /// Build state where one store backs every port.
    pub fn new<S>(config: LiveConfig, store: S) -> Self
    where
        S: JokeRepository + UserRepository + AuthService + 'static,
    {
        let store = Arc::new(store);
        Self {
            config,
            jokes: store.clone(),
            users: store.clone(),
            auth: store,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
