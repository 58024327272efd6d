//! AquaFlow Rust Client Library
//!
//! A Rust client for the AquaFlow water-supply platform: tank monitoring,
//! delivery ordering, supplier pricing, and notifications, coordinated
//! through a single session/data controller that presentation surfaces
//! subscribe to.

pub mod auth;
pub mod cancel;
pub mod config;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod notifications;
pub mod orders;
pub mod pricing;
pub mod suppliers;
pub mod tanks;
pub mod users;

use reqwest::Client;
use std::sync::Arc;

use crate::auth::{AuthApi, SessionStore};
use crate::config::ClientOptions;
use crate::controller::SessionDataController;
use crate::notifications::NotificationsApi;
use crate::orders::OrdersApi;
use crate::suppliers::SuppliersApi;
use crate::tanks::TanksApi;
use crate::users::UsersApi;

/// The main entry point for the AquaFlow client
pub struct AquaFlow {
    /// The base URL of the AquaFlow API
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
}

impl AquaFlow {
    /// Create a new AquaFlow client with default options
    ///
    /// # Example
    ///
    /// ```
    /// use aquaflow::AquaFlow;
    ///
    /// let aquaflow = AquaFlow::new("https://api.example.com/api");
    /// ```
    pub fn new(url: &str) -> Self {
        Self::new_with_options(url, ClientOptions::default())
    }

    /// Create a new AquaFlow client with custom options
    pub fn new_with_options(url: &str, options: ClientOptions) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            http_client: Client::new(),
            options,
        }
    }

    /// Auth endpoint wrapper (login, registration, password flows)
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(&self.url, self.http_client.clone(), &self.options)
    }

    /// Tank resource wrapper
    pub fn tanks(&self) -> TanksApi {
        TanksApi::new(&self.url, self.http_client.clone(), &self.options)
    }

    /// Order resource wrapper
    pub fn orders(&self) -> OrdersApi {
        OrdersApi::new(&self.url, self.http_client.clone(), &self.options)
    }

    /// Supplier resource wrapper
    pub fn suppliers(&self) -> SuppliersApi {
        SuppliersApi::new(&self.url, self.http_client.clone(), &self.options)
    }

    /// Notification resource wrapper
    pub fn notifications(&self) -> NotificationsApi {
        NotificationsApi::new(&self.url, self.http_client.clone(), &self.options)
    }

    /// User resource wrapper
    pub fn users(&self) -> UsersApi {
        UsersApi::new(&self.url, self.http_client.clone(), &self.options)
    }

    /// Build the session/data controller, the state-owning object the
    /// presentation layer is given (explicit construction, no ambient
    /// singleton).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use aquaflow::auth::FileSessionStore;
    /// use aquaflow::AquaFlow;
    ///
    /// # async fn run() {
    /// let aquaflow = AquaFlow::new("https://api.example.com/api");
    /// let store = Arc::new(FileSessionStore::new("session.json"));
    /// let controller = aquaflow.controller(store);
    /// controller.restore_session().await;
    /// # }
    /// ```
    pub fn controller(&self, store: Arc<dyn SessionStore>) -> Arc<SessionDataController> {
        SessionDataController::new(
            self.auth(),
            self.tanks(),
            self.orders(),
            self.suppliers(),
            self.notifications(),
            self.users(),
            store,
            self.options.persist_session,
        )
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{LoginCredentials, Session, SessionStore};
    pub use crate::config::ClientOptions;
    pub use crate::controller::{AppState, SessionDataController};
    pub use crate::error::Error;
    pub use crate::AquaFlow;
}
