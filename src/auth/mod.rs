//! Authentication endpoints for the AquaFlow API

mod session;
mod types;

use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

pub use session::*;
pub use types::*;

/// HTTP wrapper for the `/auth` resource
#[derive(Clone)]
pub struct AuthApi {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl AuthApi {
    pub(crate) fn new(base_url: &str, client: Client, options: &ClientOptions) -> Self {
        Self {
            base_url: base_url.to_string(),
            client,
            timeout: options.request_timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth{}", self.base_url, path)
    }

    /// Exchange credentials for a bearer token and user record
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, Error> {
        Fetch::post(&self.client, &self.url("/login"))
            .timeout(self.timeout)
            .json(credentials)?
            .execute::<AuthResponse>()
            .await
    }

    /// Invalidate the session server-side
    pub async fn logout(&self, token: &str) -> Result<(), Error> {
        Fetch::post(&self.client, &self.url("/logout"))
            .timeout(self.timeout)
            .bearer_auth(token)
            .execute_empty()
            .await
    }

    /// Create a new account
    pub async fn register(&self, data: &RegisterData) -> Result<(), Error> {
        Fetch::post(&self.client, &self.url("/register"))
            .timeout(self.timeout)
            .json(data)?
            .execute_empty()
            .await
    }

    /// Request a password-reset email
    pub async fn forgot_password(&self, email: &str) -> Result<(), Error> {
        Fetch::post(&self.client, &self.url("/forgot-password"))
            .timeout(self.timeout)
            .json(&json!({ "email": email }))?
            .execute_empty()
            .await
    }

    /// Complete a password reset using the token from the reset email
    pub async fn reset_password(&self, reset_token: &str, new_password: &str) -> Result<(), Error> {
        Fetch::post(&self.client, &self.url("/reset-password"))
            .timeout(self.timeout)
            .json(&json!({ "token": reset_token, "password": new_password }))?
            .execute_empty()
            .await
    }
}
