//! User resource: profile updates, password change, generic field patches

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::auth::User;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

/// Editable profile fields
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Payload for a password change
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

/// HTTP wrapper for the `/users` resource
#[derive(Clone)]
pub struct UsersApi {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl UsersApi {
    pub(crate) fn new(base_url: &str, client: Client, options: &ClientOptions) -> Self {
        Self {
            base_url: base_url.to_string(),
            client,
            timeout: options.request_timeout,
        }
    }

    /// Replace the editable profile fields, returning the updated record
    pub async fn update_profile(&self, token: &str, profile: &UserProfile) -> Result<User, Error> {
        Fetch::patch(&self.client, &format!("{}/users/profile", self.base_url))
            .timeout(self.timeout)
            .bearer_auth(token)
            .json(profile)?
            .execute::<User>()
            .await
    }

    /// Change the account password
    pub async fn change_password(&self, token: &str, change: &PasswordChange) -> Result<(), Error> {
        Fetch::post(&self.client, &format!("{}/users/change-password", self.base_url))
            .timeout(self.timeout)
            .bearer_auth(token)
            .json(change)?
            .execute_empty()
            .await
    }

    /// Generic partial update of user fields (preference flags and the
    /// like), mirroring the server's `PATCH /{table}/{id}` surface
    pub async fn patch_fields(&self, token: &str, user_id: &str, fields: &Value) -> Result<(), Error> {
        Fetch::patch(&self.client, &format!("{}/users/{}", self.base_url, user_id))
            .timeout(self.timeout)
            .bearer_auth(token)
            .json(fields)?
            .execute_empty()
            .await
    }
}
