//! Types for authentication and account management

use serde::{Deserialize, Serialize};

use crate::notifications::NotificationPreferences;
use crate::tanks::Tank;

/// Credentials for password login
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Response from a successful login
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// The bearer token authorizing subsequent requests
    pub access_token: String,

    /// The authenticated user record
    pub user: User,
}

/// A user account with its embedded preference fields and owned tanks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    pub email: String,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub address: Option<Address>,

    #[serde(default)]
    pub role: Option<String>,

    /// Whether automatic replenishment ordering is enabled.
    ///
    /// The trigger logic lives server-side; the client only stores and
    /// displays the flag.
    #[serde(default)]
    pub auto_order: bool,

    /// Preferred supplier id for automatic and prefilled orders
    #[serde(default)]
    pub preferred_supplier: Option<String>,

    /// Per-channel notification opt-ins; absent on older accounts
    #[serde(default)]
    pub notification_preferences: Option<NotificationPreferences>,

    /// Tanks owned by this user
    #[serde(default)]
    pub tanks: Vec<Tank>,
}

/// A postal address
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Payload for account registration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub role: String,
    pub address: Address,
    pub notification_preferences: NotificationPreferences,
}

/// Basic `local@domain.tld` shape check, applied before any network call.
///
/// This is deliberately loose; the server performs the authoritative
/// validation.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("userexample.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@@example.com"));
    }
}
