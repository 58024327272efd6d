use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aquaflow::auth::{Address, LoginCredentials, RegisterData};
use aquaflow::error::Error;
use aquaflow::notifications::NotificationPreferences;
use aquaflow::AquaFlow;

#[tokio::test]
async fn login_returns_token_and_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_partial_json(json!({ "email": "user@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test_access_token",
            "user": {
                "_id": "u1",
                "name": "Test User",
                "email": "user@example.com"
            }
        })))
        .mount(&mock_server)
        .await;

    let auth = AquaFlow::new(&mock_server.uri()).auth();
    let response = auth
        .login(&LoginCredentials {
            email: "user@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.access_token, "test_access_token");
    assert_eq!(response.user.id, "u1");
    assert_eq!(response.user.email, "user@example.com");
    // Fields absent from the response fall back to defaults.
    assert!(!response.user.auto_order);
    assert!(response.user.tanks.is_empty());
}

#[tokio::test]
async fn login_rejection_maps_to_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&mock_server)
        .await;

    let auth = AquaFlow::new(&mock_server.uri()).auth();
    let result = auth
        .login(&LoginCredentials {
            email: "user@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await;

    assert!(matches!(result, Err(Error::Unauthorized(_))));
}

#[tokio::test]
async fn logout_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("Authorization", "Bearer test_token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = AquaFlow::new(&mock_server.uri()).auth();
    auth.logout("test_token").await.unwrap();
}

#[tokio::test]
async fn register_posts_the_full_payload() {
    let mock_server = MockServer::start().await;
    let email = format!("test-{}@example.com", uuid::Uuid::new_v4());

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_partial_json(json!({
            "firstName": "Ada",
            "email": email.clone(),
            "notificationPreferences": { "push": true, "sms": false, "email": true }
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = AquaFlow::new(&mock_server.uri()).auth();
    auth.register(&RegisterData {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: email.clone(),
        password: "password123".to_string(),
        phone_number: "+15550001111".to_string(),
        role: "customer".to_string(),
        address: Address {
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postal_code: "62701".to_string(),
            country: "US".to_string(),
        },
        notification_preferences: NotificationPreferences::default(),
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn forgot_and_reset_password_round_trip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/forgot-password"))
        .and(body_partial_json(json!({ "email": "user@example.com" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/reset-password"))
        .and(body_partial_json(json!({ "token": "reset_token" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = AquaFlow::new(&mock_server.uri()).auth();
    auth.forgot_password("user@example.com").await.unwrap();
    auth.reset_password("reset_token", "new_password").await.unwrap();
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(422).set_body_string("email already registered"))
        .mount(&mock_server)
        .await;

    let auth = AquaFlow::new(&mock_server.uri()).auth();
    let result = auth
        .register(&RegisterData {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "password123".to_string(),
            phone_number: "+15550001111".to_string(),
            role: "customer".to_string(),
            address: Address {
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                postal_code: "62701".to_string(),
                country: "US".to_string(),
            },
            notification_preferences: NotificationPreferences::default(),
        })
        .await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 422);
            assert!(message.contains("already registered"));
        }
        other => panic!("expected API error, got {:?}", other.err()),
    }
}
