//! Integration tests for token refresh and logout.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use generic_oauth2::auth::oauth::parse_redirect;
use generic_oauth2::auth::{
    CustomHandler, HandlerError, HandlerOutcome, HandlerRegistry, UserAgent, UserAgentOutcome,
};
use generic_oauth2::{ClientConfig, ConfigDocument, OAuth2Client};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn document(value: Value) -> ConfigDocument {
    ConfigDocument::try_from(value).unwrap()
}

fn client() -> OAuth2Client {
    OAuth2Client::new(ClientConfig::default()).unwrap()
}

// === Token refresh ===

#[tokio::test]
async fn test_refresh_returns_token_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=android-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new-access",
            "token_type": "Bearer",
            "expires_in": 1800,
            "refresh_token": "rotated-refresh"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = json!({
        "appId": "client-id",
        "accessTokenEndpoint": format!("{}/oauth/token", server.uri()),
        "refreshToken": "shared-refresh",
        "android": { "refreshToken": "android-refresh" }
    });

    let result = client().refresh_token(&document(config)).await.unwrap();

    assert_eq!(result["access_token"], "new-access");
    assert_eq!(result["refresh_token"], "rotated-refresh");
    assert_eq!(result["expires_in"], 1800);
    assert!(result["access_token_expiration_date"].is_string());
}

#[tokio::test]
async fn test_refresh_validation_codes() {
    let cases = [
        (json!({}), "ERR_PARAM_NO_APP_ID"),
        (json!({ "appId": "a" }), "ERR_PARAM_NO_ACCESS_TOKEN_ENDPOINT"),
        (
            json!({ "appId": "a", "accessTokenEndpoint": "https://idp/token" }),
            "ERR_PARAM_NO_REFRESH_TOKEN",
        ),
    ];

    for (config, code) in cases {
        let error = client().refresh_token(&document(config)).await.unwrap_err();
        assert_eq!(error.code(), code);
    }
}

#[tokio::test]
async fn test_refresh_rejected_by_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })))
        .mount(&server)
        .await;

    let config = json!({
        "appId": "client-id",
        "accessTokenEndpoint": server.uri(),
        "refreshToken": "expired"
    });

    let error = client().refresh_token(&document(config)).await.unwrap_err();

    assert_eq!(error.code(), "ERR_GENERAL");
    assert_eq!(error.provider_error(), Some("invalid_grant"));
    assert_eq!(error.reported_code(), "invalid_grant");
}

// === Logout ===

/// A browser that records end session URLs and answers with a scripted outcome.
struct LogoutBrowser {
    respond: Box<dyn Fn(&str) -> UserAgentOutcome + Send + Sync>,
    opened: Mutex<Vec<String>>,
}

impl LogoutBrowser {
    fn new(respond: impl Fn(&str) -> UserAgentOutcome + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            opened: Mutex::new(Vec::new()),
        }
    }

    fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserAgent for LogoutBrowser {
    async fn authorize(&self, url: &str, _redirect_url: &str) -> UserAgentOutcome {
        self.opened.lock().unwrap().push(url.to_string());
        (self.respond)(url)
    }
}

fn logout_config() -> Value {
    json!({
        "id_token": "id-token-1",
        "logoutUrl": "https://idp.example.com/logout",
        "redirectUrl": "com.example.app:/callback"
    })
}

fn param(url: &str, name: &str) -> String {
    parse_redirect(url).unwrap().get(name).unwrap().to_string()
}

#[tokio::test]
async fn test_logout_without_id_token_is_local() {
    let browser = LogoutBrowser::new(|_| UserAgentOutcome::Cancelled);

    client()
        .logout(&document(json!({ "logoutUrl": "https://idp/logout" })), &browser)
        .await
        .unwrap();

    assert!(browser.opened().is_empty());
}

#[tokio::test]
async fn test_logout_opens_end_session_url() {
    let browser = LogoutBrowser::new(|url| {
        UserAgentOutcome::Redirect(format!("com.example.app:/callback?state={}", param(url, "state")))
    });

    client().logout(&document(logout_config()), &browser).await.unwrap();

    let url = &browser.opened()[0];
    assert!(url.starts_with("https://idp.example.com/logout?"));
    assert_eq!(param(url, "id_token_hint"), "id-token-1");
    assert_eq!(param(url, "post_logout_redirect_uri"), "com.example.app:/callback");
    assert_eq!(param(url, "state").len(), 20);
}

#[tokio::test]
async fn test_logout_redirect_without_params_succeeds() {
    let browser = LogoutBrowser::new(|_| UserAgentOutcome::Redirect("com.example.app:/callback".to_string()));

    client().logout(&document(logout_config()), &browser).await.unwrap();
}

#[tokio::test]
async fn test_logout_state_mismatch() {
    let browser = LogoutBrowser::new(|_| {
        UserAgentOutcome::Redirect("com.example.app:/callback?state=forged".to_string())
    });

    let error = client()
        .logout(&document(logout_config()), &browser)
        .await
        .unwrap_err();

    assert_eq!(error.code(), "ERR_STATES_NOT_MATCH");
}

#[tokio::test]
async fn test_logout_user_agent_failures() {
    let cancelled = LogoutBrowser::new(|_| UserAgentOutcome::Cancelled);
    let error = client()
        .logout(&document(logout_config()), &cancelled)
        .await
        .unwrap_err();
    assert_eq!(error.code(), "USER_CANCELLED");

    let no_result = LogoutBrowser::new(|_| UserAgentOutcome::NoResult);
    let error = client()
        .logout(&document(logout_config()), &no_result)
        .await
        .unwrap_err();
    assert_eq!(error.code(), "ERR_ANDROID_NO_INTENT");
}

#[tokio::test]
async fn test_logout_requires_logout_url_with_id_token() {
    let browser = LogoutBrowser::new(|_| UserAgentOutcome::Cancelled);

    let error = client()
        .logout(&document(json!({ "id_token": "id-token-1" })), &browser)
        .await
        .unwrap_err();

    assert_eq!(error.code(), "ERR_PARAM_NO_LOGOUT_URL");
    assert!(browser.opened().is_empty());
}

struct LogoutHandler {
    succeeds: bool,
}

#[async_trait]
impl CustomHandler for LogoutHandler {
    async fn get_access_token(&self, _doc: &ConfigDocument) -> Result<HandlerOutcome, HandlerError> {
        Err(HandlerError::new("login not supported"))
    }

    async fn logout(&self, _doc: &ConfigDocument) -> bool {
        self.succeeds
    }
}

#[tokio::test]
async fn test_logout_with_custom_handler() {
    let registry = HandlerRegistry::new()
        .with_handler("ok", Arc::new(LogoutHandler { succeeds: true }))
        .with_handler("failing", Arc::new(LogoutHandler { succeeds: false }));
    let client = client().with_handlers(registry);
    let browser = LogoutBrowser::new(|_| UserAgentOutcome::Cancelled);

    client
        .logout(&document(json!({ "android": { "customHandlerClass": "ok" } })), &browser)
        .await
        .unwrap();

    let error = client
        .logout(&document(json!({ "android": { "customHandlerClass": "failing" } })), &browser)
        .await
        .unwrap_err();
    assert_eq!(error.code(), "ERR_CUSTOM_HANDLER_LOGOUT");

    let error = client
        .logout(&document(json!({ "android": { "customHandlerClass": "missing" } })), &browser)
        .await
        .unwrap_err();
    assert_eq!(error.code(), "ERR_CUSTOM_HANDLER_LOGOUT");

    assert!(browser.opened().is_empty());
}
