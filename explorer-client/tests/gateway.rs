//! Gateway behavior against a live HTTP server.

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header},
    routing::{delete, get, post},
};
use client::{ApiError, ApiGateway, AuthSignal, MemoryStorage, SessionStore};
use serde_json::{Value, json};
use shared::config::ClientConfig;
use shared::models::{Credentials, Session, UserRecord};
use std::collections::HashMap;
use std::sync::Arc;

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn gateway_with(base: &str, match_expired_message: bool) -> ApiGateway {
    let config = ClientConfig {
        match_expired_message,
        ..ClientConfig::with_defaults().with_api_base(base)
    };
    let session = SessionStore::open(Arc::new(MemoryStorage::new()), &config.storage_key);
    ApiGateway::new(&config, session)
}

fn logged_in_gateway(base: &str) -> ApiGateway {
    let gateway = gateway_with(base, true);
    gateway
        .session()
        .login(Session::new("t1", UserRecord::with_role("user")))
        .unwrap();
    gateway
}

#[tokio::test]
async fn unauthorized_response_forces_logout() {
    let app = Router::new().route(
        "/search/history",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "expired token"})),
            )
        }),
    );
    let gateway = logged_in_gateway(&spawn(app).await);
    let mut signals = gateway.subscribe();

    let err = gateway.search_history().await.unwrap_err();

    assert!(err.is_auth_expired());
    assert_eq!(err.message(), "expired token");
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(gateway.session().current(), None);
    assert!(!gateway.session().is_logged_in());
    assert_eq!(
        signals.try_next().unwrap(),
        Some(AuthSignal::Expired {
            message: "expired token".to_string(),
            redirect_to: "/login".to_string(),
        })
    );
}

#[tokio::test]
async fn server_error_with_unparsable_body_keeps_session() {
    let app = Router::new().route(
        "/image/history",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "<html>upstream down</html>") }),
    );
    let gateway = logged_in_gateway(&spawn(app).await);
    let mut signals = gateway.subscribe();

    let err = gateway.image_history().await.unwrap_err();

    assert!(matches!(err, ApiError::Http { .. }));
    assert_eq!(err.message(), "API Error");
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert!(gateway.session().is_logged_in());
    assert!(signals.try_next().is_err());
}

#[tokio::test]
async fn validation_errors_report_first_message() {
    let app = Router::new().route(
        "/search",
        get(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"detail": [{"loc": ["query", "query"], "msg": "field required"}]})),
            )
        }),
    );
    let gateway = logged_in_gateway(&spawn(app).await);

    let err = gateway.search("").await.unwrap_err();
    assert_eq!(err.message(), "field required");
    assert!(gateway.session().is_logged_in());
}

async fn echo_search(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("missing")
            .to_string()
    };
    Json(json!({
        "query": params.get("query"),
        "results": [
            {"text": header_text(header::AUTHORIZATION)},
            {"text": header_text(header::CONTENT_TYPE)}
        ]
    }))
}

#[tokio::test]
async fn authenticated_requests_carry_token_and_encoded_query() {
    let app = Router::new().route("/search", get(echo_search));
    let gateway = logged_in_gateway(&spawn(app).await);

    let response = gateway.search("cats & dogs?/100%").await.unwrap();
    let texts: Vec<String> = response
        .results
        .iter()
        .map(shared::models::ResultEntry::display_text)
        .collect();

    assert_eq!(response.query.as_deref(), Some("cats & dogs?/100%"));
    assert_eq!(texts, ["Bearer t1", "application/json"]);
}

#[tokio::test]
async fn anonymous_requests_omit_authorization() {
    let app = Router::new().route("/search", get(echo_search));
    let gateway = gateway_with(&spawn(app).await, true);

    let response = gateway.search("rust").await.unwrap();
    assert_eq!(response.results[0].display_text(), "missing");
    assert_eq!(response.results[1].display_text(), "application/json");
}

#[tokio::test]
async fn expired_message_shim_can_be_disabled() {
    let app = Router::new().route(
        "/image/history",
        get(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"detail": "Signature has expired token"})),
            )
        }),
    );
    let base = spawn(app).await;

    let lenient = logged_in_gateway(&base);
    let err = lenient.image_history().await.unwrap_err();
    assert!(err.is_auth_expired());
    assert!(!lenient.session().is_logged_in());

    let strict = gateway_with(&base, false);
    strict
        .session()
        .login(Session::new("t1", UserRecord::default()))
        .unwrap();
    let mut signals = strict.subscribe();
    let err = strict.image_history().await.unwrap_err();
    assert!(matches!(err, ApiError::Http { .. }));
    assert_eq!(err.message(), "Signature has expired token");
    assert!(strict.session().is_logged_in());
    assert!(signals.try_next().is_err());
}

#[tokio::test]
async fn failed_login_does_not_signal() {
    let app = Router::new().route(
        "/auth/login",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "Invalid credentials"})),
            )
        }),
    );
    let gateway = gateway_with(&spawn(app).await, true);
    let mut signals = gateway.subscribe();

    let err = gateway
        .login(&Credentials::new("a@b.c", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Http { .. }));
    assert_eq!(err.message(), "Invalid credentials");
    assert!(signals.try_next().is_err());
}

#[tokio::test]
async fn login_returns_full_payload() {
    let app = Router::new().route(
        "/auth/login",
        post(|Json(body): Json<Value>| async move {
            Json(json!({
                "access_token": format!("token-for-{}", body["email"].as_str().unwrap_or("")),
                "refresh_token": "r1",
                "token_type": "bearer"
            }))
        }),
    );
    let gateway = gateway_with(&spawn(app).await, true);

    let session = gateway
        .login(&Credentials::new("a@b.c", "secret"))
        .await
        .unwrap();
    assert_eq!(session.access_token, "token-for-a@b.c");
    assert_eq!(session.extra.get("refresh_token"), Some(&json!("r1")));

    gateway.session().login(session.clone()).unwrap();
    assert!(gateway.session().is_logged_in());
    assert_eq!(gateway.session().role().as_deref(), Some("user"));
    assert_eq!(gateway.session().current(), Some(session));
}

#[tokio::test]
async fn empty_success_body_reads_as_null() {
    let app = Router::new()
        .route(
            "/search/history/{id}",
            delete(|Path(id): Path<i64>| async move {
                if id == 7 { StatusCode::OK } else { StatusCode::NOT_FOUND }
            }),
        )
        .route(
            "/image/history/{id}",
            delete(|| async { StatusCode::NO_CONTENT }),
        );
    let gateway = logged_in_gateway(&spawn(app).await);

    assert_eq!(gateway.delete_search(7).await.unwrap(), Value::Null);
    assert_eq!(gateway.delete_image(3).await.unwrap(), Value::Null);

    let err = gateway.delete_search(8).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.message(), "API Error");
}

#[tokio::test]
async fn non_json_success_body_is_decode_error() {
    let app = Router::new().route(
        "/search/history",
        get(|| async { "<html>not json</html>" }),
    );
    let gateway = logged_in_gateway(&spawn(app).await);

    let err = gateway.search_history().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
    assert_eq!(err.message(), "API Error");
    assert!(gateway.session().is_logged_in());
}

#[tokio::test]
async fn generate_image_sends_prompt() {
    let app = Router::new().route(
        "/image",
        post(|Query(params): Query<HashMap<String, String>>| async move {
            let prompt = params.get("prompt").cloned().unwrap_or_default();
            Json(json!({"id": 11, "prompt": prompt, "url": "https://img/11.png"}))
        }),
    );
    let gateway = logged_in_gateway(&spawn(app).await);

    let image = gateway.generate_image("a red fox, at dusk").await.unwrap();
    assert_eq!(image.prompt.as_deref(), Some("a red fox, at dusk"));

    let item = image.into_history_item(0);
    assert_eq!(item.id, 11);
    assert_eq!(item.source(), Some("https://img/11.png"));
}

#[tokio::test]
async fn history_lists_are_normalized() {
    let app = Router::new()
        .route(
            "/search/history",
            get(|| async {
                Json(json!({"search_history": [
                    {"id": 1, "query": "rust", "results": [{"snippet": "systems"}], "timestamp": "t"},
                    {"query": "no id"},
                    {"id": 2, "query": "odd", "results": "not a list"}
                ]}))
            }),
        )
        .route("/image/history", get(|| async { Json(json!({})) }));
    let gateway = logged_in_gateway(&spawn(app).await);

    let searches = gateway.search_history().await.unwrap().search_history;
    assert_eq!(searches.len(), 2);
    assert_eq!(searches[0].first_snippet().as_deref(), Some("systems"));
    assert!(searches[1].results.is_empty());

    assert!(gateway.image_history().await.unwrap().image_history.is_empty());
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let gateway = logged_in_gateway(&base);
    let err = gateway.search_history().await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.message(), "Unable to connect to server");
    assert!(gateway.session().is_logged_in());
}

#[tokio::test]
async fn forced_and_explicit_logout_converge() {
    let app = Router::new().route(
        "/search/history",
        get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Not authenticated"}))) }),
    );
    let gateway = logged_in_gateway(&spawn(app).await);
    let generation = gateway.session().generation();

    let forced = gateway.search_history();
    let explicit = async { gateway.session().logout() };
    let (forced, explicit) = tokio::join!(forced, explicit);

    assert!(explicit.is_ok());
    assert!(forced.is_err());
    assert_eq!(gateway.session().current(), None);
    assert_eq!(gateway.session().generation(), generation + 1);
    gateway.session().logout().unwrap();
    assert_eq!(gateway.session().generation(), generation + 1);
}

#[tokio::test]
async fn late_rejection_of_replaced_session_is_ignored() {
    let app = Router::new().route(
        "/search/history",
        get(|| async {
            tokio::time::sleep(std::time::Duration::from_millis(300)).await;
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "expired token"})),
            )
        }),
    );
    let gateway = gateway_with(&spawn(app).await, true);
    gateway
        .session()
        .login(Session::new("old", UserRecord::with_role("user")))
        .unwrap();
    let mut signals = gateway.subscribe();

    let pending = tokio::spawn({
        let gateway = gateway.clone();
        async move { gateway.search_history().await }
    });
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    gateway.session().logout().unwrap();
    gateway
        .session()
        .login(Session::new("fresh", UserRecord::with_role("admin")))
        .unwrap();

    let err = pending.await.unwrap().unwrap_err();

    assert!(err.is_auth_expired());
    assert_eq!(gateway.session().token().as_deref(), Some("fresh"));
    assert_eq!(gateway.session().role().as_deref(), Some("admin"));
    assert!(signals.try_next().is_err());
}
