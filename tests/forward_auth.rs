//! End-to-end tests for the forward-auth HTTP surface.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

use claims_gateway::app::{build_router, build_state};
use claims_gateway::config::Config;

const SECRET: &str = "integration-secret";
const FAR_FUTURE: u64 = 4_102_444_800;

const BASE_VARS: [(&str, &str); 5] = [
    ("ADMIN_SA_TOKEN", "admin-token"),
    ("READ_SA_TOKEN", "read-token"),
    ("ACCESS_JWT_SECRET", SECRET),
    ("ADMIN_LIST", "Alice Smith,Carol King"),
    ("HEADER_PREFIX", "X-Auth-"),
];

fn config_with(extra: &[(&str, &str)]) -> Config {
    Config::from_lookup(|key| {
        extra
            .iter()
            .chain(BASE_VARS.iter())
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
    .expect("test config")
}

fn router_with(extra: &[(&str, &str)]) -> Router {
    let config = config_with(extra);
    build_router(build_state(&config).expect("state"), &config)
}

fn router() -> Router {
    router_with(&[])
}

fn sign(payload: Value, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        &payload,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("sign token")
}

fn request(token: Option<&str>, host: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .uri("/")
        .header("x-forwarded-host", host);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

#[tokio::test]
async fn health_is_open() {
    let response = router()
        .oneshot(Request::builder().uri("/_health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let response = router()
        .oneshot(request(None, "headlamp.example.com"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_with_wrong_signature_is_unauthorized() {
    let token = sign(json!({ "sub": "u1", "exp": FAR_FUTURE }), "someone-else");

    let response = router()
        .oneshot(request(Some(&token), "headlamp.example.com"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_gets_flattened_headers_and_elevated_credential() {
    let token = sign(
        json!({
            "sub": "u1",
            "exp": FAR_FUTURE,
            "common_name": "Alice Smith",
            "sn": "Müller",
            "groups": ["dev", "ops"],
            "realm_access": { "roles": ["admin"] }
        }),
        SECRET,
    );

    let response = router()
        .oneshot(request(Some(&token), "headlamp.example.com"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["x-auth-sub"], "u1");
    assert_eq!(headers["x-auth-exp"], FAR_FUTURE.to_string().as_str());
    assert_eq!(headers["x-auth-common-name"], "Alice Smith");
    assert_eq!(headers["x-auth-sn"], "Muller");
    assert_eq!(headers["x-auth-groups"], "dev,ops");
    assert_eq!(headers["x-auth-realm-access.roles"], "admin");
    assert_eq!(headers[header::AUTHORIZATION], "Bearer admin-token");
}

#[tokio::test]
async fn other_users_get_restricted_credential() {
    let token = sign(
        json!({ "exp": FAR_FUTURE, "common_name": "Bob Jones" }),
        SECRET,
    );

    let response = router()
        .oneshot(request(Some(&token), "headlamp.example.com"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::AUTHORIZATION], "Bearer read-token");
}

#[tokio::test]
async fn read_only_host_forces_restricted_credential() {
    let token = sign(
        json!({ "exp": FAR_FUTURE, "common_name": "Alice Smith" }),
        SECRET,
    );

    let response = router()
        .oneshot(request(Some(&token), "headlamp-readonly.example.com"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::AUTHORIZATION], "Bearer read-token");
}

#[tokio::test]
async fn host_header_is_used_without_forwarded_host() {
    let token = sign(
        json!({ "exp": FAR_FUTURE, "common_name": "Alice Smith" }),
        SECRET,
    );
    let request = Request::builder()
        .uri("/")
        .header(header::HOST, "headlamp-readonly.internal")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    let response = router().oneshot(request).await.unwrap();

    assert_eq!(response.headers()[header::AUTHORIZATION], "Bearer read-token");
}

#[tokio::test]
async fn case_colliding_claims_keep_one_header() {
    let token = sign(
        json!({ "exp": FAR_FUTURE, "givenName": "Ann", "givenname": "Bea" }),
        SECRET,
    );

    let response = router()
        .oneshot(request(Some(&token), "headlamp.example.com"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let values: Vec<_> = response
        .headers()
        .get_all("x-auth-givenname")
        .iter()
        .collect();
    assert_eq!(values, ["Bea"]);
}

#[tokio::test]
async fn configured_body_limit_is_enforced() {
    let request = Request::builder()
        .uri("/_health")
        .header(header::CONTENT_LENGTH, "64")
        .body(Body::from(vec![b'x'; 64]))
        .unwrap();

    let response = router_with(&[("BODY_LIMIT_BYTES", "16")])
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
