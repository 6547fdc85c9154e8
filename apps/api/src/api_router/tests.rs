use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use sbaa_infrastructure::InMemorySecurityStore;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api_services::{build_memory_session_layer, in_memory_services};
use crate::route_policies::build_route_policy_table;
use crate::state::AppState;

use super::build_router;

const FRONTEND: &str = "http://localhost:3000";
const TOKEN: &str = "bootstrap-token-for-tests";

fn test_app(store: Arc<InMemorySecurityStore>) -> Router {
    let services = in_memory_services(store);
    let Ok(route_policies) = build_route_policy_table() else {
        panic!("declared route table should validate");
    };
    let state = AppState {
        authorization_service: services.authorization_service,
        security_admin_service: services.security_admin_service,
        route_policies: Arc::new(route_policies),
        frontend_url: FRONTEND.to_owned(),
        bootstrap_token: TOKEN.to_owned(),
    };

    let Ok(router) = build_router(state, build_memory_session_layer(false)) else {
        panic!("router should build");
    };
    router
}

struct Reply {
    status: StatusCode,
    cookie: Option<String>,
    body: Value,
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Reply {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ORIGIN, FRONTEND);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    };
    let Ok(request) = request else {
        panic!("request should build");
    };

    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("router should respond");
    };
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_owned);
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body should be readable");
    };
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    Reply {
        status,
        cookie,
        body,
    }
}

async fn sign_in(app: &Router, subject: &str) -> String {
    let reply = send(
        app,
        "POST",
        "/auth/bootstrap",
        None,
        Some(json!({ "subject": subject, "token": TOKEN })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);

    let Some(cookie) = reply.cookie else {
        panic!("bootstrap should set a session cookie");
    };
    cookie
}

fn string_field(value: &Value, field: &str) -> String {
    let Some(text) = value[field].as_str() else {
        panic!("response should carry '{field}': {value}");
    };
    text.to_owned()
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app(Arc::new(InMemorySecurityStore::new()));
    let reply = send(&app, "GET", "/health", None, None).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "ok");
}

#[tokio::test]
async fn gated_routes_require_a_session() {
    let app = test_app(Arc::new(InMemorySecurityStore::new()));
    let reply = send(&app, "GET", "/api/roles", None, None).await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bootstrap_rejects_a_wrong_token() {
    let app = test_app(Arc::new(InMemorySecurityStore::new()));
    let reply = send(
        &app,
        "POST",
        "/auth/bootstrap",
        None,
        Some(json!({ "subject": "admin", "token": "guess" })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cross_origin_mutations_are_blocked() {
    let app = test_app(Arc::new(InMemorySecurityStore::new()));
    let Ok(request) = Request::builder()
        .method("POST")
        .uri("/auth/bootstrap")
        .header(header::ORIGIN, "https://evil.example")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "subject": "admin", "token": TOKEN }).to_string(),
        ))
    else {
        panic!("request should build");
    };

    let Ok(response) = app.oneshot(request).await else {
        panic!("router should respond");
    };
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn global_admin_manages_roles_until_the_role_is_cleared() {
    let app = test_app(Arc::new(InMemorySecurityStore::new()));
    let admin = sign_in(&app, "admin").await;

    let roles = send(&app, "GET", "/api/roles", Some(&admin), None).await;
    assert_eq!(roles.status, StatusCode::OK);
    assert!(matches!(&roles.body, Value::Array(items) if items.len() == 1));

    let me = send(&app, "GET", "/auth/me", Some(&admin), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert!(matches!(&me.body["privileges"], Value::Array(items) if !items.is_empty()));

    let cleared = send(
        &app,
        "PUT",
        "/api/users/admin/global-role",
        Some(&admin),
        Some(json!({ "role_id": null })),
    )
    .await;
    assert_eq!(cleared.status, StatusCode::NO_CONTENT);

    let roles = send(&app, "GET", "/api/roles", Some(&admin), None).await;
    assert_eq!(roles.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_privileges_in_a_role_are_rejected() {
    let app = test_app(Arc::new(InMemorySecurityStore::new()));
    let admin = sign_in(&app, "admin").await;

    let reply = send(
        &app,
        "POST",
        "/api/roles",
        Some(&admin),
        Some(json!({
            "name": "Broken",
            "role_type": "global",
            "privileges": ["foo:bar"],
        })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn global_admin_does_not_see_team_resources_without_membership() {
    let app = test_app(Arc::new(InMemorySecurityStore::new()));
    let admin = sign_in(&app, "admin").await;

    let team = send(
        &app,
        "POST",
        "/api/teams",
        Some(&admin),
        Some(json!({ "name": "District 9" })),
    )
    .await;
    assert_eq!(team.status, StatusCode::CREATED);
    let team_id = string_field(&team.body, "team_id");

    let environments = send(
        &app,
        "GET",
        &format!("/api/teams/{team_id}/sb-environments"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(environments.status, StatusCode::FORBIDDEN);

    let privileges = send(
        &app,
        "GET",
        &format!("/api/teams/{team_id}/privileges"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(privileges.status, StatusCode::OK);
    assert!(matches!(&privileges.body["team"], Value::Array(items) if items.is_empty()));
}

#[tokio::test]
async fn team_member_sees_only_owned_environments() {
    let store = Arc::new(InMemorySecurityStore::new());
    store.insert_sb_environment(7, "Sandbox").await;
    store.insert_sb_environment(8, "Production").await;
    let app = test_app(store);

    let admin = sign_in(&app, "admin").await;
    let member = sign_in(&app, "member").await;
    let demoted = send(
        &app,
        "PUT",
        "/api/users/member/global-role",
        Some(&admin),
        Some(json!({ "role_id": null })),
    )
    .await;
    assert_eq!(demoted.status, StatusCode::NO_CONTENT);

    let team = send(
        &app,
        "POST",
        "/api/teams",
        Some(&admin),
        Some(json!({ "name": "District 9" })),
    )
    .await;
    let team_id = string_field(&team.body, "team_id");

    let member_role = send(
        &app,
        "POST",
        "/api/roles",
        Some(&admin),
        Some(json!({
            "name": "Team member",
            "role_type": "user-team",
            "privileges": ["team.ownership:read"],
        })),
    )
    .await;
    assert_eq!(member_role.status, StatusCode::CREATED);
    let owner_role = send(
        &app,
        "POST",
        "/api/roles",
        Some(&admin),
        Some(json!({
            "name": "Environment reader",
            "role_type": "resource-ownership",
            "privileges": ["team.sb-environment:read"],
        })),
    )
    .await;
    assert_eq!(owner_role.status, StatusCode::CREATED);

    let grant = send(
        &app,
        "POST",
        "/api/ownerships",
        Some(&admin),
        Some(json!({
            "team_id": team_id,
            "role_id": string_field(&owner_role.body, "role_id"),
            "resource": [7],
        })),
    )
    .await;
    assert_eq!(grant.status, StatusCode::CREATED);

    let membership = send(
        &app,
        "POST",
        "/api/user-team-memberships",
        Some(&admin),
        Some(json!({
            "team_id": team_id,
            "subject": "member",
            "role_id": string_field(&member_role.body, "role_id"),
        })),
    )
    .await;
    assert_eq!(membership.status, StatusCode::CREATED);

    let environments = send(
        &app,
        "GET",
        &format!("/api/teams/{team_id}/sb-environments"),
        Some(&member),
        None,
    )
    .await;
    assert_eq!(environments.status, StatusCode::OK);
    assert_eq!(
        environments.body,
        json!([{ "sb_environment_id": 7, "name": "Sandbox" }])
    );

    let owned = send(
        &app,
        "GET",
        &format!("/api/teams/{team_id}/sb-environments/7"),
        Some(&member),
        None,
    )
    .await;
    assert_eq!(owned.status, StatusCode::OK);

    let foreign = send(
        &app,
        "GET",
        &format!("/api/teams/{team_id}/sb-environments/8"),
        Some(&member),
        None,
    )
    .await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);

    let malformed = send(
        &app,
        "GET",
        &format!("/api/teams/{team_id}/sb-environments/eight"),
        Some(&member),
        None,
    )
    .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);

    let ownerships = send(
        &app,
        "GET",
        &format!("/api/teams/{team_id}/ownerships"),
        Some(&member),
        None,
    )
    .await;
    assert_eq!(ownerships.status, StatusCode::OK);
    assert!(matches!(&ownerships.body, Value::Array(items) if items.len() == 1));

    let roles = send(&app, "GET", "/api/roles", Some(&member), None).await;
    assert_eq!(roles.status, StatusCode::FORBIDDEN);
}
