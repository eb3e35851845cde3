use axum::http::{Request, StatusCode};
use circulation_service::build_router;
use common_security::test_request_headers;
use tower::ServiceExt; // for oneshot
use uuid::Uuid;

mod test_utils;
use test_utils::lazy_app_state;

#[tokio::test]
async fn borrow_missing_member_header_rejected() {
    let app = build_router(lazy_app_state());
    let mut req = Request::builder()
        .uri("/loans")
        .method("POST")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(
            serde_json::json!({ "item_id": Uuid::new_v4() }).to_string(),
        ))
        .unwrap();
    req.headers_mut().insert(
        "X-Tenant-ID",
        axum::http::HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap(),
    );

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "missing_member_id");
}

#[tokio::test]
async fn borrow_missing_tenant_header_rejected_for_member() {
    let app = build_router(lazy_app_state());
    let mut req = Request::builder()
        .uri("/loans")
        .method("POST")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(
            serde_json::json!({ "item_id": Uuid::new_v4() }).to_string(),
        ))
        .unwrap();
    test_request_headers!(req, roles = "member", member = &Uuid::new_v4().to_string());

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "missing_tenant_id");
}

#[tokio::test]
async fn borrow_malformed_tenant_header_rejected() {
    let app = build_router(lazy_app_state());
    let mut req = Request::builder()
        .uri("/loans")
        .method("POST")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(
            serde_json::json!({ "item_id": Uuid::new_v4() }).to_string(),
        ))
        .unwrap();
    test_request_headers!(
        req,
        roles = "member",
        tenant = "not-a-uuid",
        member = &Uuid::new_v4().to_string()
    );

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "invalid_tenant_id");
}

#[tokio::test]
async fn global_super_admin_cannot_create_tenant_scoped_loans() {
    // No X-Tenant-ID plus super_admin yields global scope, which may read
    // across tenants but not create child records.
    let app = build_router(lazy_app_state());
    let mut req = Request::builder()
        .uri("/loans")
        .method("POST")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(
            serde_json::json!({ "item_id": Uuid::new_v4() }).to_string(),
        ))
        .unwrap();
    test_request_headers!(req, roles = "super_admin", member = &Uuid::new_v4().to_string());

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.headers().get("X-Error-Code").unwrap(),
        "tenant_scope_required"
    );
}

#[tokio::test]
async fn overdue_scan_forbidden_for_plain_member() {
    let app = build_router(lazy_app_state());
    let mut req = Request::builder()
        .uri("/loans/overdue")
        .method("GET")
        .body(axum::body::Body::empty())
        .unwrap();
    test_request_headers!(
        req,
        roles = "member",
        tenant = &Uuid::new_v4().to_string(),
        member = &Uuid::new_v4().to_string()
    );

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "missing_role");
}

#[tokio::test]
async fn catalog_write_forbidden_for_plain_member() {
    let app = build_router(lazy_app_state());
    let mut req = Request::builder()
        .uri("/items")
        .method("POST")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(
            serde_json::json!({ "title": "A Title", "total_copies": 1 }).to_string(),
        ))
        .unwrap();
    test_request_headers!(
        req,
        roles = "member",
        tenant = &Uuid::new_v4().to_string(),
        member = &Uuid::new_v4().to_string()
    );

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn active_count_for_other_member_needs_admin_role() {
    let app = build_router(lazy_app_state());
    let other = Uuid::new_v4();
    let mut req = Request::builder()
        .uri(format!("/members/{other}/loans/active_count"))
        .method("GET")
        .body(axum::body::Body::empty())
        .unwrap();
    test_request_headers!(
        req,
        roles = "member",
        tenant = &Uuid::new_v4().to_string(),
        member = &Uuid::new_v4().to_string()
    );

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
