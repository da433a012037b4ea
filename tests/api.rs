use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{test, App};
use serde_json::{json, Value};
use tempfile::TempDir;

use hrm_portal::auth::{MockAuthProvider, SessionStore};
use hrm_portal::gateway::MemoryGateway;
use hrm_portal::services::Services;
use hrm_portal::{routes, Config};

fn test_config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        backend_url: String::new(),
        backend_api_key: String::new(),
        http_timeout_secs: 5,
        demo_mode: true,
        session_file: String::new(),
        rate_login_per_min: 1_000,
        rate_register_per_min: 1_000,
        rate_protected_per_min: 10_000,
        api_prefix: "/api/v1".to_string(),
    }
}

async fn test_app(
    dir: &TempDir,
    demo_mode: bool,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let gateway = Arc::new(MemoryGateway::new());
    let provider = Arc::new(MockAuthProvider::new());
    let services = Data::new(Services::new(gateway.clone()));
    let store = Data::new(SessionStore::new(
        provider,
        gateway,
        dir.path().join("session.json"),
        demo_mode,
    ));
    let config = Config {
        demo_mode,
        ..test_config()
    };

    test::init_service(
        App::new()
            .wrap(NormalizePath::trim())
            .app_data(services)
            .app_data(store)
            .configure(|cfg| routes::configure(cfg, config)),
    )
    .await
}

fn get(path: &str) -> Request {
    test::TestRequest::get()
        .uri(path)
        .peer_addr("127.0.0.1:4000".parse().unwrap())
        .to_request()
}

fn post(path: &str, body: Value) -> Request {
    test::TestRequest::post()
        .uri(path)
        .peer_addr("127.0.0.1:4000".parse().unwrap())
        .set_json(body)
        .to_request()
}

fn put(path: &str, body: Value) -> Request {
    test::TestRequest::put()
        .uri(path)
        .peer_addr("127.0.0.1:4000".parse().unwrap())
        .set_json(body)
        .to_request()
}

async fn login_as(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    email: &str,
    password: &str,
) {
    let resp = test::call_service(
        app,
        post("/auth/login", json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn protected_routes_reject_anonymous_requests() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir, true).await;

    let resp = test::call_service(&app, get("/api/v1/employees")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        post("/api/v1/attendance/check-in", json!({ "employeeId": "emp-1" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn demo_login_opens_the_protected_surface() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir, true).await;

    login_as(&app, "admin@company.com", "admin123").await;

    let resp = test::call_service(
        &app,
        post(
            "/api/v1/departments",
            json!({ "name": "Engineering", "description": "builds the product" }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let departments: Value = test::call_and_read_body_json(&app, get("/api/v1/departments")).await;
    assert_eq!(departments.as_array().unwrap().len(), 1);
    assert_eq!(departments[0]["name"], "Engineering");
}

#[actix_web::test]
async fn wrong_demo_password_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir, true).await;

    let resp = test::call_service(
        &app,
        post(
            "/auth/login",
            json!({ "email": "admin@company.com", "password": "nope" }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn employee_role_cannot_mutate_master_data() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir, true).await;

    login_as(&app, "employee@company.com", "employee123").await;

    let resp = test::call_service(
        &app,
        post("/api/v1/departments", json!({ "name": "Shadow IT" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Reads stay open to any signed-in user.
    let resp = test::call_service(&app, get("/api/v1/departments")).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn duplicate_check_in_maps_to_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir, true).await;

    login_as(&app, "admin@company.com", "admin123").await;

    let body = json!({ "employeeId": "emp-1", "notes": "on site" });
    let resp = test::call_service(&app, post("/api/v1/attendance/check-in", body.clone())).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, post("/api/v1/attendance/check-in", body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Already checked in today");
}

#[actix_web::test]
async fn half_specified_attendance_range_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir, true).await;

    login_as(&app, "admin@company.com", "admin123").await;

    for uri in [
        "/api/v1/attendance?start=2025-01-01",
        "/api/v1/attendance?end=2025-01-31",
        "/api/v1/attendance?employee_id=emp-1&start=2025-01-01",
    ] {
        let resp = test::call_service(&app, get(uri)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "A date range requires both start and end");
    }

    let resp = test::call_service(
        &app,
        get("/api/v1/attendance?start=2025-01-01&end=2025-01-31"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn logout_closes_the_session() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir, true).await;

    login_as(&app, "admin@company.com", "admin123").await;
    let resp = test::call_service(&app, get("/api/v1/employees")).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/logout")
            .peer_addr("127.0.0.1:4000".parse().unwrap())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, get("/api/v1/employees")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn register_then_login_round_trip() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir, false).await;

    let resp = test::call_service(
        &app,
        post(
            "/auth/register",
            json!({
                "email": "maria@company.com",
                "password": "s3cret",
                "name": "Maria Lopez"
            }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Registration alone does not open the protected surface.
    let resp = test::call_service(&app, get("/api/v1/employees")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    login_as(&app, "maria@company.com", "s3cret").await;

    let session: Value = test::call_and_read_body_json(&app, get("/auth/session")).await;
    assert_eq!(session["isAuthenticated"], true);
    assert_eq!(session["user"]["name"], "Maria Lopez");
    assert_eq!(session["user"]["role"], "employee");
}

#[actix_web::test]
async fn leave_approval_records_the_acting_admin() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir, true).await;

    login_as(&app, "admin@company.com", "admin123").await;

    let request: Value = test::call_and_read_body_json(
        &app,
        post(
            "/api/v1/leave",
            json!({
                "employeeId": "emp-1",
                "startDate": "2025-04-01",
                "endDate": "2025-04-03",
                "type": "annual",
                "reason": "family trip"
            }),
        ),
    )
    .await;
    assert_eq!(request["status"], "pending");

    let id = request["id"].as_str().unwrap();
    let approved: Value = test::call_and_read_body_json(
        &app,
        put(
            &format!("/api/v1/leave/{id}/status"),
            json!({ "status": "approved" }),
        ),
    )
    .await;
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["approvedBy"], "demo-admin");
    assert!(approved["approvedAt"].is_string());
}

#[actix_web::test]
async fn holiday_check_reports_the_flag() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir, true).await;

    login_as(&app, "admin@company.com", "admin123").await;

    let resp = test::call_service(
        &app,
        post(
            "/api/v1/holidays",
            json!({ "name": "New Year", "date": "2025-01-01", "type": "public" }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value =
        test::call_and_read_body_json(&app, get("/api/v1/holidays/check?date=2025-01-01")).await;
    assert_eq!(body["isHoliday"], true);

    let body: Value =
        test::call_and_read_body_json(&app, get("/api/v1/holidays/check?date=2025-01-02")).await;
    assert_eq!(body["isHoliday"], false);
}

#[actix_web::test]
async fn profile_update_is_visible_in_the_session() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir, true).await;

    login_as(&app, "employee@company.com", "employee123").await;

    let resp = test::call_service(
        &app,
        put("/auth/profile", json!({ "name": "John E. Doe" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let session: Value = test::call_and_read_body_json(&app, get("/auth/session")).await;
    assert_eq!(session["user"]["name"], "John E. Doe");
}
