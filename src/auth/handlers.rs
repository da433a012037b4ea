use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::api::error_response;
use crate::auth::store::{ProfileUpdate, SessionStore};
use crate::model::UserRole;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin@company.com", format = "email")]
    pub email: String,
    #[schema(example = "admin123")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "maria@company.com", format = "email")]
    pub email: String,
    pub password: String,
    #[schema(example = "Maria Lopez")]
    pub name: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// Sign in
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = Object),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "message": "Invalid login credentials"
        }))
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(store, payload), fields(email = %payload.email))]
pub async fn login(
    store: web::Data<SessionStore>,
    payload: web::Json<LoginRequest>,
) -> impl Responder {
    store.login(&payload.email, &payload.password).await;

    let state = store.state();
    if state.is_authenticated {
        info!("login succeeded");
        HttpResponse::Ok().json(json!({ "user": state.user }))
    } else {
        let message = state
            .error
            .unwrap_or_else(|| "Invalid login credentials".to_string());
        HttpResponse::Unauthorized().json(json!({ "message": message }))
    }
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = Object, example = json!({
            "message": "User registered successfully"
        })),
        (status = 400, description = "Registration rejected", body = Object)
    ),
    tag = "Auth"
)]
pub async fn register(
    store: web::Data<SessionStore>,
    payload: web::Json<RegisterRequest>,
) -> impl Responder {
    let payload = payload.into_inner();
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "message": "Email and password must not be empty"
        }));
    }

    let role = payload.role.unwrap_or(UserRole::Employee);
    match store
        .register(&payload.email, &payload.password, &payload.name, role)
        .await
    {
        Ok(user) => HttpResponse::Created().json(json!({
            "message": "User registered successfully",
            "user": user,
        })),
        Err(err) => error_response(&err),
    }
}

/// Sign out
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Signed out", body = Object)),
    tag = "Auth"
)]
pub async fn logout(store: web::Data<SessionStore>) -> impl Responder {
    store.logout().await;
    HttpResponse::Ok().json(json!({ "message": "Signed out" }))
}

/// Current session snapshot
#[utoipa::path(
    get,
    path = "/auth/session",
    responses((status = 200, description = "Session state", body = AuthState)),
    tag = "Auth"
)]
pub async fn session(store: web::Data<SessionStore>) -> impl Responder {
    store.check_session().await;
    HttpResponse::Ok().json(store.state())
}

/// Update the signed-in user's profile
#[utoipa::path(
    put,
    path = "/auth/profile",
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Profile updated", body = Object),
        (status = 401, description = "Not authenticated", body = Object)
    ),
    tag = "Auth"
)]
pub async fn update_profile(
    store: web::Data<SessionStore>,
    payload: web::Json<ProfileUpdate>,
) -> impl Responder {
    match store.update_profile(payload.into_inner()).await {
        Ok(user) => HttpResponse::Ok().json(json!({ "user": user })),
        Err(err) => error_response(&err),
    }
}
