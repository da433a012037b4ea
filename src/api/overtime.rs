use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use utoipa::ToSchema;

use super::error_response;
use crate::auth::CurrentUser;
use crate::services::overtime::{NewOvertime, OvertimeUpdate};
use crate::services::Services;

#[derive(Debug, Deserialize, ToSchema)]
pub struct OvertimeQuery {
    pub employee_id: Option<String>,
    pub approved: Option<bool>,
}

/// List overtime entries
#[utoipa::path(
    get,
    path = "/api/v1/overtime",
    params(
        ("employee_id", Query, description = "Filter by employee"),
        ("approved", Query, description = "Filter by approval state")
    ),
    responses((status = 200, description = "Overtime entries, most recent first", body = Object)),
    tag = "Overtime"
)]
pub async fn list(
    services: web::Data<Services>,
    query: web::Query<OvertimeQuery>,
) -> impl Responder {
    let result = match (&query.employee_id, query.approved) {
        (Some(employee_id), _) => services.overtime.get_by_employee(employee_id).await,
        (None, Some(approved)) => services.overtime.get_by_approval(approved).await,
        _ => services.overtime.get_all().await,
    };
    match result {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(err) => error_response(&err),
    }
}

/// Record overtime
#[utoipa::path(
    post,
    path = "/api/v1/overtime",
    request_body = NewOvertime,
    responses((status = 201, description = "Entry created as unapproved", body = Object)),
    tag = "Overtime"
)]
pub async fn create(
    services: web::Data<Services>,
    payload: web::Json<NewOvertime>,
) -> impl Responder {
    match services.overtime.create(payload.into_inner()).await {
        Ok(entry) => HttpResponse::Created().json(entry),
        Err(err) => error_response(&err),
    }
}

/// Approve an entry
#[utoipa::path(
    put,
    path = "/api/v1/overtime/{id}/approve",
    responses(
        (status = 200, description = "Entry approved", body = Object),
        (status = 403, description = "Admin privileges required", body = Object)
    ),
    tag = "Overtime"
)]
pub async fn approve(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(match services.overtime.approve(&id, &user.id).await {
        Ok(entry) => HttpResponse::Ok().json(entry),
        Err(err) => error_response(&err),
    })
}

/// Adjust hours or rate
#[utoipa::path(
    put,
    path = "/api/v1/overtime/{id}",
    request_body = OvertimeUpdate,
    responses((status = 200, description = "Entry updated", body = Object)),
    tag = "Overtime"
)]
pub async fn update(
    services: web::Data<Services>,
    id: web::Path<String>,
    payload: web::Json<OvertimeUpdate>,
) -> impl Responder {
    match services.overtime.update(&id, payload.into_inner()).await {
        Ok(entry) => HttpResponse::Ok().json(entry),
        Err(err) => error_response(&err),
    }
}

/// Delete an entry
#[utoipa::path(
    delete,
    path = "/api/v1/overtime/{id}",
    responses((status = 204, description = "Entry deleted")),
    tag = "Overtime"
)]
pub async fn delete(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(match services.overtime.delete(&id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&err),
    })
}
