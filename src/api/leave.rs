use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use utoipa::ToSchema;

use super::error_response;
use crate::auth::CurrentUser;
use crate::model::LeaveStatus;
use crate::services::leave::NewLeaveRequest;
use crate::services::Services;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaveQuery {
    pub employee_id: Option<String>,
    pub status: Option<LeaveStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveStatusRequest {
    pub status: LeaveStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// List leave requests
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(
        ("employee_id", Query, description = "Filter by employee"),
        ("status", Query, description = "Filter by status: pending, approved or rejected")
    ),
    responses((status = 200, description = "Leave requests, most recent first", body = Object)),
    tag = "Leave"
)]
pub async fn list(services: web::Data<Services>, query: web::Query<LeaveQuery>) -> impl Responder {
    let result = match (&query.employee_id, query.status) {
        (Some(employee_id), _) => services.leave.get_by_employee(employee_id).await,
        (None, Some(status)) => services.leave.get_by_status(status).await,
        _ => services.leave.get_all().await,
    };
    match result {
        Ok(requests) => HttpResponse::Ok().json(requests),
        Err(err) => error_response(&err),
    }
}

/// Submit a leave request
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body = NewLeaveRequest,
    responses((status = 201, description = "Request created as pending", body = Object)),
    tag = "Leave"
)]
pub async fn create(
    services: web::Data<Services>,
    payload: web::Json<NewLeaveRequest>,
) -> impl Responder {
    match services.leave.create(payload.into_inner()).await {
        Ok(request) => HttpResponse::Created().json(request),
        Err(err) => error_response(&err),
    }
}

/// Approve, reject or reopen a request
#[utoipa::path(
    put,
    path = "/api/v1/leave/{id}/status",
    request_body = LeaveStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Object),
        (status = 403, description = "Admin privileges required", body = Object)
    ),
    tag = "Leave"
)]
pub async fn update_status(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
    payload: web::Json<LeaveStatusRequest>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(
        match services
            .leave
            .update_status(
                &id,
                payload.status,
                Some(user.id.as_str()),
                payload.notes.as_deref(),
            )
            .await
        {
            Ok(request) => HttpResponse::Ok().json(request),
            Err(err) => error_response(&err),
        },
    )
}

/// Delete a request
#[utoipa::path(
    delete,
    path = "/api/v1/leave/{id}",
    responses((status = 204, description = "Request deleted")),
    tag = "Leave"
)]
pub async fn delete(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(match services.leave.delete(&id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&err),
    })
}
