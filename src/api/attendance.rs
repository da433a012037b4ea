use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::error_response;
use crate::auth::CurrentUser;
use crate::model::AttendanceStatus;
use crate::services::Services;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttendanceQuery {
    pub employee_id: Option<String>,
    #[schema(value_type = Option<String>, format = "date")]
    pub start: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = "date")]
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub employee_id: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub status: AttendanceStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(
        ("employee_id", Query, description = "Filter by employee"),
        ("start", Query, description = "Range start date (inclusive); requires end"),
        ("end", Query, description = "Range end date (inclusive); requires start")
    ),
    responses(
        (status = 200, description = "Attendance records", body = Object),
        (status = 400, description = "Half-specified date range", body = Object)
    ),
    tag = "Attendance"
)]
pub async fn list(
    services: web::Data<Services>,
    query: web::Query<AttendanceQuery>,
) -> impl Responder {
    if query.start.is_some() != query.end.is_some() {
        return HttpResponse::BadRequest().json(json!({
            "message": "A date range requires both start and end"
        }));
    }

    let result = match (&query.start, &query.end, &query.employee_id) {
        (Some(start), Some(end), _) => services.attendance.get_by_date_range(*start, *end).await,
        (_, _, Some(employee_id)) => services.attendance.get_by_employee(employee_id).await,
        _ => services.attendance.get_all().await,
    };
    match result {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(err) => error_response(&err),
    }
}

/// Check in for today
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body = CheckRequest,
    responses(
        (status = 200, description = "Check-in recorded", body = Object),
        (status = 400, description = "Already checked in today", body = Object)
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    services: web::Data<Services>,
    payload: web::Json<CheckRequest>,
) -> impl Responder {
    match services
        .attendance
        .check_in(&payload.employee_id, payload.notes.as_deref())
        .await
    {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(err) => error_response(&err),
    }
}

/// Check out for today
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    request_body = CheckRequest,
    responses(
        (status = 200, description = "Check-out recorded", body = Object),
        (status = 400, description = "No open check-in for today", body = Object)
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    services: web::Data<Services>,
    payload: web::Json<CheckRequest>,
) -> impl Responder {
    match services
        .attendance
        .check_out(&payload.employee_id, payload.notes.as_deref())
        .await
    {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(err) => error_response(&err),
    }
}

/// Correct the status of a record
#[utoipa::path(
    put,
    path = "/api/v1/attendance/{id}/status",
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Object),
        (status = 403, description = "Admin privileges required", body = Object)
    ),
    tag = "Attendance"
)]
pub async fn update_status(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(
        match services
            .attendance
            .update_status(&id, payload.status, payload.notes.as_deref())
            .await
        {
            Ok(record) => HttpResponse::Ok().json(record),
            Err(err) => error_response(&err),
        },
    )
}

/// Delete a record
#[utoipa::path(
    delete,
    path = "/api/v1/attendance/{id}",
    responses((status = 204, description = "Record deleted")),
    tag = "Attendance"
)]
pub async fn delete(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(match services.attendance.delete(&id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&err),
    })
}
