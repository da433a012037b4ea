use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use utoipa::ToSchema;

use super::error_response;
use crate::auth::CurrentUser;
use crate::services::salary::{NewSalary, SalaryUpdate};
use crate::services::Services;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SalaryQuery {
    pub employee_id: Option<String>,
}

/// List salary records
#[utoipa::path(
    get,
    path = "/api/v1/salaries",
    params(("employee_id", Query, description = "Filter by employee")),
    responses((status = 200, description = "Salary records, most recent first", body = Object)),
    tag = "Salary"
)]
pub async fn list(
    services: web::Data<Services>,
    query: web::Query<SalaryQuery>,
) -> impl Responder {
    let result = match &query.employee_id {
        Some(employee_id) => services.salaries.get_by_employee(employee_id).await,
        None => services.salaries.get_all().await,
    };
    match result {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(err) => error_response(&err),
    }
}

/// Fetch one salary record
#[utoipa::path(
    get,
    path = "/api/v1/salaries/{id}",
    responses(
        (status = 200, description = "Salary record", body = Object),
        (status = 404, description = "Unknown id", body = Object)
    ),
    tag = "Salary"
)]
pub async fn get(services: web::Data<Services>, id: web::Path<String>) -> impl Responder {
    match services.salaries.get_by_id(&id).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(err) => error_response(&err),
    }
}

/// Create a salary record
#[utoipa::path(
    post,
    path = "/api/v1/salaries",
    request_body = NewSalary,
    responses((status = 201, description = "Record created as pending", body = Object)),
    tag = "Salary"
)]
pub async fn create(
    user: CurrentUser,
    services: web::Data<Services>,
    payload: web::Json<NewSalary>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(match services.salaries.create(payload.into_inner()).await {
        Ok(record) => HttpResponse::Created().json(record),
        Err(err) => error_response(&err),
    })
}

/// Adjust the amount components
#[utoipa::path(
    put,
    path = "/api/v1/salaries/{id}",
    request_body = SalaryUpdate,
    responses((status = 200, description = "Record updated with recomputed total", body = Object)),
    tag = "Salary"
)]
pub async fn update(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
    payload: web::Json<SalaryUpdate>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(
        match services.salaries.update(&id, payload.into_inner()).await {
            Ok(record) => HttpResponse::Ok().json(record),
            Err(err) => error_response(&err),
        },
    )
}

/// Mark a record as paid
#[utoipa::path(
    put,
    path = "/api/v1/salaries/{id}/pay",
    responses(
        (status = 200, description = "Record marked paid", body = Object),
        (status = 403, description = "Admin privileges required", body = Object)
    ),
    tag = "Salary"
)]
pub async fn mark_as_paid(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(match services.salaries.mark_as_paid(&id).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(err) => error_response(&err),
    })
}

/// Delete a record
#[utoipa::path(
    delete,
    path = "/api/v1/salaries/{id}",
    responses((status = 204, description = "Record deleted")),
    tag = "Salary"
)]
pub async fn delete(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(match services.salaries.delete(&id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&err),
    })
}
