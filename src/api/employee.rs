use actix_web::{web, HttpResponse, Responder};

use super::error_response;
use crate::auth::CurrentUser;
use crate::services::employee::{EmployeeUpdate, NewEmployee};
use crate::services::Services;

/// List employees
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses((status = 200, description = "Employees ordered by name", body = Object)),
    tag = "Employee"
)]
pub async fn list(services: web::Data<Services>) -> impl Responder {
    match services.employees.get_all().await {
        Ok(employees) => HttpResponse::Ok().json(employees),
        Err(err) => error_response(&err),
    }
}

/// Fetch one employee
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    responses(
        (status = 200, description = "Employee", body = Object),
        (status = 404, description = "Unknown id", body = Object)
    ),
    tag = "Employee"
)]
pub async fn get(services: web::Data<Services>, id: web::Path<String>) -> impl Responder {
    match services.employees.get_by_id(&id).await {
        Ok(employee) => HttpResponse::Ok().json(employee),
        Err(err) => error_response(&err),
    }
}

/// Create an employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee created", body = Object),
        (status = 403, description = "Admin privileges required", body = Object)
    ),
    tag = "Employee"
)]
pub async fn create(
    user: CurrentUser,
    services: web::Data<Services>,
    payload: web::Json<NewEmployee>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(match services.employees.create(payload.into_inner()).await {
        Ok(employee) => HttpResponse::Created().json(employee),
        Err(err) => error_response(&err),
    })
}

/// Update an employee
#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}",
    request_body = EmployeeUpdate,
    responses(
        (status = 200, description = "Employee updated", body = Object),
        (status = 404, description = "Unknown id", body = Object)
    ),
    tag = "Employee"
)]
pub async fn update(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
    payload: web::Json<EmployeeUpdate>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(
        match services.employees.update(&id, payload.into_inner()).await {
            Ok(employee) => HttpResponse::Ok().json(employee),
            Err(err) => error_response(&err),
        },
    )
}

/// Delete an employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    responses((status = 204, description = "Employee deleted")),
    tag = "Employee"
)]
pub async fn delete(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(match services.employees.delete(&id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&err),
    })
}
