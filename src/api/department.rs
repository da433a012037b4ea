use actix_web::{web, HttpResponse, Responder};

use super::error_response;
use crate::auth::CurrentUser;
use crate::services::department::{DepartmentUpdate, NewDepartment};
use crate::services::Services;

/// List departments
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses((status = 200, description = "Departments ordered by name", body = Object)),
    tag = "Department"
)]
pub async fn list(services: web::Data<Services>) -> impl Responder {
    match services.departments.get_all().await {
        Ok(departments) => HttpResponse::Ok().json(departments),
        Err(err) => error_response(&err),
    }
}

/// Fetch one department
#[utoipa::path(
    get,
    path = "/api/v1/departments/{id}",
    responses(
        (status = 200, description = "Department", body = Object),
        (status = 404, description = "Unknown id", body = Object)
    ),
    tag = "Department"
)]
pub async fn get(services: web::Data<Services>, id: web::Path<String>) -> impl Responder {
    match services.departments.get_by_id(&id).await {
        Ok(department) => HttpResponse::Ok().json(department),
        Err(err) => error_response(&err),
    }
}

/// Create a department
#[utoipa::path(
    post,
    path = "/api/v1/departments",
    request_body = NewDepartment,
    responses((status = 201, description = "Department created", body = Object)),
    tag = "Department"
)]
pub async fn create(
    user: CurrentUser,
    services: web::Data<Services>,
    payload: web::Json<NewDepartment>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(
        match services.departments.create(payload.into_inner()).await {
            Ok(department) => HttpResponse::Created().json(department),
            Err(err) => error_response(&err),
        },
    )
}

/// Update a department
#[utoipa::path(
    put,
    path = "/api/v1/departments/{id}",
    request_body = DepartmentUpdate,
    responses((status = 200, description = "Department updated", body = Object)),
    tag = "Department"
)]
pub async fn update(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
    payload: web::Json<DepartmentUpdate>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(
        match services.departments.update(&id, payload.into_inner()).await {
            Ok(department) => HttpResponse::Ok().json(department),
            Err(err) => error_response(&err),
        },
    )
}

/// Delete a department
#[utoipa::path(
    delete,
    path = "/api/v1/departments/{id}",
    responses((status = 204, description = "Department deleted")),
    tag = "Department"
)]
pub async fn delete(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(match services.departments.delete(&id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&err),
    })
}
