use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use utoipa::ToSchema;

use super::error_response;
use crate::auth::CurrentUser;
use crate::services::position::{NewPosition, PositionUpdate};
use crate::services::Services;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PositionQuery {
    pub department: Option<String>,
}

/// List positions
#[utoipa::path(
    get,
    path = "/api/v1/positions",
    params(("department", Query, description = "Filter by department name")),
    responses((status = 200, description = "Positions ordered by name", body = Object)),
    tag = "Position"
)]
pub async fn list(
    services: web::Data<Services>,
    query: web::Query<PositionQuery>,
) -> impl Responder {
    let result = match &query.department {
        Some(department) => services.positions.get_by_department(department).await,
        None => services.positions.get_all().await,
    };
    match result {
        Ok(positions) => HttpResponse::Ok().json(positions),
        Err(err) => error_response(&err),
    }
}

/// Fetch one position
#[utoipa::path(
    get,
    path = "/api/v1/positions/{id}",
    responses(
        (status = 200, description = "Position", body = Object),
        (status = 404, description = "Unknown id", body = Object)
    ),
    tag = "Position"
)]
pub async fn get(services: web::Data<Services>, id: web::Path<String>) -> impl Responder {
    match services.positions.get_by_id(&id).await {
        Ok(position) => HttpResponse::Ok().json(position),
        Err(err) => error_response(&err),
    }
}

/// Create a position
#[utoipa::path(
    post,
    path = "/api/v1/positions",
    request_body = NewPosition,
    responses((status = 201, description = "Position created", body = Object)),
    tag = "Position"
)]
pub async fn create(
    user: CurrentUser,
    services: web::Data<Services>,
    payload: web::Json<NewPosition>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(match services.positions.create(payload.into_inner()).await {
        Ok(position) => HttpResponse::Created().json(position),
        Err(err) => error_response(&err),
    })
}

/// Update a position
#[utoipa::path(
    put,
    path = "/api/v1/positions/{id}",
    request_body = PositionUpdate,
    responses((status = 200, description = "Position updated", body = Object)),
    tag = "Position"
)]
pub async fn update(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
    payload: web::Json<PositionUpdate>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(
        match services.positions.update(&id, payload.into_inner()).await {
            Ok(position) => HttpResponse::Ok().json(position),
            Err(err) => error_response(&err),
        },
    )
}

/// Delete a position
#[utoipa::path(
    delete,
    path = "/api/v1/positions/{id}",
    responses((status = 204, description = "Position deleted")),
    tag = "Position"
)]
pub async fn delete(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(match services.positions.delete(&id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&err),
    })
}
