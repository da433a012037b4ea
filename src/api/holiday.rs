use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::error_response;
use crate::auth::CurrentUser;
use crate::services::holiday::{HolidayUpdate, NewHoliday};
use crate::services::Services;

#[derive(Debug, Deserialize, ToSchema)]
pub struct HolidayQuery {
    pub year: Option<i32>,
    /// 1-12; only honored together with `year`.
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HolidayCheckQuery {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
}

/// List holidays
#[utoipa::path(
    get,
    path = "/api/v1/holidays",
    params(
        ("year", Query, description = "Calendar year window"),
        ("month", Query, description = "Month within the year, 1-12")
    ),
    responses((status = 200, description = "Holidays ordered by date", body = Object)),
    tag = "Holiday"
)]
pub async fn list(
    services: web::Data<Services>,
    query: web::Query<HolidayQuery>,
) -> impl Responder {
    let result = match (query.year, query.month) {
        (Some(year), Some(month)) => services.holidays.get_by_month_and_year(month, year).await,
        (Some(year), None) => services.holidays.get_by_year(year).await,
        _ => services.holidays.get_all().await,
    };
    match result {
        Ok(holidays) => HttpResponse::Ok().json(holidays),
        Err(err) => error_response(&err),
    }
}

/// Check whether a date is a holiday
#[utoipa::path(
    get,
    path = "/api/v1/holidays/check",
    params(("date", Query, description = "Date to check")),
    responses((status = 200, description = "Holiday flag", body = Object, example = json!({
        "isHoliday": true
    }))),
    tag = "Holiday"
)]
pub async fn check(
    services: web::Data<Services>,
    query: web::Query<HolidayCheckQuery>,
) -> impl Responder {
    match services.holidays.is_holiday(query.date).await {
        Ok(flag) => HttpResponse::Ok().json(json!({ "isHoliday": flag })),
        Err(err) => error_response(&err),
    }
}

/// Create a holiday
#[utoipa::path(
    post,
    path = "/api/v1/holidays",
    request_body = NewHoliday,
    responses((status = 201, description = "Holiday created", body = Object)),
    tag = "Holiday"
)]
pub async fn create(
    user: CurrentUser,
    services: web::Data<Services>,
    payload: web::Json<NewHoliday>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(match services.holidays.create(payload.into_inner()).await {
        Ok(holiday) => HttpResponse::Created().json(holiday),
        Err(err) => error_response(&err),
    })
}

/// Update a holiday
#[utoipa::path(
    put,
    path = "/api/v1/holidays/{id}",
    request_body = HolidayUpdate,
    responses((status = 200, description = "Holiday updated", body = Object)),
    tag = "Holiday"
)]
pub async fn update(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
    payload: web::Json<HolidayUpdate>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(
        match services.holidays.update(&id, payload.into_inner()).await {
            Ok(holiday) => HttpResponse::Ok().json(holiday),
            Err(err) => error_response(&err),
        },
    )
}

/// Delete a holiday
#[utoipa::path(
    delete,
    path = "/api/v1/holidays/{id}",
    responses((status = 204, description = "Holiday deleted")),
    tag = "Holiday"
)]
pub async fn delete(
    user: CurrentUser,
    services: web::Data<Services>,
    id: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    user.require_admin()?;
    Ok(match services.holidays.delete(&id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&err),
    })
}
