//! REST handlers. Each module maps one entity service onto routes,
//! translating [`crate::error::Error`] values into JSON responses.

pub mod attendance;
pub mod department;
pub mod employee;
pub mod holiday;
pub mod leave;
pub mod overtime;
pub mod position;
pub mod salary;

use actix_web::HttpResponse;
use serde_json::json;
use tracing::error;

use crate::error::Error;

/// One place decides which status an error maps to, so every handler
/// reports failures the same way.
pub fn error_response(err: &Error) -> HttpResponse {
    match err {
        Error::Rule(message) => HttpResponse::BadRequest().json(json!({ "message": message })),
        Error::NotFound => HttpResponse::NotFound().json(json!({ "message": "Record not found" })),
        Error::NotAuthenticated => {
            HttpResponse::Unauthorized().json(json!({ "message": "Not authenticated" }))
        }
        other => {
            error!(error = %other, "request failed");
            HttpResponse::InternalServerError().json(json!({
                "message": "Something went wrong, Contact with system admin"
            }))
        }
    }
}
