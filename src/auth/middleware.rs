use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::store::SessionStore;

/// Rejects anonymous requests before they reach a protected handler.
pub async fn session_guard(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> actix_web::Result<ServiceResponse<impl MessageBody>> {
    let authenticated = req
        .app_data::<web::Data<SessionStore>>()
        .map(|store| store.state().is_authenticated)
        .unwrap_or(false);

    if !authenticated {
        let (request, _payload) = req.into_parts();
        let response = HttpResponse::Unauthorized()
            .json(json!({"message": "Not authenticated"}))
            .map_into_right_body();
        return Ok(ServiceResponse::new(request, response));
    }

    let res = next.call(req).await?;
    Ok(res.map_into_left_body())
}
