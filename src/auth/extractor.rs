use actix_web::dev::Payload;
use actix_web::error::{ErrorForbidden, ErrorUnauthorized};
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use serde_json::json;

use crate::auth::store::SessionStore;
use crate::model::{User, UserRole};

/// The signed-in user, extracted from the shared session store.
/// Handlers that take this argument reject anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn require_admin(&self) -> actix_web::Result<()> {
        if self.role == UserRole::Admin {
            Ok(())
        } else {
            Err(ErrorForbidden(
                json!({"message": "Admin privileges required"}).to_string(),
            ))
        }
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = Ready<actix_web::Result<Self>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .app_data::<web::Data<SessionStore>>()
            .and_then(|store| store.current_user());

        ready(user.map(CurrentUser::from).ok_or_else(|| {
            ErrorUnauthorized(json!({"message": "Not authenticated"}).to_string())
        }))
    }
}
