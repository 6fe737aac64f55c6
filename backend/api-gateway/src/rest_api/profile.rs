/// Protected resource endpoints behind the authentication gate
use actix_web::{HttpResponse, Result};

use super::models::UserProfile;
use crate::middleware::auth_gate::Principal;

/// GET /api/me - the principal the gate resolved for this request
pub async fn me(principal: Principal) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserProfile {
        id: principal.id,
        username: principal.username,
        email: principal.email,
    }))
}
