use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{LoginRequest, LoginResponse};
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, post, web};
use tracing::info;

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, DomainError> {
    let outcome = service.login(&payload.username, &payload.password).await?;

    info!(
        request_id = %request_id(&req),
        username = %outcome.user.username,
        "token issued"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: outcome.token,
        username: outcome.user.username,
        name: outcome.user.name,
        expires_in: service.keys().ttl_secs(),
        token_type: "Bearer".to_string(),
    }))
}
