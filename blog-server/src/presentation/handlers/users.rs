use crate::application::user_service::UserService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{CreateUserRequest, UserResponse};
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;

#[post("/users")]
pub async fn create_user(
    req: HttpRequest,
    service: web::Data<UserService>,
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, DomainError> {
    let new_user = payload.into_inner().validate()?;
    let user = service.register(new_user).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        username = %user.username,
        "user registered"
    );

    Ok(HttpResponse::Created().json(UserResponse::new(user, Vec::new())))
}

#[get("/users")]
pub async fn list_users(
    req: HttpRequest,
    service: web::Data<UserService>,
) -> Result<HttpResponse, DomainError> {
    let users: Vec<UserResponse> = service
        .list_users()
        .await?
        .into_iter()
        .map(|(user, blogs)| UserResponse::new(user, blogs))
        .collect();

    info!(request_id = %request_id(&req), count = users.len(), "users retrieved");

    Ok(HttpResponse::Ok().json(users))
}
