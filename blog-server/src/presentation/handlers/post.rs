use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::domain::user::UserIdentity;
use crate::presentation::dto::{CreatePostRequest, PostView, UpdatePostRequest};
use crate::presentation::utils::{ensure_claimed_owner, request_id};
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use tracing::info;
use uuid::Uuid;

#[get("/blogs")]
pub async fn list_posts(
    req: HttpRequest,
    service: web::Data<PostService>,
) -> Result<HttpResponse, DomainError> {
    let posts: Vec<PostView> = service
        .list_posts()
        .await?
        .into_iter()
        .map(|(post, owner)| PostView::new(post, owner))
        .collect();

    info!(request_id = %request_id(&req), count = posts.len(), "posts retrieved");

    Ok(HttpResponse::Ok().json(posts))
}

#[get("/blogs/stats")]
pub async fn blog_stats(
    req: HttpRequest,
    service: web::Data<PostService>,
) -> Result<HttpResponse, DomainError> {
    let stats = service.stats().await?;

    info!(request_id = %request_id(&req), total_likes = stats.total_likes, "stats computed");

    Ok(HttpResponse::Ok().json(stats))
}

#[get("/blogs/{id}")]
pub async fn get_post(
    service: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post = service.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[post("/blogs")]
pub async fn create_post(
    req: HttpRequest,
    user: UserIdentity,
    service: web::Data<PostService>,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let payload = payload.into_inner();
    ensure_claimed_owner(payload.user_id, &user)?;
    let new_post = payload.validate()?;

    let post = service.create_post(&user, new_post).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post.id,
        "post created"
    );

    Ok(HttpResponse::Created().json(post))
}

#[put("/blogs/{id}")]
pub async fn update_post(
    req: HttpRequest,
    user: UserIdentity,
    service: web::Data<PostService>,
    payload: web::Json<UpdatePostRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let changes = payload.into_inner().validate()?;

    let post = service.update_post(&user, post_id, changes).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post_id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(post))
}

#[delete("/blogs/{id}")]
pub async fn delete_post(
    req: HttpRequest,
    user: UserIdentity,
    service: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    service.delete_post(&user, post_id).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post_id,
        "post deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
