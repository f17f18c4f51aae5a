use crate::application::auth_guard::AuthGuard;
use crate::application::auth_service::AuthService;
use crate::application::post_service::{PostService, UpdatePolicy};
use crate::application::user_service::UserService;
use crate::data::memory::InMemoryStore;
use crate::data::post_repository::{PostRepository, PostgresPostRepository};
use crate::data::user_repository::{PostgresUserRepository, UserRepository};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database::{create_pool, run_migrations};
use crate::infrastructure::security::JwtKeys;
use crate::presentation::handlers;
use crate::presentation::middleware::{JwtAuthMiddleware, RequestContextMiddleware};
use crate::presentation::utils::{json_error_handler, path_error_handler};
use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpServer, web};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything the handlers need, wired over a pair of stores.
#[derive(Clone)]
pub struct AppServices {
    pub auth: AuthService,
    pub users: UserService,
    pub posts: PostService,
    pub guard: AuthGuard,
}

impl AppServices {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        keys: JwtKeys,
        update_policy: UpdatePolicy,
    ) -> Self {
        Self {
            auth: AuthService::new(Arc::clone(&users), keys.clone()),
            users: UserService::new(Arc::clone(&users), Arc::clone(&posts)),
            posts: PostService::new(Arc::clone(&posts), Arc::clone(&users), update_policy),
            guard: AuthGuard::new(keys, users),
        }
    }
}

/// Registers app data and the `/api` routes.
pub fn configure(services: AppServices) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(services.auth.clone()))
            .app_data(web::Data::new(services.users.clone()))
            .app_data(web::Data::new(services.posts.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .service(
                web::scope("/api")
                    .wrap(JwtAuthMiddleware::new(services.guard.clone()))
                    .service(handlers::health::health)
                    .service(handlers::auth::login)
                    .service(handlers::users::create_user)
                    .service(handlers::users::list_users)
                    .service(handlers::post::list_posts)
                    .service(handlers::post::blog_stats)
                    .service(handlers::post::get_post)
                    .service(handlers::post::create_post)
                    .service(handlers::post::update_post)
                    .service(handlers::post::delete_post),
            );
    }
}

async fn build_stores(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn UserRepository>, Arc<dyn PostRepository>)> {
    match &config.database_url {
        Some(database_url) => {
            let pool = create_pool(database_url).await?;
            run_migrations(&pool).await?;
            let users: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));
            let posts: Arc<dyn PostRepository> = Arc::new(PostgresPostRepository::new(pool));
            Ok((users, posts))
        }
        None => {
            warn!("DATABASE_URL not set, data lives in memory only");
            let store = Arc::new(InMemoryStore::new());
            let users: Arc<dyn UserRepository> = store.clone();
            let posts: Arc<dyn PostRepository> = store;
            Ok((users, posts))
        }
    }
}

pub async fn start_rest_server(config: AppConfig) -> anyhow::Result<()> {
    let (users, posts) = build_stores(&config).await?;
    let update_policy = UpdatePolicy::from_flag(config.enforce_update_ownership);
    let services = AppServices::new(
        users,
        posts,
        JwtKeys::with_ttl(config.jwt_secret.clone(), config.jwt_ttl_secs),
        update_policy,
    );

    let bind_address = (config.host.clone(), config.port);
    info!(
        host = %bind_address.0,
        port = bind_address.1,
        update_policy = ?update_policy,
        "HTTP server starting"
    );

    let cors_origins = config.cors_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(RequestContextMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(build_cors(&cors_origins))
            .configure(configure(services.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    Ok(())
}

fn build_cors(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in origins {
        cors = if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(origin)
        };
    }

    cors
}
