mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, secret, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, cache, db, limiter, utils};

use auth::jwt::JwtService;
use cache::token_store::{create_redis_pool, RedisTokenStore};
use errors::AppError;
use limiter::rate_limiter::RateLimiterStore;
use repositories::sqlx_repo::{SqlxBlogPostRepo, SqlxCategoryRepo, SqlxProjectRepo};
use use_cases::{admin_auth::AdminAuthHandler, blog::BlogPostHandler, category::CategoryHandler, project::ProjectHandler};

pub type AppAdminHandler = AdminAuthHandler<JwtService>;
pub type AppBlogHandler = BlogPostHandler<SqlxBlogPostRepo>;
pub type AppCategoryHandler = CategoryHandler<SqlxCategoryRepo>;
pub type AppProjectHandler = ProjectHandler<SqlxProjectRepo>;

pub struct AppState {
    pub admin_handler: AppAdminHandler,
    pub blog_handler: AppBlogHandler,
    pub category_handler: AppCategoryHandler,
    pub project_handler: AppProjectHandler,
    pub login_limiter: RateLimiterStore,
    pub trust_forwarded_for: bool,
    pub post_retention_days: i32,
}

impl AppState {
    /// Hashes the admin secret and wires the repositories. Redis is optional:
    /// without it logout and refresh rotation are not enforced server-side.
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Result<Self, AppError> {
        let token_store = config.redis_url.as_deref().and_then(|url| {
            create_redis_pool(url)
                .map(RedisTokenStore::new)
                .map_err(|e| tracing::error!("Redis pool creation error: {}", e))
                .ok()
        });

        let admin_handler = AdminAuthHandler::new(JwtService::new(config), &config.admin_secret, token_store)?;

        Ok(AppState {
            admin_handler,
            blog_handler: BlogPostHandler::new(SqlxBlogPostRepo::new(pool.clone())),
            category_handler: CategoryHandler::new(SqlxCategoryRepo::new(pool.clone())),
            project_handler: ProjectHandler::new(SqlxProjectRepo::new(pool)),
            login_limiter: RateLimiterStore::per_minute(config.login_rate_per_minute),
            trust_forwarded_for: config.trust_forwarded_for,
            post_retention_days: config.post_retention_days.clamp(1, i32::MAX as i64) as i32,
        })
    }
}
