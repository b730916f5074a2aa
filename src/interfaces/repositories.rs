pub mod blog_post;
pub mod category;
pub mod project;
pub mod sqlx_repo;
pub mod token;
