pub mod admin_auth;
pub mod blog;
pub mod category;
pub mod extractors;
pub mod project;
