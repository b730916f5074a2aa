pub mod admin;
pub mod blog_posts;
pub mod categories;
pub mod certifications;
pub mod home;
pub mod json_error;
pub mod performance;
pub mod projects;
pub mod system;
