pub mod blog_category;
pub mod blog_post;
pub mod certification;
pub mod content_block;
pub mod dashboard;
pub mod option_fields;
pub mod pagination;
pub mod performance;
pub mod project;
pub mod token;
pub mod validation;
