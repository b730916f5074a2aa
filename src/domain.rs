pub mod entities;
pub mod use_cases;
pub mod secret;
