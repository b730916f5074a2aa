use serde::Serialize;

use crate::entities::{blog_post::BlogStats, project::ProjectStats};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub blog: BlogStats,
    pub categories: i64,
    pub projects: ProjectStats,
    pub certifications: usize,
}
