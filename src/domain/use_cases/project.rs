use crate::{
    entities::project::{NewProjectRequest, Project, ProjectFilter, ProjectStats, ProjectStatus, UpdateProjectRequest},
    errors::AppError,
    repositories::project::ProjectRepository,
    utils::valid_uuid::valid_uuid,
};
use validator::Validate;

pub struct ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub project_repo: R,
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub fn new(project_repo: R) -> Self {
        ProjectHandler { project_repo }
    }

    pub async fn create_project(&self, request: NewProjectRequest) -> Result<Project, AppError> {
        request.validate()?;
        let project = self.project_repo.create_project(&request).await?;
        tracing::info!(project_id = %project.id, "Project created");
        Ok(project)
    }

    pub async fn update_project(&self, id: &str, request: UpdateProjectRequest) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id)?;
        let changes = request.into_changes()?;

        if changes.is_empty() {
            return self.project_repo.get_project_by_id(&valid_id).await;
        }
        self.project_repo.update_project(&valid_id, &changes).await
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;
        self.project_repo.delete_project(&valid_id).await
    }

    /// Drafts are reported as missing unless `include_drafts` is set.
    pub async fn get_project(&self, id: &str, include_drafts: bool) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id)?;
        let project = self.project_repo.get_project_by_id(&valid_id).await?;

        if project.status == ProjectStatus::Draft && !include_drafts {
            return Err(AppError::NotFound("Project not found".into()));
        }
        Ok(project)
    }

    pub async fn list_projects(&self, filter: ProjectFilter) -> Result<Vec<Project>, AppError> {
        if !filter.include_drafts && filter.status == Some(ProjectStatus::Draft) {
            return Ok(Vec::new());
        }
        self.project_repo.list_projects(&filter).await
    }

    pub async fn count_by_status(&self) -> Result<ProjectStats, AppError> {
        self.project_repo.project_stats().await
    }
}
