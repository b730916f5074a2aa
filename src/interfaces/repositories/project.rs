use async_trait::async_trait;
use uuid::Uuid;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    entities::project::{NewProjectRequest, Project, ProjectChanges, ProjectFilter, ProjectStats, ProjectStatus},
    errors::AppError,
    repositories::sqlx_repo::{SqlxProjectRepo, UpdateBuilder},
};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create_project(&self, project: &NewProjectRequest) -> Result<Project, AppError>;
    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError>;
    async fn update_project(&self, id: &Uuid, changes: &ProjectChanges) -> Result<Project, AppError>;
    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;
    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, AppError>;
    async fn project_stats(&self) -> Result<ProjectStats, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn create_project(&self, project: &NewProjectRequest) -> Result<Project, AppError> {
        let created = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                title, short_description, long_description, tech_stack, image_url,
                github_url, live_url, featured, status, order_index
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#
        )
        .bind(&project.title)
        .bind(&project.short_description)
        .bind(&project.long_description)
        .bind(&project.tech_stack)
        .bind(&project.image_url)
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(project.featured)
        .bind(project.status)
        .bind(project.order_index)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    async fn update_project(&self, id: &Uuid, changes: &ProjectChanges) -> Result<Project, AppError> {
        let mut update = UpdateBuilder::new("projects");
        update
            .set("title", changes.title.clone())
            .set("short_description", changes.short_description.clone())
            .set("long_description", changes.long_description.clone())
            .set("tech_stack", changes.tech_stack.clone())
            .set("image_url", changes.image_url.clone())
            .set("github_url", changes.github_url.clone())
            .set("live_url", changes.live_url.clone())
            .set("featured", changes.featured)
            .set("status", changes.status)
            .set("order_index", changes.order_index);

        let updated: Option<Uuid> = update
            .finish(*id, false)
            .build_query_scalar::<Uuid>()
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(id) => self.get_project_by_id(&id).await,
            None => Err(AppError::NotFound("Project not found".into())),
        }
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".into()));
        }
        Ok(())
    }

    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM projects WHERE TRUE");

        if !filter.include_drafts {
            builder.push(" AND status <> ").push_bind(ProjectStatus::Draft);
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(featured) = filter.featured {
            builder.push(" AND featured = ").push_bind(featured);
        }
        builder.push(" ORDER BY featured DESC, order_index ASC, created_at DESC");

        let projects = builder.build_query_as::<Project>().fetch_all(&self.pool).await?;
        Ok(projects)
    }

    async fn project_stats(&self) -> Result<ProjectStats, AppError> {
        let stats = sqlx::query_as::<_, ProjectStats>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'active') AS active,
                COUNT(*) FILTER (WHERE status = 'archived') AS archived,
                COUNT(*) FILTER (WHERE status = 'draft') AS draft,
                COUNT(*) FILTER (WHERE featured) AS featured
            FROM projects
            "#
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}
