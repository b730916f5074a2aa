use async_trait::async_trait;
use uuid::Uuid;
use sqlx::PgPool;

use crate::{
    entities::blog_category::{BlogCategory, BlogCategoryChanges, BlogCategoryInsert},
    errors::AppError,
    repositories::sqlx_repo::{violated_constraint, SqlxCategoryRepo, UpdateBuilder},
};

const SLUG_KEY: &str = "blog_categories_slug_key";

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create_category(&self, category: &BlogCategoryInsert) -> Result<BlogCategory, AppError>;
    async fn get_category_by_id(&self, id: &Uuid) -> Result<BlogCategory, AppError>;
    async fn get_category_by_slug(&self, slug: &str) -> Result<BlogCategory, AppError>;
    async fn update_category(&self, id: &Uuid, changes: &BlogCategoryChanges) -> Result<BlogCategory, AppError>;
    /// Hard delete; posts in the category keep existing without one.
    async fn delete_category(&self, id: &Uuid) -> Result<(), AppError>;
    async fn list_categories(&self, active_only: bool) -> Result<Vec<BlogCategory>, AppError>;
    async fn category_exists_with_slug(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError>;
    async fn count_categories(&self) -> Result<i64, AppError>;
}

impl SqlxCategoryRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxCategoryRepo { pool }
    }
}

fn map_write_error(e: sqlx::Error) -> AppError {
    match violated_constraint(&e).as_deref() {
        Some(SLUG_KEY) => AppError::Conflict("Category slug already exists".into()),
        _ => AppError::from(e),
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepo {
    async fn create_category(&self, category: &BlogCategoryInsert) -> Result<BlogCategory, AppError> {
        let created = sqlx::query_as::<_, BlogCategory>(
            r#"
            INSERT INTO blog_categories (name, slug, icon, display_order, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#
        )
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.icon)
        .bind(category.display_order)
        .bind(category.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(created)
    }

    async fn get_category_by_id(&self, id: &Uuid) -> Result<BlogCategory, AppError> {
        sqlx::query_as::<_, BlogCategory>("SELECT * FROM blog_categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".into()))
    }

    async fn get_category_by_slug(&self, slug: &str) -> Result<BlogCategory, AppError> {
        sqlx::query_as::<_, BlogCategory>("SELECT * FROM blog_categories WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".into()))
    }

    async fn update_category(&self, id: &Uuid, changes: &BlogCategoryChanges) -> Result<BlogCategory, AppError> {
        let mut update = UpdateBuilder::new("blog_categories");
        update
            .set("name", changes.name.clone())
            .set("slug", changes.slug.clone())
            .set("icon", changes.icon.clone())
            .set("display_order", changes.display_order)
            .set("is_active", changes.is_active);

        let updated: Option<Uuid> = update
            .finish(*id, false)
            .build_query_scalar::<Uuid>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;

        match updated {
            Some(id) => self.get_category_by_id(&id).await,
            None => Err(AppError::NotFound("Category not found".into())),
        }
    }

    async fn delete_category(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blog_categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category not found".into()));
        }
        Ok(())
    }

    async fn list_categories(&self, active_only: bool) -> Result<Vec<BlogCategory>, AppError> {
        let categories = sqlx::query_as::<_, BlogCategory>(
            r#"
            SELECT * FROM blog_categories
            WHERE ($1::boolean IS FALSE OR is_active = TRUE)
            ORDER BY display_order ASC, name ASC
            "#
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn category_exists_with_slug(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM blog_categories
                WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn count_categories(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blog_categories")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
