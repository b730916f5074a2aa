use crate::{
    entities::blog_category::{BlogCategory, BlogCategoryInsert, NewBlogCategoryRequest, UpdateBlogCategoryRequest},
    errors::AppError,
    repositories::category::CategoryRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct CategoryHandler<R>
where
    R: CategoryRepository,
{
    pub category_repo: R,
}

impl<R> CategoryHandler<R>
where
    R: CategoryRepository,
{
    pub fn new(category_repo: R) -> Self {
        CategoryHandler { category_repo }
    }

    pub async fn create_category(&self, request: NewBlogCategoryRequest) -> Result<BlogCategory, AppError> {
        let insert = BlogCategoryInsert::try_from(request)?;

        if self.category_repo.category_exists_with_slug(&insert.slug, None).await? {
            return Err(AppError::Conflict(format!("Category slug '{}' is already taken", insert.slug)));
        }

        self.category_repo.create_category(&insert).await
    }

    pub async fn update_category(&self, id: &str, request: UpdateBlogCategoryRequest) -> Result<BlogCategory, AppError> {
        let valid_id = valid_uuid(id)?;

        let current = self.category_repo.get_category_by_id(&valid_id).await?;
        let changes = request.into_changes(&current)?;

        if changes.is_empty() {
            return Ok(current);
        }

        if let Some(slug) = &changes.slug {
            if self.category_repo.category_exists_with_slug(slug, Some(valid_id)).await? {
                return Err(AppError::Conflict(format!("Category slug '{}' is already taken", slug)));
            }
        }

        self.category_repo.update_category(&valid_id, &changes).await
    }

    /// Posts in the category survive with no category.
    pub async fn delete_category(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;
        self.category_repo.delete_category(&valid_id).await
    }

    pub async fn list_categories(&self, active_only: bool) -> Result<Vec<BlogCategory>, AppError> {
        self.category_repo.list_categories(active_only).await
    }

    pub async fn get_category_by_slug(&self, slug: &str) -> Result<BlogCategory, AppError> {
        self.category_repo.get_category_by_slug(slug).await
    }

    pub async fn count_categories(&self) -> Result<i64, AppError> {
        self.category_repo.count_categories().await
    }
}
