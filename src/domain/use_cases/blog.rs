use validator::ValidationError;

use crate::{
    entities::{
        blog_post::{
            BlogPost, BlogPostCreatedResponse, BlogPostDetailResponse, BlogPostFilter, BlogPostInsert,
            BlogPostListResponse, BlogStats, ContentPreviewRequest, ContentPreviewResponse,
            NewBlogPostRequest, UpdateBlogPostRequest,
        },
        content_block::{estimate_reading_time, render_blocks_to_html, validate_content_blocks},
        pagination::{PageParams, Paginated},
    },
    errors::AppError,
    repositories::blog_post::BlogPostRepository,
    utils::valid_uuid::valid_uuid,
};

pub const DEFAULT_RECENT_LIMIT: u32 = 5;
pub const MAX_RECENT_LIMIT: u32 = 50;

pub struct BlogPostHandler<R>
where
    R: BlogPostRepository,
{
    pub blog_post_repo: R,
}

impl<R> BlogPostHandler<R>
where
    R: BlogPostRepository,
{
    pub fn new(blog_post_repo: R) -> Self {
        BlogPostHandler { blog_post_repo }
    }

    /// Creates a new blog post with the provided data
    pub async fn create_blog_post(&self, post: NewBlogPostRequest) -> Result<BlogPostCreatedResponse, AppError> {
        let insert_post = BlogPostInsert::try_from(post)?;

        if self.blog_post_repo.blog_post_exists_with_slug(&insert_post.slug, None).await? {
            return Err(AppError::Conflict(format!("Slug '{}' is already taken", insert_post.slug)));
        }

        let id = self.blog_post_repo.create_blog_post(&insert_post).await?;
        tracing::info!(post_id = %id, slug = %insert_post.slug, "Blog post created");

        Ok(BlogPostCreatedResponse {
            id,
            preview_url: format!("/blog/{}", insert_post.slug),
            admin_url: format!("/admin/blog/posts/{}", id),
            slug: insert_post.slug,
        })
    }

    /// Retrieves a blog post by its ID, drafts included
    pub async fn get_blog_post_by_id(&self, post_id: &str) -> Result<BlogPost, AppError> {
        let valid_id = valid_uuid(post_id)?;
        self.blog_post_repo.get_blog_post_by_id(&valid_id).await
    }

    /// Public read of a published post; counts as a view.
    pub async fn view_published_post(&self, slug: &str) -> Result<BlogPostDetailResponse, AppError> {
        let post = self.blog_post_repo.view_published_blog_post(slug).await?;
        Ok(post.to_detail_response())
    }

    pub async fn list_blog_posts(
        &self,
        filter: BlogPostFilter,
        params: PageParams,
    ) -> Result<Paginated<BlogPostListResponse>, AppError> {
        let (page, per_page) = params.resolve();

        let posts = self.blog_post_repo.list_blog_posts(&filter, page, per_page).await?;
        let total = self.blog_post_repo.count_blog_posts(&filter).await?;

        Ok(Paginated::new(posts, page, per_page, total).map(|p| p.to_list_response()))
    }

    /// Newest published posts, limit clamped to `1..=50`
    pub async fn get_recent_blog_posts(&self, limit: Option<u32>) -> Result<Vec<BlogPostListResponse>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, MAX_RECENT_LIMIT);
        let posts = self.blog_post_repo.get_recent_blog_posts(limit).await?;
        Ok(posts.iter().map(BlogPost::to_list_response).collect())
    }

    /// Applies a PATCH. Absent fields stay, `null` clears nullable fields.
    pub async fn update_blog_post(
        &self,
        id: &str,
        post: UpdateBlogPostRequest,
    ) -> Result<BlogPost, AppError> {
        let valid_id = valid_uuid(id)?;

        let current = self.blog_post_repo.get_blog_post_by_id(&valid_id).await?;
        let changes = post.into_changes(&current)?;

        if changes.is_empty() {
            return Ok(current);
        }

        if let Some(slug) = &changes.slug {
            if self.blog_post_repo.blog_post_exists_with_slug(slug, Some(valid_id)).await? {
                return Err(AppError::Conflict(format!("Slug '{}' is already taken", slug)));
            }
        }

        self.blog_post_repo.update_blog_post(&valid_id, &changes).await
    }

    /// Publishes a blog post, keeping an earlier `published_at`
    pub async fn publish_blog_post(&self, id: &str) -> Result<BlogPost, AppError> {
        let valid_id = valid_uuid(id)?;
        self.blog_post_repo.set_published(&valid_id, true).await
    }

    pub async fn unpublish_blog_post(&self, id: &str) -> Result<BlogPost, AppError> {
        let valid_id = valid_uuid(id)?;
        self.blog_post_repo.set_published(&valid_id, false).await
    }

    /// Deletes a blog post by its ID
    pub async fn delete_blog_post(
        &self,
        id: &str,
        hard_delete: bool
    ) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;

        match hard_delete {
            true => self.blog_post_repo.hard_delete_blog_post(&valid_id).await,
            false => self.blog_post_repo.soft_delete_blog_post(&valid_id).await
        }.map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("Blog post not found".to_string()),
            _ => e
        })
    }

    /// Renders blocks exactly as the public page would, without saving.
    pub fn preview_content(&self, request: ContentPreviewRequest) -> Result<ContentPreviewResponse, AppError> {
        validate_content_blocks(&request.content).map_err(content_error)?;

        Ok(ContentPreviewResponse {
            content_html: render_blocks_to_html(&request.content),
            reading_time_minutes: estimate_reading_time(&request.content),
        })
    }

    pub async fn blog_stats(&self) -> Result<BlogStats, AppError> {
        self.blog_post_repo.blog_stats().await
    }

    pub async fn purge_soft_deleted_posts(&self, older_than_days: i32) -> Result<u64, AppError> {
        self.blog_post_repo.purge_soft_deleted_posts(older_than_days).await
    }

    pub async fn check_connection(&self) -> Result<(), AppError> {
        self.blog_post_repo.check_connection().await
    }
}

fn content_error(err: ValidationError) -> AppError {
    let message = err
        .message
        .map(|m| m.to_string())
        .unwrap_or_else(|| "Invalid content".to_string());
    AppError::field("content", message)
}
