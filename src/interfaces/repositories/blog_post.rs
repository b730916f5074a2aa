use async_trait::async_trait;
use uuid::Uuid;
use sqlx::{self, types::Json, PgPool, Postgres, QueryBuilder};

use crate::{
    entities::{
        blog_post::{BlogPost, BlogPostChanges, BlogPostFilter, BlogPostInsert, BlogPostRow, BlogStats},
        pagination::page_offset,
    },
    errors::AppError,
    repositories::sqlx_repo::{violated_constraint, SqlxBlogPostRepo, UpdateBuilder},
};

const SLUG_INDEX: &str = "blog_posts_slug_active_idx";
const CATEGORY_FK: &str = "blog_posts_category_id_fkey";

const POST_SELECT: &str = r#"
    SELECT p.id, p.title, p.slug, p.description, p.content, p.cover_image_url,
           p.category_id, c.name AS category_name, c.slug AS category_slug,
           p.tags, p.is_published, p.published_at, p.view_count, p.reading_time_minutes,
           p.created_at, p.updated_at, p.deleted_at
    FROM blog_posts p
    LEFT JOIN blog_categories c ON c.id = p.category_id
    WHERE p.deleted_at IS NULL"#;

#[async_trait]
pub trait BlogPostRepository: Sync + Send {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn create_blog_post(&self, post: &BlogPostInsert) -> Result<Uuid, AppError>;
    async fn get_blog_post_by_id(&self, id: &Uuid) -> Result<BlogPost, AppError>;
    /// Fetches a published post and bumps its view counter in one statement.
    async fn view_published_blog_post(&self, slug: &str) -> Result<BlogPost, AppError>;
    async fn update_blog_post(&self, id: &Uuid, changes: &BlogPostChanges) -> Result<BlogPost, AppError>;
    async fn set_published(&self, id: &Uuid, published: bool) -> Result<BlogPost, AppError>;
    async fn list_blog_posts(&self, filter: &BlogPostFilter, page: u32, per_page: u32) -> Result<Vec<BlogPost>, AppError>;
    async fn count_blog_posts(&self, filter: &BlogPostFilter) -> Result<i64, AppError>;
    async fn get_recent_blog_posts(&self, limit: u32) -> Result<Vec<BlogPost>, AppError>;
    async fn blog_post_exists_with_slug(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError>;
    async fn soft_delete_blog_post(&self, id: &Uuid) -> Result<(), AppError>;
    async fn hard_delete_blog_post(&self, id: &Uuid) -> Result<(), AppError>;
    async fn purge_soft_deleted_posts(&self, older_than_days: i32) -> Result<u64, AppError>;
    async fn blog_stats(&self) -> Result<BlogStats, AppError>;
}

impl SqlxBlogPostRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxBlogPostRepo { pool }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &BlogPostFilter) {
    if filter.published_only {
        builder.push(" AND p.is_published = TRUE");
    }
    if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
        builder.push(" AND c.slug = ").push_bind(category.to_string());
    }
    if let Some(tag) = filter.tag.as_deref().filter(|t| !t.is_empty()) {
        builder.push(" AND p.tags @> ").push_bind(vec![tag.to_string()]);
    }
    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", escape_like(q));
        builder.push(" AND (p.title ILIKE ").push_bind(pattern.clone());
        builder.push(" OR p.description ILIKE ").push_bind(pattern);
        builder.push(")");
    }
}

fn escape_like(input: &str) -> String {
    input.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

fn map_write_error(e: sqlx::Error) -> AppError {
    match violated_constraint(&e).as_deref() {
        Some(SLUG_INDEX) => AppError::Conflict("Slug already exists".into()),
        Some(CATEGORY_FK) => AppError::field("category_id", "Unknown category"),
        _ => AppError::from(e),
    }
}

#[async_trait]
impl BlogPostRepository for SqlxBlogPostRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn create_blog_post(&self, post: &BlogPostInsert) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO blog_posts (
                title, slug, description, content, cover_image_url, category_id, tags,
                is_published, published_at, reading_time_minutes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.description)
        .bind(Json(&post.content))
        .bind(&post.cover_image_url)
        .bind(post.category_id)
        .bind(&post.tags)
        .bind(post.is_published)
        .bind(post.published_at)
        .bind(post.reading_time_minutes)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(id)
    }

    async fn get_blog_post_by_id(&self, id: &Uuid) -> Result<BlogPost, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(POST_SELECT);
        builder.push(" AND p.id = ").push_bind(*id);

        builder
            .build_query_as::<BlogPostRow>()
            .fetch_optional(&self.pool)
            .await?
            .map(BlogPost::from)
            .ok_or_else(|| AppError::NotFound("Blog post not found".into()))
    }

    async fn view_published_blog_post(&self, slug: &str) -> Result<BlogPost, AppError> {
        let id: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE blog_posts
            SET view_count = view_count + 1
            WHERE slug = $1 AND is_published = TRUE AND deleted_at IS NULL
            RETURNING id
            "#
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        match id {
            Some(id) => self.get_blog_post_by_id(&id).await,
            None => Err(AppError::NotFound("Blog post not found".into())),
        }
    }

    async fn update_blog_post(&self, id: &Uuid, changes: &BlogPostChanges) -> Result<BlogPost, AppError> {
        let mut update = UpdateBuilder::new("blog_posts");
        update
            .set("title", changes.title.clone())
            .set("slug", changes.slug.clone())
            .set("description", changes.description.clone())
            .set("content", changes.content.clone().map(Json))
            .set("reading_time_minutes", changes.reading_time_minutes)
            .set("cover_image_url", changes.cover_image_url.clone())
            .set("category_id", changes.category_id)
            .set("tags", changes.tags.clone())
            .set("is_published", changes.is_published)
            .set("published_at", changes.published_at);

        let updated: Option<Uuid> = update
            .finish(*id, true)
            .build_query_scalar::<Uuid>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;

        match updated {
            Some(id) => self.get_blog_post_by_id(&id).await,
            None => Err(AppError::NotFound("Blog post not found".into())),
        }
    }

    async fn set_published(&self, id: &Uuid, published: bool) -> Result<BlogPost, AppError> {
        // Republishing keeps the original publication date
        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE blog_posts SET
                is_published = $2,
                published_at = CASE WHEN $2 THEN COALESCE(published_at, NOW()) ELSE published_at END,
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id
            "#
        )
        .bind(id)
        .bind(published)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.get_blog_post_by_id(&id).await,
            None => Err(AppError::NotFound("Blog post not found".into())),
        }
    }

    async fn list_blog_posts(&self, filter: &BlogPostFilter, page: u32, per_page: u32) -> Result<Vec<BlogPost>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(POST_SELECT);
        push_filter(&mut builder, filter);

        if filter.published_only {
            builder.push(" ORDER BY p.published_at DESC NULLS LAST, p.created_at DESC");
        } else {
            builder.push(" ORDER BY p.created_at DESC");
        }

        builder.push(" LIMIT ").push_bind(per_page as i64);
        builder.push(" OFFSET ").push_bind(page_offset(page, per_page));

        let rows = builder.build_query_as::<BlogPostRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(BlogPost::from).collect())
    }

    async fn count_blog_posts(&self, filter: &BlogPostFilter) -> Result<i64, AppError> {
        // Same predicate as the listing
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM blog_posts p LEFT JOIN blog_categories c ON c.id = p.category_id WHERE p.deleted_at IS NULL"
        );
        push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn get_recent_blog_posts(&self, limit: u32) -> Result<Vec<BlogPost>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(POST_SELECT);
        builder.push(" AND p.is_published = TRUE ORDER BY p.published_at DESC NULLS LAST LIMIT ");
        builder.push_bind(limit as i64);

        let rows = builder.build_query_as::<BlogPostRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(BlogPost::from).collect())
    }

    async fn blog_post_exists_with_slug(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM blog_posts
                WHERE slug = $1
                  AND deleted_at IS NULL
                  AND ($2::uuid IS NULL OR id <> $2)
            )
            "#
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn soft_delete_blog_post(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE blog_posts
            SET deleted_at = NOW(), is_published = FALSE
            WHERE id = $1 AND deleted_at IS NULL
            "#
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Blog post not found".into()));
        }

        Ok(())
    }

    async fn hard_delete_blog_post(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Blog post not found".into()));
        }

        Ok(())
    }

    async fn purge_soft_deleted_posts(&self, older_than_days: i32) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM blog_posts
            WHERE deleted_at IS NOT NULL
              AND deleted_at < NOW() - make_interval(days => $1)
            "#
        )
        .bind(older_than_days)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn blog_stats(&self) -> Result<BlogStats, AppError> {
        let stats = sqlx::query_as::<_, BlogStats>(
            r#"
            SELECT
                COUNT(*) AS total_posts,
                COUNT(*) FILTER (WHERE is_published) AS published_posts,
                COUNT(*) FILTER (WHERE NOT is_published) AS draft_posts,
                COALESCE(SUM(view_count), 0)::BIGINT AS total_views
            FROM blog_posts
            WHERE deleted_at IS NULL
            "#
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_done"), "100\\%\\_done");
    }

    #[test]
    fn filter_adds_only_requested_predicates() {
        let filter = BlogPostFilter {
            published_only: true,
            category: Some("rust".into()),
            tag: None,
            q: Some("  ".into()),
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 WHERE TRUE");
        push_filter(&mut builder, &filter);

        let sql = builder.sql();
        assert!(sql.contains("p.is_published = TRUE"));
        assert!(sql.contains("c.slug = $1"));
        assert!(!sql.contains("ILIKE"));
        assert!(!sql.contains("@>"));
    }
}
