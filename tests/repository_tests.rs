//! Repository tests against a real Postgres. Set `TEST_DATABASE_URL` to run
//! them; without it every test returns early.


use std::time::Duration;

use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use terminal_portfolio::{
    entities::{
        blog_category::BlogCategoryInsert,
        blog_post::{BlogPostFilter, BlogPostInsert},
        content_block::ContentBlock,
        project::{NewProjectRequest, Project, ProjectFilter, ProjectStatus},
    },
    errors::AppError,
    repositories::{
        blog_post::BlogPostRepository,
        category::CategoryRepository,
        project::ProjectRepository,
        sqlx_repo::{SqlxBlogPostRepo, SqlxCategoryRepo, SqlxProjectRepo},
    },
};
use test_utils::test_db_pool;

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

fn post(slug: &str) -> BlogPostInsert {
    BlogPostInsert {
        title: format!("Post {slug}"),
        slug: slug.to_string(),
        description: "A post written by the repository tests".into(),
        content: vec![ContentBlock::Paragraph { text: "hello from the shell".into() }],
        cover_image_url: None,
        category_id: None,
        tags: vec![],
        is_published: true,
        published_at: Some(Utc::now()),
        reading_time_minutes: 1,
    }
}

fn draft(slug: &str) -> BlogPostInsert {
    BlogPostInsert { is_published: false, published_at: None, ..post(slug) }
}

fn category(slug: &str) -> BlogCategoryInsert {
    BlogCategoryInsert {
        name: "Repository tests".into(),
        slug: slug.to_string(),
        icon: None,
        display_order: 0,
        is_active: true,
    }
}

fn project(title: &str, featured: bool, order_index: i32, status: ProjectStatus) -> NewProjectRequest {
    NewProjectRequest {
        title: title.to_string(),
        short_description: "A project created by the repository tests".into(),
        long_description: None,
        tech_stack: vec!["Rust".into()],
        image_url: None,
        github_url: None,
        live_url: None,
        featured,
        status,
        order_index,
    }
}

/// Other tests share the table, so only look at rows this test created.
fn ids_with_marker(projects: Vec<Project>, marker: &str) -> Vec<Uuid> {
    projects
        .into_iter()
        .filter(|p| p.title.starts_with(marker))
        .map(|p| p.id)
        .collect()
}

async fn row_exists(pool: &PgPool, id: Uuid) -> bool {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM blog_posts WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Failed to query blog_posts")
}

#[tokio::test]
async fn each_read_of_a_published_post_counts_a_view() {
    let Some(pool) = test_db_pool().await else { return };
    let repo = SqlxBlogPostRepo::new(pool);

    let slug = unique("viewed");
    let id = repo.create_blog_post(&post(&slug)).await.unwrap();

    let first = repo.view_published_blog_post(&slug).await.unwrap();
    let second = repo.view_published_blog_post(&slug).await.unwrap();
    assert_eq!(first.view_count, 1);
    assert_eq!(second.view_count, 2);
    assert_eq!(repo.get_blog_post_by_id(&id).await.unwrap().view_count, 2);

    let hidden = unique("hidden");
    repo.create_blog_post(&draft(&hidden)).await.unwrap();
    let result = repo.view_published_blog_post(&hidden).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn republishing_keeps_the_first_publication_date() {
    let Some(pool) = test_db_pool().await else { return };
    let repo = SqlxBlogPostRepo::new(pool.clone());

    let id = repo.create_blog_post(&draft(&unique("republish"))).await.unwrap();
    let published = repo.set_published(&id, true).await.unwrap();
    assert!(published.is_published);
    assert!(published.published_at.is_some());

    let first = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    sqlx::query("UPDATE blog_posts SET published_at = $2 WHERE id = $1")
        .bind(id)
        .bind(first)
        .execute(&pool)
        .await
        .unwrap();

    let unpublished = repo.set_published(&id, false).await.unwrap();
    assert!(!unpublished.is_published);
    assert_eq!(unpublished.published_at, Some(first));

    let republished = repo.set_published(&id, true).await.unwrap();
    assert!(republished.is_published);
    assert_eq!(republished.published_at, Some(first));
}

#[tokio::test]
async fn soft_deleted_posts_are_hidden_until_purged() {
    let Some(pool) = test_db_pool().await else { return };
    let repo = SqlxBlogPostRepo::new(pool.clone());

    let old_slug = unique("old");
    let old = repo.create_blog_post(&post(&old_slug)).await.unwrap();
    let recent = repo.create_blog_post(&post(&unique("recent"))).await.unwrap();

    repo.soft_delete_blog_post(&old).await.unwrap();
    repo.soft_delete_blog_post(&recent).await.unwrap();

    assert!(matches!(repo.get_blog_post_by_id(&old).await, Err(AppError::NotFound(_))));
    assert!(matches!(repo.view_published_blog_post(&old_slug).await, Err(AppError::NotFound(_))));
    assert!(!repo.blog_post_exists_with_slug(&old_slug, None).await.unwrap());
    assert!(matches!(repo.soft_delete_blog_post(&old).await, Err(AppError::NotFound(_))));

    sqlx::query("UPDATE blog_posts SET deleted_at = NOW() - INTERVAL '40 days' WHERE id = $1")
        .bind(old)
        .execute(&pool)
        .await
        .unwrap();

    let purged = repo.purge_soft_deleted_posts(30).await.unwrap();
    assert!(purged >= 1);
    assert!(!row_exists(&pool, old).await);
    assert!(row_exists(&pool, recent).await);

    repo.hard_delete_blog_post(&recent).await.unwrap();
    assert!(!row_exists(&pool, recent).await);
}

#[tokio::test]
async fn live_slug_collision_is_a_conflict() {
    let Some(pool) = test_db_pool().await else { return };
    let repo = SqlxBlogPostRepo::new(pool);

    let slug = unique("taken");
    let first = repo.create_blog_post(&post(&slug)).await.unwrap();

    let duplicate = repo.create_blog_post(&post(&slug)).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    // The unique index only covers live posts
    repo.soft_delete_blog_post(&first).await.unwrap();
    let reused = repo.create_blog_post(&post(&slug)).await.unwrap();
    assert_ne!(reused, first);
}

#[tokio::test]
async fn deleting_a_category_detaches_its_posts() {
    let Some(pool) = test_db_pool().await else { return };
    let posts = SqlxBlogPostRepo::new(pool.clone());
    let categories = SqlxCategoryRepo::new(pool);

    let cat = categories.create_category(&category(&unique("cat"))).await.unwrap();
    let id = posts
        .create_blog_post(&BlogPostInsert { category_id: Some(cat.id), ..post(&unique("filed")) })
        .await
        .unwrap();

    let filed = posts.get_blog_post_by_id(&id).await.unwrap();
    assert_eq!(filed.category_slug.as_deref(), Some(cat.slug.as_str()));

    categories.delete_category(&cat.id).await.unwrap();

    let orphan = posts.get_blog_post_by_id(&id).await.unwrap();
    assert_eq!(orphan.category_id, None);
    assert_eq!(orphan.category_name, None);
}

#[tokio::test]
async fn unknown_category_is_rejected_on_the_field() {
    let Some(pool) = test_db_pool().await else { return };
    let repo = SqlxBlogPostRepo::new(pool);

    let result = repo
        .create_blog_post(&BlogPostInsert { category_id: Some(Uuid::new_v4()), ..post(&unique("stray")) })
        .await;

    match result {
        Err(AppError::ValidationError(errors)) => assert_eq!(errors[0].field, "category_id"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn listing_filters_by_tag_category_and_search() {
    let Some(pool) = test_db_pool().await else { return };
    let posts = SqlxBlogPostRepo::new(pool.clone());
    let categories = SqlxCategoryRepo::new(pool);

    let tag = unique("tag");
    let cat = categories.create_category(&category(&unique("listing"))).await.unwrap();

    posts
        .create_blog_post(&BlogPostInsert {
            title: format!("100% uptime {tag}"),
            tags: vec![tag.clone()],
            category_id: Some(cat.id),
            ..post(&unique("percent"))
        })
        .await
        .unwrap();
    posts
        .create_blog_post(&BlogPostInsert {
            title: format!("1000 uptime {tag}"),
            tags: vec![tag.clone(), "extra".into()],
            ..draft(&unique("thousand"))
        })
        .await
        .unwrap();
    posts
        .create_blog_post(&BlogPostInsert { tags: vec!["other".into()], ..post(&unique("untagged")) })
        .await
        .unwrap();

    let by_tag = BlogPostFilter { tag: Some(tag.clone()), ..Default::default() };
    assert_eq!(posts.count_blog_posts(&by_tag).await.unwrap(), 2);
    assert_eq!(posts.list_blog_posts(&by_tag, 1, 10).await.unwrap().len(), 2);

    let literal_percent = BlogPostFilter { q: Some("100%".into()), ..by_tag.clone() };
    let found = posts.list_blog_posts(&literal_percent, 1, 10).await.unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[0].title.starts_with("100%"));

    let literal_underscore = BlogPostFilter { q: Some("_00".into()), ..by_tag.clone() };
    assert_eq!(posts.count_blog_posts(&literal_underscore).await.unwrap(), 0);

    let by_category = BlogPostFilter { category: Some(cat.slug.clone()), ..Default::default() };
    let filed = posts.list_blog_posts(&by_category, 1, 10).await.unwrap();
    assert_eq!(filed.len(), 1);
    assert_eq!(filed[0].category_id, Some(cat.id));

    let published = BlogPostFilter { published_only: true, ..by_tag };
    assert_eq!(posts.count_blog_posts(&published).await.unwrap(), 1);
}

#[tokio::test]
async fn projects_are_listed_featured_first_then_by_order() {
    let Some(pool) = test_db_pool().await else { return };
    let repo = SqlxProjectRepo::new(pool);
    let marker = unique("proj");

    let older = repo.create_project(&project(&format!("{marker} older"), false, 0, ProjectStatus::Active)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    let newer = repo.create_project(&project(&format!("{marker} newer"), false, 0, ProjectStatus::Active)).await.unwrap();
    let featured = repo.create_project(&project(&format!("{marker} featured"), true, 5, ProjectStatus::Archived)).await.unwrap();
    let later = repo.create_project(&project(&format!("{marker} later"), false, 1, ProjectStatus::Active)).await.unwrap();
    let hidden = repo.create_project(&project(&format!("{marker} draft"), false, 0, ProjectStatus::Draft)).await.unwrap();

    let public = ProjectFilter { status: None, featured: None, include_drafts: false };
    let listed = ids_with_marker(repo.list_projects(&public).await.unwrap(), &marker);
    assert_eq!(listed, vec![featured.id, newer.id, older.id, later.id]);

    let admin = ProjectFilter { include_drafts: true, ..public };
    assert!(ids_with_marker(repo.list_projects(&admin).await.unwrap(), &marker).contains(&hidden.id));

    for id in [older.id, newer.id, featured.id, later.id, hidden.id] {
        repo.delete_project(&id).await.unwrap();
    }
}
