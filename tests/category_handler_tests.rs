use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;
use serde_json::json;
use uuid::Uuid;

use terminal_portfolio::{
    entities::blog_category::{BlogCategory, BlogCategoryChanges, BlogCategoryInsert, NewBlogCategoryRequest, UpdateBlogCategoryRequest},
    errors::AppError,
    repositories::category::CategoryRepository,
    use_cases::category::CategoryHandler,
};

mock! {
    pub CategoryRepo {}

    #[async_trait]
    impl CategoryRepository for CategoryRepo {
        async fn create_category(&self, category: &BlogCategoryInsert) -> Result<BlogCategory, AppError>;
        async fn get_category_by_id(&self, id: &Uuid) -> Result<BlogCategory, AppError>;
        async fn get_category_by_slug(&self, slug: &str) -> Result<BlogCategory, AppError>;
        async fn update_category(&self, id: &Uuid, changes: &BlogCategoryChanges) -> Result<BlogCategory, AppError>;
        async fn delete_category(&self, id: &Uuid) -> Result<(), AppError>;
        async fn list_categories(&self, active_only: bool) -> Result<Vec<BlogCategory>, AppError>;
        async fn category_exists_with_slug(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError>;
        async fn count_categories(&self) -> Result<i64, AppError>;
    }
}

fn category(id: Uuid, name: &str, slug: &str) -> BlogCategory {
    BlogCategory {
        id,
        name: name.into(),
        slug: slug.into(),
        icon: None,
        display_order: 0,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn create_derives_slug_from_name() {
    let mut repo = MockCategoryRepo::new();
    repo.expect_category_exists_with_slug()
        .withf(|slug, exclude| slug == "systems-programming" && exclude.is_none())
        .returning(|_, _| Ok(false));
    repo.expect_create_category()
        .withf(|insert| insert.slug == "systems-programming" && insert.is_active)
        .returning(|insert| Ok(category(Uuid::new_v4(), &insert.name, &insert.slug)));

    let request: NewBlogCategoryRequest = serde_json::from_value(json!({"name": "Systems Programming"})).unwrap();
    let created = CategoryHandler::new(repo).create_category(request).await.unwrap();

    assert_eq!(created.slug, "systems-programming");
}

#[tokio::test]
async fn create_rejects_duplicate_slug() {
    let mut repo = MockCategoryRepo::new();
    repo.expect_category_exists_with_slug().returning(|_, _| Ok(true));
    repo.expect_create_category().never();

    let request: NewBlogCategoryRequest =
        serde_json::from_value(json!({"name": "Rust", "slug": "rust-lang"})).unwrap();
    let result = CategoryHandler::new(repo).create_category(request).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn rename_without_slug_keeps_slug() {
    let id = Uuid::new_v4();
    let mut repo = MockCategoryRepo::new();
    repo.expect_get_category_by_id().returning(|id| Ok(category(*id, "Hardware", "hardware")));
    repo.expect_category_exists_with_slug().never();
    repo.expect_update_category()
        .withf(|_, changes| changes.name.as_deref() == Some("Embedded") && changes.slug.is_none())
        .returning(|id, _| Ok(category(*id, "Embedded", "hardware")));

    let patch: UpdateBlogCategoryRequest = serde_json::from_value(json!({"name": "  Embedded "})).unwrap();
    let updated = CategoryHandler::new(repo).update_category(&id.to_string(), patch).await.unwrap();

    assert_eq!(updated.slug, "hardware");
}

#[tokio::test]
async fn slug_change_is_checked_against_other_categories() {
    let id = Uuid::new_v4();
    let mut repo = MockCategoryRepo::new();
    repo.expect_get_category_by_id().returning(|id| Ok(category(*id, "Ops", "ops")));
    repo.expect_category_exists_with_slug()
        .withf(move |slug, exclude| slug == "devops" && *exclude == Some(id))
        .returning(|_, _| Ok(true));
    repo.expect_update_category().never();

    let patch: UpdateBlogCategoryRequest = serde_json::from_value(json!({"slug": "devops"})).unwrap();
    let result = CategoryHandler::new(repo).update_category(&id.to_string(), patch).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn negative_display_order_is_rejected() {
    let mut repo = MockCategoryRepo::new();
    repo.expect_get_category_by_id().returning(|id| Ok(category(*id, "Ops", "ops")));
    repo.expect_update_category().never();

    let patch: UpdateBlogCategoryRequest = serde_json::from_value(json!({"display_order": -1})).unwrap();
    let result = CategoryHandler::new(repo)
        .update_category(&Uuid::new_v4().to_string(), patch)
        .await;

    match result {
        Err(AppError::ValidationError(errors)) => assert_eq!(errors[0].field, "display_order"),
        _ => panic!("expected validation error"),
    }
}

#[tokio::test]
async fn empty_slug_is_regenerated_from_the_new_name() {
    let id = Uuid::new_v4();
    let mut repo = MockCategoryRepo::new();
    repo.expect_get_category_by_id().returning(|id| Ok(category(*id, "Ops", "ops")));
    repo.expect_category_exists_with_slug()
        .withf(|slug, _| slug == "platform-engineering")
        .returning(|_, _| Ok(false));
    repo.expect_update_category()
        .withf(|_, changes| changes.slug.as_deref() == Some("platform-engineering"))
        .returning(|id, changes| {
            Ok(category(*id, "Platform Engineering", changes.slug.as_deref().unwrap_or_default()))
        });

    let patch: UpdateBlogCategoryRequest =
        serde_json::from_value(json!({"name": "Platform Engineering", "slug": ""})).unwrap();
    let updated = CategoryHandler::new(repo).update_category(&id.to_string(), patch).await.unwrap();

    assert_eq!(updated.slug, "platform-engineering");
}

#[tokio::test]
async fn create_with_empty_slug_uses_the_name() {
    let mut repo = MockCategoryRepo::new();
    repo.expect_category_exists_with_slug().returning(|_, _| Ok(false));
    repo.expect_create_category()
        .withf(|insert| insert.slug == "game-dev" && insert.name == "Game Dev")
        .returning(|insert| Ok(category(Uuid::new_v4(), &insert.name, &insert.slug)));

    let request: NewBlogCategoryRequest =
        serde_json::from_value(json!({"name": " Game Dev ", "slug": ""})).unwrap();
    let created = CategoryHandler::new(repo).create_category(request).await.unwrap();

    assert_eq!(created.slug, "game-dev");
}
