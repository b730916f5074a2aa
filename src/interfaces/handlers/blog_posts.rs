use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    entities::{
        blog_post::{BlogPostFilter, ContentPreviewRequest, NewBlogPostRequest, UpdateBlogPostRequest},
        pagination::PageParams,
    },
    errors::AppError,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub hard_delete: bool,
}

#[instrument(skip(state, filter, page))]
pub async fn list_published_posts(
    state: web::Data<AppState>,
    filter: web::Query<BlogPostFilter>,
    page: web::Query<PageParams>,
) -> Result<impl Responder, AppError> {
    let mut filter = filter.into_inner();
    filter.published_only = true;

    let posts = state.blog_handler
        .list_blog_posts(filter, page.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(posts))
}

#[instrument(skip(state, query))]
pub async fn get_recent_blog_posts(
    state: web::Data<AppState>,
    query: web::Query<RecentQuery>,
) -> Result<impl Responder, AppError> {
    let posts = state.blog_handler.get_recent_blog_posts(query.limit).await?;
    Ok(HttpResponse::Ok().json(posts))
}

#[instrument(skip(state))]
pub async fn view_blog_post(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.view_published_post(&slug).await?;
    Ok(HttpResponse::Ok().json(post))
}

// ───── Admin ─────────────────────────────────────────────────────────

#[instrument(skip(_claims, state, filter, page))]
pub async fn admin_list_blog_posts(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    filter: web::Query<BlogPostFilter>,
    page: web::Query<PageParams>,
) -> Result<impl Responder, AppError> {
    let posts = state.blog_handler
        .list_blog_posts(filter.into_inner(), page.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(posts))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_blog_post(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewBlogPostRequest>
) -> Result<impl Responder, AppError> {
    let response = state.blog_handler
        .create_blog_post(data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(_claims, state))]
pub async fn get_blog_post_by_id(
    _claims: AdminClaims,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.get_blog_post_by_id(&post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_blog_post(
    _claims: AdminClaims,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateBlogPostRequest>,
) -> Result<impl Responder, AppError> {
    let updated_post = state.blog_handler
        .update_blog_post(&post_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated_post))
}

#[instrument(skip(_claims, state))]
pub async fn publish_blog_post(
    _claims: AdminClaims,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let published_post = state.blog_handler.publish_blog_post(&post_id).await?;
    Ok(HttpResponse::Ok().json(published_post))
}

#[instrument(skip(_claims, state))]
pub async fn unpublish_blog_post(
    _claims: AdminClaims,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let post = state.blog_handler.unpublish_blog_post(&post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[instrument(skip(_claims, state))]
pub async fn delete_blog_post(
    _claims: AdminClaims,
    post_id: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<DeleteQuery>,
) -> Result<impl Responder, AppError> {
    state.blog_handler.delete_blog_post(&post_id, query.hard_delete).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(_claims, state, data))]
pub async fn preview_content(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<ContentPreviewRequest>,
) -> Result<impl Responder, AppError> {
    let preview = state.blog_handler.preview_content(data.into_inner())?;
    Ok(HttpResponse::Ok().json(preview))
}
