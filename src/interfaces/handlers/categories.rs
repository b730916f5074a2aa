use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::blog_category::{NewBlogCategoryRequest, UpdateBlogCategoryRequest},
    errors::AppError,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_active_categories(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let categories = state.category_handler.list_categories(true).await?;
    Ok(HttpResponse::Ok().json(categories))
}

#[instrument(skip(state))]
pub async fn get_category_by_slug(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let category = state.category_handler.get_category_by_slug(&slug).await?;
    if !category.is_active {
        return Err(AppError::NotFound("Category not found".into()));
    }
    Ok(HttpResponse::Ok().json(category))
}

#[instrument(skip(_claims, state))]
pub async fn admin_list_categories(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let categories = state.category_handler.list_categories(false).await?;
    Ok(HttpResponse::Ok().json(categories))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_category(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewBlogCategoryRequest>,
) -> Result<impl Responder, AppError> {
    let category = state.category_handler.create_category(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(category))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_category(
    _claims: AdminClaims,
    category_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateBlogCategoryRequest>,
) -> Result<impl Responder, AppError> {
    let category = state.category_handler
        .update_category(&category_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(category))
}

#[instrument(skip(_claims, state))]
pub async fn delete_category(
    _claims: AdminClaims,
    category_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.category_handler.delete_category(&category_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
