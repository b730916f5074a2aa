use actix_web::{get, post, web, HttpRequest, HttpResponse};

use crate::entities::{
    certification::all_certifications,
    dashboard::DashboardResponse,
    token::{AdminLoginRequest, LogoutRequest, RefreshTokenRequest},
};
use crate::errors::AppError;
use crate::use_cases::extractors::AdminClaims;
use crate::utils::get_client_ip::get_client_ip;
use crate::AppState;

/// Retry hint when the limiter gives none.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<AdminLoginRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    let client_ip = get_client_ip(&req, state.trust_forwarded_for);
    let decision = state.login_limiter.check(&client_ip);

    if !decision.allowed {
        tracing::warn!(client_ip = %client_ip, "Admin login rate limited");
        let retry_after = decision.retry_after_secs.unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Err(AppError::RateLimited(retry_after).into());
    }

    let response = state.admin_handler.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("X-RateLimit-Remaining", decision.remaining.to_string()))
        .json(response))
}

#[post("/refresh")]
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    let response = state.admin_handler.refresh_token(&request.refresh_token).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/logout")]
pub async fn logout(
    admin: AdminClaims,
    state: web::Data<AppState>,
    body: Option<web::Json<LogoutRequest>>,
) -> Result<HttpResponse, actix_web::Error> {
    let refresh = body.and_then(|b| b.into_inner().refresh_token);

    state.admin_handler
        .logout(&admin.0, refresh.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({"message": "Logged out successfully"})))
}

#[get("/dashboard")]
pub async fn admin_dashboard(
    _admin: AdminClaims,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (blog, categories, projects) = tokio::try_join!(
        state.blog_handler.blog_stats(),
        state.category_handler.count_categories(),
        state.project_handler.count_by_status(),
    )?;

    Ok(HttpResponse::Ok().json(DashboardResponse {
        blog,
        categories,
        projects,
        certifications: all_certifications().len(),
    }))
}
