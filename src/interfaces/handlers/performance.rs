use actix_web::{get, post, web, HttpResponse, Responder};

use crate::entities::performance::{recommend, tier_presets, PerformanceRequest};

#[get("/tiers")]
pub async fn list_tiers() -> impl Responder {
    HttpResponse::Ok().json(tier_presets())
}

/// Picks a tier from what the browser reports; an explicit override wins.
#[post("/detect")]
pub async fn detect_tier(request: web::Json<PerformanceRequest>) -> impl Responder {
    let recommendation = recommend(&request);
    tracing::debug!(tier = ?recommendation.tier, score = recommendation.score, "Performance tier detected");
    HttpResponse::Ok().json(recommendation)
}
