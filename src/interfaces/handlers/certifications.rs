use actix_web::{get, web, HttpResponse, Responder};
use serde::Deserialize;

use crate::{
    entities::certification::{all_certifications, certifications_with_skill, find_certification},
    errors::AppError,
};

#[derive(Debug, Deserialize)]
pub struct SkillQuery {
    pub skill: Option<String>,
}

#[get("")]
pub async fn list_certifications(query: web::Query<SkillQuery>) -> impl Responder {
    let certs = match query.skill.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(skill) => certifications_with_skill(skill),
        None => all_certifications(),
    };
    HttpResponse::Ok().json(certs)
}

#[get("/{slug}")]
pub async fn get_certification(slug: web::Path<String>) -> Result<HttpResponse, AppError> {
    find_certification(&slug)
        .map(|cert| HttpResponse::Ok().json(cert))
        .ok_or_else(|| AppError::NotFound("Certification not found".into()))
}
