use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "guest@portfolio:~$ welcome",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "blog": "/api/v1/blog/posts",
            "projects": "/api/v1/projects",
            "certifications": "/api/v1/certifications",
            "performance": "/api/v1/performance/tiers",
            "health": "/api/v1/health"
        }
    }))
}
