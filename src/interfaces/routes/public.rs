use actix_web::web;

use crate::handlers::{certifications, performance, projects, system};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(system::health);

    cfg.service(
        web::scope("/projects")
            .service(
                web::resource("")
                    .route(web::get().to(projects::list_projects))
            )
            .service(
                web::resource("/{project_id}")
                    .route(web::get().to(projects::get_project))
            )
    );

    cfg.service(
        web::scope("/certifications")
            .service(certifications::list_certifications)
            .service(certifications::get_certification)
    );

    cfg.service(
        web::scope("/performance")
            .service(performance::list_tiers)
            .service(performance::detect_tier)
    );
}
