use actix_web::web;

use crate::handlers::{blog_posts, categories};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/blog")
            .service(
                web::resource("/posts")
                    .route(web::get().to(blog_posts::list_published_posts))
            )
            .service(
                web::resource("/posts/recent")
                    .route(web::get().to(blog_posts::get_recent_blog_posts))
            )
            .service(
                web::resource("/posts/{slug}")
                    .route(web::get().to(blog_posts::view_blog_post))
            )
            .service(
                web::resource("/categories")
                    .route(web::get().to(categories::list_active_categories))
            )
            .service(
                web::resource("/categories/{slug}")
                    .route(web::get().to(categories::get_category_by_slug))
            )
    );
}
