use actix_web::web;

use crate::handlers::{admin, blog_posts, categories, projects, system::admin_health_check};

/// Everything under `/admin` lives in one scope; the auth middleware guards
/// all of it except login and refresh.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(admin::login)
            .service(admin::refresh_token)
            .service(admin::logout)
            .service(admin::admin_dashboard)
            .service(admin_health_check)
            .service(
                web::resource("/blog/posts")
                    .route(web::get().to(blog_posts::admin_list_blog_posts))
                    .route(web::post().to(blog_posts::create_blog_post))
            )
            .service(
                web::resource("/blog/posts/{post_id}")
                    .route(web::get().to(blog_posts::get_blog_post_by_id))
                    .route(web::patch().to(blog_posts::update_blog_post))
                    .route(web::delete().to(blog_posts::delete_blog_post))
            )
            .service(
                web::resource("/blog/posts/{post_id}/publish")
                    .route(web::post().to(blog_posts::publish_blog_post))
            )
            .service(
                web::resource("/blog/posts/{post_id}/unpublish")
                    .route(web::post().to(blog_posts::unpublish_blog_post))
            )
            .service(
                web::resource("/blog/preview")
                    .route(web::post().to(blog_posts::preview_content))
            )
            .service(
                web::resource("/blog/categories")
                    .route(web::get().to(categories::admin_list_categories))
                    .route(web::post().to(categories::create_category))
            )
            .service(
                web::resource("/blog/categories/{category_id}")
                    .route(web::patch().to(categories::update_category))
                    .route(web::delete().to(categories::delete_category))
            )
            .service(
                web::resource("/projects")
                    .route(web::get().to(projects::admin_list_projects))
                    .route(web::post().to(projects::create_project))
            )
            .service(
                web::resource("/projects/{project_id}")
                    .route(web::get().to(projects::admin_get_project))
                    .route(web::patch().to(projects::update_project))
                    .route(web::delete().to(projects::delete_project))
            )
    );
}
