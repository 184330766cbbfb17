use actix_web::web;

use crate::handlers::{analytics, blog_posts, contact, projects, system::health_check, testimonials};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(
            web::scope("/projects")
                .service(web::resource("").route(web::get().to(projects::list_projects)))
                .service(web::resource("/featured").route(web::get().to(projects::list_featured_projects)))
                .service(web::resource("/{project_id}").route(web::get().to(projects::get_project)))
        )
        .service(
            web::scope("/blog/posts")
                .service(web::resource("").route(web::get().to(blog_posts::list_published_posts)))
                .service(web::resource("/{slug}").route(web::get().to(blog_posts::get_post_by_slug)))
        )
        .service(web::resource("/testimonials").route(web::get().to(testimonials::list_carousel)))
        .service(web::resource("/contact").route(web::post().to(contact::submit_contact_form)))
        .service(web::resource("/analytics/events").route(web::post().to(analytics::record_event)));
}
