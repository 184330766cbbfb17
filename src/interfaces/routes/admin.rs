use actix_web::web;

use crate::handlers::{blog_posts, contact, dashboard, projects, testimonials};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(web::resource("/dashboard").route(web::get().to(dashboard::dashboard_stats)))
            .service(
                web::scope("/projects")
                    .service(
                        web::resource("")
                            .route(web::get().to(projects::admin_list_projects))
                            .route(web::post().to(projects::create_project))
                    )
                    .service(
                        web::resource("/{project_id}")
                            .route(web::patch().to(projects::update_project))
                            .route(web::delete().to(projects::delete_project))
                    )
                    .service(
                        web::resource("/{project_id}/featured")
                            .route(web::post().to(projects::toggle_project_featured))
                    )
            )
            .service(
                web::scope("/blog/posts")
                    .service(
                        web::resource("")
                            .route(web::get().to(blog_posts::admin_list_posts))
                            .route(web::post().to(blog_posts::create_post))
                    )
                    .service(
                        web::resource("/{post_id}")
                            .route(web::patch().to(blog_posts::update_post))
                            .route(web::delete().to(blog_posts::delete_post))
                    )
                    .service(web::resource("/{post_id}/publish").route(web::post().to(blog_posts::publish_post)))
                    .service(web::resource("/{post_id}/unpublish").route(web::post().to(blog_posts::unpublish_post)))
                    .service(web::resource("/{post_id}/toggle").route(web::post().to(blog_posts::toggle_post_published)))
            )
            .service(
                web::scope("/testimonials")
                    .service(
                        web::resource("")
                            .route(web::get().to(testimonials::admin_list_testimonials))
                            .route(web::post().to(testimonials::create_testimonial))
                    )
                    .service(
                        web::resource("/{testimonial_id}")
                            .route(web::patch().to(testimonials::update_testimonial))
                            .route(web::delete().to(testimonials::delete_testimonial))
                    )
                    .service(
                        web::resource("/{testimonial_id}/approved")
                            .route(web::post().to(testimonials::toggle_testimonial_approved))
                    )
                    .service(
                        web::resource("/{testimonial_id}/featured")
                            .route(web::post().to(testimonials::toggle_testimonial_featured))
                    )
            )
            .service(
                web::scope("/contacts")
                    .service(web::resource("").route(web::get().to(contact::admin_list_contacts)))
                    .service(web::resource("/{submission_id}").route(web::delete().to(contact::delete_contact)))
                    .service(web::resource("/{submission_id}/status").route(web::post().to(contact::change_contact_status)))
                    .service(web::resource("/{submission_id}/notes").route(web::patch().to(contact::update_contact_notes)))
            )
    );
}
