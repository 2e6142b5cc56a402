use actix_web::web;

use super::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(handlers::auth::login)
            .service(handlers::public::news)
            .service(handlers::public::staff)
            .service(handlers::student::grades)
            .service(handlers::student::profile)
            .service(handlers::student::summary)
            .service(handlers::professor::assignments)
            .service(handlers::professor::roster)
            .service(handlers::professor::create_grade)
            .service(handlers::professor::delete_grade)
            .service(handlers::admin::users)
            .service(handlers::admin::classes)
            .service(handlers::admin::students_detailed)
            .service(handlers::admin::create_class)
            .service(handlers::admin::create_user)
            .service(handlers::admin::delete_user),
    );
}
