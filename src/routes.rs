use crate::{
    api::{attendance, department, employee, holiday, leave, overtime, position, salary},
    auth::{handlers, middleware::session_guard},
    config::Config,
};
use actix_governor::{
    governor::middleware::NoOpMiddleware, Governor, GovernorConfigBuilder, PeerIpKeyExtractor,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            )
            .service(web::resource("/session").route(web::get().to(handlers::session)))
            .service(web::resource("/profile").route(web::put().to(handlers::update_profile))),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(session_guard))
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list))
                            .route(web::post().to(employee::create)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get))
                            .route(web::put().to(employee::update))
                            .route(web::delete().to(employee::delete)),
                    ),
            )
            .service(
                web::scope("/departments")
                    .service(
                        web::resource("")
                            .route(web::get().to(department::list))
                            .route(web::post().to(department::create)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(department::get))
                            .route(web::put().to(department::update))
                            .route(web::delete().to(department::delete)),
                    ),
            )
            .service(
                web::scope("/positions")
                    .service(
                        web::resource("")
                            .route(web::get().to(position::list))
                            .route(web::post().to(position::create)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(position::get))
                            .route(web::put().to(position::update))
                            .route(web::delete().to(position::delete)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(web::resource("").route(web::get().to(attendance::list)))
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out").route(web::post().to(attendance::check_out)),
                    )
                    .service(
                        web::resource("/{id}/status")
                            .route(web::put().to(attendance::update_status)),
                    )
                    .service(
                        web::resource("/{id}").route(web::delete().to(attendance::delete)),
                    ),
            )
            .service(
                web::scope("/leave")
                    .service(
                        web::resource("")
                            .route(web::get().to(leave::list))
                            .route(web::post().to(leave::create)),
                    )
                    .service(
                        web::resource("/{id}/status").route(web::put().to(leave::update_status)),
                    )
                    .service(web::resource("/{id}").route(web::delete().to(leave::delete))),
            )
            .service(
                web::scope("/overtime")
                    .service(
                        web::resource("")
                            .route(web::get().to(overtime::list))
                            .route(web::post().to(overtime::create)),
                    )
                    .service(
                        web::resource("/{id}/approve").route(web::put().to(overtime::approve)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(overtime::update))
                            .route(web::delete().to(overtime::delete)),
                    ),
            )
            .service(
                web::scope("/holidays")
                    .service(
                        web::resource("")
                            .route(web::get().to(holiday::list))
                            .route(web::post().to(holiday::create)),
                    )
                    .service(web::resource("/check").route(web::get().to(holiday::check)))
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(holiday::update))
                            .route(web::delete().to(holiday::delete)),
                    ),
            )
            .service(
                web::scope("/salaries")
                    .service(
                        web::resource("")
                            .route(web::get().to(salary::list))
                            .route(web::post().to(salary::create)),
                    )
                    .service(
                        web::resource("/{id}/pay").route(web::put().to(salary::mark_as_paid)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(salary::get))
                            .route(web::put().to(salary::update))
                            .route(web::delete().to(salary::delete)),
                    ),
            ),
    );
}
