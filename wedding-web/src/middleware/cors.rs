use actix_cors::Cors;
use actix_web::http::Method;
use wedding_models::settings::{Cors as WedCors, CorsMode};

pub(crate) fn middleware(cors_config: &WedCors) -> Cors {
    match cors_config.mode {
        CorsMode::AllowAll => Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600),
        CorsMode::Whitelist => {
            let whitelist = &cors_config.whitelist;
            let origins = whitelist.origins.clone();
            let any_origin = origins.iter().any(|o| o == "*");
            let mut cors = Cors::default()
                .allowed_origin_fn(move |origin, _| {
                    any_origin
                        || origin
                            .to_str()
                            .map_or(false, |o| origins.iter().any(|allowed| allowed == o))
                })
                .allowed_methods(
                    whitelist
                        .methods
                        .iter()
                        .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
                        .collect::<Vec<Method>>(),
                )
                .allowed_headers(whitelist.headers.clone())
                .expose_headers(["Content-Disposition", "ETag"])
                .max_age(3600);

            if whitelist.credentials {
                cors = cors.supports_credentials();
            }
            cors
        }
    }
}
