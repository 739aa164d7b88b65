use crate::backups::cache::{BackupCache, CACHE_TTL};
use crate::configuration::Settings;
use crate::routes;
use actix_web::{dev::Server, web, App, HttpServer};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub fn run(listener: TcpListener, settings: Settings) -> Result<Server, std::io::Error> {
    let settings = web::Data::new(settings);
    let cache = web::Data::new(BackupCache::new(CACHE_TTL));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(settings.clone())
            .app_data(cache.clone())
            .service(routes::health_check)
            .service(routes::summary_handler)
            .service(routes::metrics_handler)
            .default_service(web::route().to(routes::not_found))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
