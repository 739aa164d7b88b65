use crate::backups::{classify, discovery, metrics, BackupCache};
use crate::configuration::Settings;
use actix_web::{get, web, HttpResponse};

#[tracing::instrument(name = "Backup status summary.", skip_all)]
#[get("/json")]
pub async fn summary_handler(
    settings: web::Data<Settings>,
    cache: web::Data<BackupCache>,
) -> HttpResponse {
    let backups = cache
        .get_or_refresh(|| discovery::find_backups(settings.get_ref()))
        .await;
    let report = classify::classify(
        &backups,
        settings.monitor.warn_age_hours,
        settings.monitor.crit_age_hours,
    );

    let body = match serde_json::to_string_pretty(&report) {
        Ok(body) => body,
        Err(err) => format!(
            "{{\n  \"status\": \"CRITICAL\",\n  \"message\": \"Unable to check backups: {}\"\n}}",
            err
        ),
    };

    HttpResponse::Ok()
        .content_type("application/json")
        .body(body)
}

#[tracing::instrument(name = "Backup metrics.", skip_all)]
#[get("/metrics")]
pub async fn metrics_handler(
    settings: web::Data<Settings>,
    cache: web::Data<BackupCache>,
) -> HttpResponse {
    let backups = cache
        .get_or_refresh(|| discovery::find_backups(settings.get_ref()))
        .await;

    HttpResponse::Ok()
        .content_type("text/plain")
        .body(metrics::render(&backups))
}
