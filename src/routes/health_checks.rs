use actix_web::{get, HttpResponse};

#[tracing::instrument(name = "Health check.")]
#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("OK\n")
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/plain")
        .body("404 Not found.\n")
}
