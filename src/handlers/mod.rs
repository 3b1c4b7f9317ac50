pub mod auth_handlers;
pub mod dish_handlers;
pub mod ws;

use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};

/// CSRF protection for the JSON API mutation endpoints.
///
/// Rejects POST/PUT/DELETE requests that don't have Content-Type:
/// application/json. Browsers cannot send cross-origin JSON with cookies
/// via simple form POST — the Content-Type check acts as a CSRF guard
/// without requiring tokens. GET requests are exempt (read-only).
async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == actix_web::http::Method::POST
        || method == actix_web::http::Method::PUT
        || method == actix_web::http::Method::DELETE
    {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = serde_json::json!({
                "success": false,
                "message": "Content-Type must be application/json for mutation requests",
            });
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Register the full route table: the JSON API under /api/v1 plus the
/// per-party WebSocket feed.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("/auth/register", web::post().to(auth_handlers::register))
            .route("/auth/login", web::post().to(auth_handlers::login))
            .route("/auth/logout", web::post().to(auth_handlers::logout))
            .route("/auth/me", web::get().to(auth_handlers::me))
            .route("/events/{event}/dishes", web::get().to(dish_handlers::list))
            .route("/events/{event}/dishes", web::post().to(dish_handlers::suggest))
            .route("/events/{event}/dishes", web::delete().to(dish_handlers::reset))
            .route(
                "/events/{event}/dishes/{id}/vote",
                web::post().to(dish_handlers::vote),
            ),
    );
    cfg.route("/ws/{event}", web::get().to(ws::connect));
}
