use crate::state::Services;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "OK",
        "message": "Bakehouse backend is running",
    }))
}

async fn root() -> &'static str {
    "Bakehouse backend"
}

pub fn router(services: Services, cors_origins: &[String]) -> Router {
    let shop = services.ordering;
    let back_office = services.admin;

    let api = Router::new()
        .nest("/auth", auth::rest::router(services.login))
        .nest("/products", ordering::rest::products::router(shop.clone()))
        .nest("/categories", ordering::rest::categories::router(shop.clone()))
        .nest("/orders", ordering::rest::orders::router(shop.clone()))
        .nest("/addresses", ordering::rest::addresses::router(shop.clone()))
        .nest("/coupons", ordering::rest::coupons::router(shop.clone()))
        .nest(
            "/delivery-pincodes",
            ordering::rest::pincodes::router(shop.clone()),
        )
        .nest("/payments", ordering::rest::payments::router(shop))
        .nest("/banners", admin::rest::banners::router(back_office.clone()))
        .nest("/admin", admin::rest::console::router(back_office.clone()))
        .nest("/upload", admin::rest::upload::router(back_office))
        .route("/health", get(health));

    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    Router::new()
        .route("/", get(root))
        .nest("/api", api)
        .layer(services.auth_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
