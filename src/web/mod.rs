// Route assembly: public catalog and pages, the staff portal, and the
// sitemap, with the media directory served statically.

pub mod auth;
pub mod catalog;
pub mod pages;
pub mod portal;
pub mod sitemap;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::app_state::AppState;

pub fn create_router(state: AppState) -> Router {
    let media_root = state.config.site.media_root.clone();

    Router::new()
        .route("/", get(pages::home_handler))
        .route("/contact", post(pages::contact_handler))
        .route("/gallery", get(pages::gallery_handler))
        .route("/sitemap.xml", get(sitemap::sitemap_handler))
        .route("/communities", get(catalog::community_list_handler))
        .route("/communities/{slug}", get(catalog::community_detail_handler))
        .route(
            "/communities/{slug}/inquire",
            post(catalog::community_inquire_handler),
        )
        .route("/plans", get(catalog::plan_list_handler))
        .route("/plans/{slug}", get(catalog::plan_detail_handler))
        .route("/plans/{slug}/inquire", post(catalog::plan_inquire_handler))
        .route("/homes", get(catalog::home_list_handler))
        .route("/homes/{slug}", get(catalog::home_detail_handler))
        .route("/homes/{slug}/inquire", post(catalog::home_inquire_handler))
        .nest("/portal", portal::router(state.clone()))
        .nest_service("/media", ServeDir::new(media_root))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
