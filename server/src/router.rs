//! Axum router assembly for the Conan v1 read endpoints, with request
//! tracing and CORS layered on the way the teacher's `main.rs` wraps
//! its router.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use conan_index_core::Store;
use conan_index_http::handlers::{
    binary_download_urls_handler, health, package_binary_search_handler, package_info_handler,
    recipe_download_urls_handler, recipe_search_handler, HttpState,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const PKG_SEGMENT: &str = "{name}/{version}/{user}/{channel}";

pub fn build_router(store: Arc<dyn Store>) -> Router {
    let state = HttpState { store };

    Router::new()
        .route("/health", get(health))
        .route(&format!("/v1/conans/{PKG_SEGMENT}/download_urls"), get(recipe_download_urls_handler))
        .route(
            &format!("/v1/conans/{PKG_SEGMENT}/packages/{{hash}}/download_urls"),
            get(binary_download_urls_handler),
        )
        .route(&format!("/v1/conans/{PKG_SEGMENT}/packages/{{hash}}"), get(package_info_handler))
        .route(&format!("/v1/conans/{PKG_SEGMENT}/search"), get(package_binary_search_handler))
        .route("/v1/search", get(recipe_search_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use conan_index_core::adapters::mem_store::InMemoryStore;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_route_returns_ok() {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let app = build_router(store);

        let response =
            app.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn recipe_download_urls_route_matches_conan_v1_shape() {
        let store = InMemoryStore::new();
        for file in conan_index_core::model::RECIPE_MANIFEST {
            store.seed(format!("zlib/1.2.11/_/_/0/export/{file}"), b"x".to_vec());
        }
        let store: Arc<dyn Store> = Arc::new(store);
        let app = build_router(store);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/conans/zlib/1.2.11/_/_/download_urls")
                    .header("host", "localhost")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("content-type").unwrap(), "application/json");
    }
}
