use axum::{
    routing::post,
    Router,
    extract::{Json, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use tower_http::cors::{CorsLayer, Any};
use tracing::{info, warn};

use crate::api::models::ScrapeRequest;
use crate::error::ScrapeError;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/scrape", post(scrape_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn scrape_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected scrape request body");
            return ScrapeError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
                .into_response();
        }
    };

    let start_time = std::time::Instant::now();
    let result = state.extractor.extract(&req).await;
    let elapsed = start_time.elapsed();

    match result {
        Ok(scraped) => {
            info!(
                url = %req.url,
                headings = scraped.headings.len(),
                paragraphs = scraped.paragraphs.len(),
                links = scraped.links.len(),
                images = scraped.images.len(),
                ?elapsed,
                "scrape succeeded"
            );
            Json(scraped).into_response()
        }
        Err(err) => {
            warn!(
                url = %req.url,
                kind = err.kind(),
                status = err.status().as_u16(),
                error = %err,
                ?elapsed,
                "scrape failed"
            );
            err.into_response()
        }
    }
}
