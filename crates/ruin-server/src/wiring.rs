use api::ApiConfig;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::Config;

pub fn build_app(config: &Config) -> Router {
    let api_config = ApiConfig {
        max_simulations: config.max_simulations,
    };

    api::app(api_config)
        .route("/health", get(healthcheck))
        .layer(TraceLayer::new_for_http())
}

async fn healthcheck() -> &'static str {
    "ok"
}
