use std::time::Instant;

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json,
    Router,
};
use tracing::{info, warn};

use crate::{
    error::ApiError,
    request::{SimulationRequest, SimulationResponse},
    state::AppState,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/styles.css", get(styles))
        .route("/static/app.js", get(script))
        .route("/simulate", post(run_simulation))
        .with_state(state)
}

async fn run_simulation(
    State(state): State<AppState>,
    Json(request): Json<SimulationRequest>,
) -> Result<Json<SimulationResponse>, ApiError> {
    let run_id = state.next_run_id();
    let params = request.to_parameters(state.config()).inspect_err(|err| {
        warn!(run_id, error = %err, "rejected simulation request");
    })?;
    let requested_seed = request.seed;

    let started = Instant::now();
    let (seed, result) = tokio::task::spawn_blocking(move || match requested_seed {
        Some(seed) => (seed, ruin_sim::simulate_parallel(&params, seed)),
        None => ruin_sim::simulate_with_entropy(&params),
    })
    .await
    .map_err(|err| {
        warn!(run_id, error = %err, "simulation task did not complete");
        ApiError::SimulationFailed
    })?;

    info!(
        run_id,
        seed,
        trials = params.trial_count,
        p = params.win_probability,
        q = params.payout_multiplier,
        credit_limit = params.credit_limit,
        max_bet = ?params.max_bet,
        win_probability = result.win_probability,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "simulation completed"
    );

    Ok(Json(result.into()))
}

async fn index() -> Html<&'static str> {
    Html(ui::index_html())
}

async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], ui::styles_css())
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        ui::app_js(),
    )
}
