pub mod error;
pub mod request;
pub mod routes;
pub mod state;

use axum::Router;

pub use error::ApiError;
pub use request::{SimulationRequest, SimulationResponse};
pub use state::{ApiConfig, AppState};

pub fn app(config: ApiConfig) -> Router {
    routes::router(AppState::new(config))
}
