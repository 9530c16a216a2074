use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ruin_sim::ParameterError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidParameter(#[from] ParameterError),
    #[error("num_simulations must be at least {minimum}, got {requested}")]
    TooFewSimulations { requested: u64, minimum: u64 },
    #[error("num_simulations must be at most {maximum}, got {requested}")]
    TooManySimulations { requested: u64, maximum: u64 },
    #[error("simulation task failed")]
    SimulationFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidParameter(_)
            | Self::TooFewSimulations { .. }
            | Self::TooManySimulations { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::SimulationFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::SimulationFailed => "simulation_failed",
            _ => "invalid_parameter",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
