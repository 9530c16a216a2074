use ruin_sim::{AggregateResult, SimulationParameters};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::ApiConfig;

pub const DEFAULT_NUM_SIMULATIONS: u64 = 10_000;
pub const MIN_NUM_SIMULATIONS: u64 = 100;

/// Body of `POST /simulate`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationRequest {
    pub p: f64,
    pub q: f64,
    pub bet: f64,
    pub starting_money: f64,
    pub goal: f64,
    #[serde(default)]
    pub k: Option<f64>,
    #[serde(default)]
    pub max_bet: Option<f64>,
    #[serde(default)]
    pub num_simulations: Option<u64>,
    /// Replays an earlier run when set.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulationRequest {
    pub fn to_parameters(&self, config: &ApiConfig) -> Result<SimulationParameters, ApiError> {
        let trial_count = self.num_simulations.unwrap_or(DEFAULT_NUM_SIMULATIONS);
        if trial_count < MIN_NUM_SIMULATIONS {
            return Err(ApiError::TooFewSimulations {
                requested: trial_count,
                minimum: MIN_NUM_SIMULATIONS,
            });
        }
        if trial_count > config.max_simulations {
            return Err(ApiError::TooManySimulations {
                requested: trial_count,
                maximum: config.max_simulations,
            });
        }

        let params = SimulationParameters {
            win_probability: self.p,
            payout_multiplier: self.q,
            base_bet: self.bet,
            starting_money: self.starting_money,
            goal: self.goal,
            credit_limit: self.k.unwrap_or(0.0),
            max_bet: self.max_bet,
            trial_count,
        };
        params.validate()?;

        Ok(params)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SimulationResponse {
    pub win_probability: f64,
    pub loss_probability: f64,
}

impl From<AggregateResult> for SimulationResponse {
    fn from(result: AggregateResult) -> Self {
        Self {
            win_probability: result.win_probability,
            loss_probability: result.loss_probability,
        }
    }
}
