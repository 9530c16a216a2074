//! Monte Carlo estimator for a generalized gambler's ruin.
//!
//! A bettor starts each trial with fixed cash and an optional line of credit, sizes each
//! bet as `base_bet * (1/p)^streak` (optionally capped), and plays until the bankroll
//! reaches the goal, hits zero, or can no longer cover the required bet.

mod error;
mod params;
mod simulate;
mod tally;
mod trial;

pub use error::ParameterError;
pub use params::SimulationParameters;
pub use simulate::{
    simulate, simulate_parallel, simulate_with_entropy, tally_parallel, tally_trials,
    CHUNK_TRIALS,
};
pub use tally::{AggregateResult, TrialTally};
pub use trial::{run_trial, Step, TrialOutcome, TrialState};
