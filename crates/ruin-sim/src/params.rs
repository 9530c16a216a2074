use crate::error::ParameterError;

/// Inputs for one simulation run. Held immutable for the duration of the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    /// Probability that a single bet wins, in `(0, 1]`.
    pub win_probability: f64,
    /// Stake multiplier paid on a win. Net winnings are `stake * (q - 1)`.
    pub payout_multiplier: f64,
    pub base_bet: f64,
    pub starting_money: f64,
    pub goal: f64,
    /// Credit available to each trial, restored only when a new trial starts.
    pub credit_limit: f64,
    pub max_bet: Option<f64>,
    pub trial_count: u64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            win_probability: 0.5,
            payout_multiplier: 2.0,
            base_bet: 1.0,
            starting_money: 10.0,
            goal: 20.0,
            credit_limit: 0.0,
            max_bet: None,
            trial_count: 10_000,
        }
    }
}

impl SimulationParameters {
    /// Checks every input constraint. The simulator itself assumes this already passed.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let p = self.win_probability;
        if !p.is_finite() || p <= 0.0 || p > 1.0 {
            return Err(ParameterError::WinProbability(p));
        }
        if !self.payout_multiplier.is_finite() || self.payout_multiplier < 1.0 {
            return Err(ParameterError::PayoutMultiplier(self.payout_multiplier));
        }
        if !is_positive(self.base_bet) {
            return Err(ParameterError::BaseBet(self.base_bet));
        }
        if !is_positive(self.starting_money) {
            return Err(ParameterError::StartingMoney(self.starting_money));
        }
        if !is_positive(self.goal) {
            return Err(ParameterError::Goal(self.goal));
        }
        if !self.credit_limit.is_finite() || self.credit_limit < 0.0 {
            return Err(ParameterError::CreditLimit(self.credit_limit));
        }
        if let Some(max_bet) = self.max_bet {
            if !is_positive(max_bet) {
                return Err(ParameterError::MaxBet(max_bet));
            }
        }
        if self.trial_count == 0 {
            return Err(ParameterError::TrialCount);
        }

        Ok(())
    }

    /// Largest stake a trial can ever place, when one exists. With `p = 1` the streak
    /// never grows; otherwise only `max_bet` bounds it.
    pub(crate) fn bet_ceiling(&self) -> Option<f64> {
        if self.win_probability >= 1.0 {
            Some(self.max_bet.map_or(self.base_bet, |cap| self.base_bet.min(cap)))
        } else {
            self.max_bet
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
