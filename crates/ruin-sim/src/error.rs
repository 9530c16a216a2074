use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ParameterError {
    #[error("win probability must be in (0, 1], got {0}")]
    WinProbability(f64),
    #[error("payout multiplier must be at least 1, got {0}")]
    PayoutMultiplier(f64),
    #[error("base bet must be a positive amount, got {0}")]
    BaseBet(f64),
    #[error("starting money must be a positive amount, got {0}")]
    StartingMoney(f64),
    #[error("goal must be a positive amount, got {0}")]
    Goal(f64),
    #[error("credit limit must be zero or more, got {0}")]
    CreditLimit(f64),
    #[error("max bet must be a positive amount, got {0}")]
    MaxBet(f64),
    #[error("trial count must be at least 1")]
    TrialCount,
}
