use rand::Rng;

use crate::params::SimulationParameters;

/// How a trial ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialOutcome {
    GoalReached,
    Ruined,
    /// The required bet exceeded cash plus remaining credit.
    Stalled,
}

impl TrialOutcome {
    pub fn is_win(self) -> bool {
        matches!(self, Self::GoalReached)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Playing(TrialState),
    Finished(TrialOutcome),
}

/// Per-trial bankroll. Owned by a single trial and dropped when it ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialState {
    pub money: f64,
    pub credit_remaining: f64,
    pub losing_streak: u32,
}

impl TrialState {
    pub fn new(params: &SimulationParameters) -> Self {
        Self {
            money: params.starting_money,
            credit_remaining: params.credit_limit,
            losing_streak: 0,
        }
    }

    /// Returns the absorbing outcome this state is in, if any.
    pub fn terminal(&self, params: &SimulationParameters) -> Option<TrialOutcome> {
        if self.money >= params.goal {
            Some(TrialOutcome::GoalReached)
        } else if self.money <= 0.0 {
            Some(TrialOutcome::Ruined)
        } else if self.is_frozen(params) {
            Some(TrialOutcome::Stalled)
        } else {
            None
        }
    }

    /// True when every stake the trial can still place is lost to rounding, so the
    /// bankroll can never move again.
    fn is_frozen(&self, params: &SimulationParameters) -> bool {
        let Some(ceiling) = params.bet_ceiling() else {
            return false;
        };
        if ceiling > self.money {
            return false;
        }

        let win_absorbed = self.money + ceiling * (params.payout_multiplier - 1.0) == self.money;
        let loss_absorbed = self.money - ceiling == self.money;

        win_absorbed && (params.win_probability >= 1.0 || loss_absorbed)
    }

    /// Stake for the next bet before any credit is drawn.
    pub fn bet_size(&self, params: &SimulationParameters) -> f64 {
        let bet =
            params.base_bet * (1.0 / params.win_probability).powf(f64::from(self.losing_streak));

        match params.max_bet {
            Some(max_bet) => bet.min(max_bet),
            None => bet,
        }
    }

    /// Sizes the next bet and borrows whatever shortfall credit can cover.
    ///
    /// Returns `None` when the bet still exceeds the money on hand, which stalls the trial.
    pub fn place_bet(&mut self, params: &SimulationParameters) -> Option<f64> {
        let bet = self.bet_size(params);

        if bet > self.money {
            let loan = (bet - self.money).min(self.credit_remaining);
            self.credit_remaining -= loan;
            self.money += loan;
        }

        (bet <= self.money).then_some(bet)
    }

    /// Settles a placed bet against a uniform draw in `[0, 1)`.
    pub fn resolve(&mut self, params: &SimulationParameters, bet: f64, draw: f64) {
        if draw < params.win_probability {
            self.money += bet * (params.payout_multiplier - 1.0);
            self.losing_streak = 0;
        } else {
            self.money -= bet;
            self.losing_streak = self.losing_streak.saturating_add(1);
        }
    }

    /// Advances one bet using `draw`. The draw is unused when the trial is already
    /// absorbed or stalls before the flip.
    pub fn step(mut self, params: &SimulationParameters, draw: f64) -> Step {
        if let Some(outcome) = self.terminal(params) {
            return Step::Finished(outcome);
        }

        let Some(bet) = self.place_bet(params) else {
            return Step::Finished(TrialOutcome::Stalled);
        };
        self.resolve(params, bet, draw);

        match self.terminal(params) {
            Some(outcome) => Step::Finished(outcome),
            None => Step::Playing(self),
        }
    }
}

/// Plays one trial to completion, drawing from `rng` only for bets that are placed.
pub fn run_trial<R: Rng + ?Sized>(params: &SimulationParameters, rng: &mut R) -> TrialOutcome {
    let mut state = TrialState::new(params);

    loop {
        if let Some(outcome) = state.terminal(params) {
            return outcome;
        }
        let Some(bet) = state.place_bet(params) else {
            return TrialOutcome::Stalled;
        };
        state.resolve(params, bet, rng.gen::<f64>());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::{run_trial, Step, TrialOutcome, TrialState};
    use crate::params::SimulationParameters;

    const WIN: f64 = 0.0;
    const LOSS: f64 = 0.999;

    fn fair_coin() -> SimulationParameters {
        SimulationParameters::default()
    }

    fn run_trial_within(params: SimulationParameters, seed: u64) -> TrialOutcome {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let _ = tx.send(run_trial(&params, &mut rng));
        });

        rx.recv_timeout(Duration::from_secs(5))
            .expect("trial did not finish")
    }

    fn playing(step: Step) -> TrialState {
        match step {
            Step::Playing(state) => state,
            Step::Finished(outcome) => panic!("trial ended early with {outcome:?}"),
        }
    }

    #[test]
    fn new_state_starts_with_full_credit_and_no_streak() {
        let params = SimulationParameters {
            credit_limit: 5.0,
            ..fair_coin()
        };

        let state = TrialState::new(&params);

        assert_eq!(state.money, 10.0);
        assert_eq!(state.credit_remaining, 5.0);
        assert_eq!(state.losing_streak, 0);
    }

    #[test]
    fn win_pays_net_winnings_and_resets_streak() {
        let params = fair_coin();
        let mut state = TrialState::new(&params);
        state.losing_streak = 2;

        let state = playing(state.step(&params, WIN));

        assert_eq!(state.money, 14.0);
        assert_eq!(state.losing_streak, 0);
    }

    #[test]
    fn loss_deducts_stake_and_extends_streak() {
        let params = fair_coin();
        let state = TrialState::new(&params);

        let state = playing(state.step(&params, LOSS));

        assert_eq!(state.money, 9.0);
        assert_eq!(state.losing_streak, 1);
    }

    #[test]
    fn bet_grows_geometrically_with_losing_streak() {
        let params = fair_coin();
        let mut state = TrialState::new(&params);

        state.losing_streak = 3;

        assert_eq!(state.bet_size(&params), 8.0);
    }

    #[test]
    fn max_bet_caps_streak_scaling() {
        let params = SimulationParameters {
            max_bet: Some(5.0),
            ..fair_coin()
        };
        let mut state = TrialState::new(&params);

        state.losing_streak = 3;
        assert_eq!(state.bet_size(&params), 5.0);

        state.losing_streak = u32::MAX;
        assert_eq!(state.bet_size(&params), 5.0);
    }

    #[test]
    fn long_streaks_use_their_full_exponent() {
        let params = SimulationParameters {
            win_probability: 1.0 - 1e-12,
            ..fair_coin()
        };
        let mut state = TrialState::new(&params);
        state.losing_streak = u32::MAX;

        // (1/p)^n is close to exp(n * 1e-12) for p this near one
        let expected = (f64::from(u32::MAX) * 1e-12).exp();
        assert!((state.bet_size(&params) - expected).abs() < 1e-5);
    }

    #[test]
    fn draw_equal_to_win_probability_is_a_loss() {
        let params = fair_coin();
        let state = TrialState::new(&params);

        let state = playing(state.step(&params, 0.5));

        assert_eq!(state.money, 9.0);
    }

    #[test]
    fn credit_covers_shortfall_and_is_not_replenished() {
        let params = SimulationParameters {
            credit_limit: 5.0,
            ..fair_coin()
        };
        let state = TrialState {
            money: 3.0,
            credit_remaining: 5.0,
            losing_streak: 2,
        };

        // bet of 4 needs 1 from credit, then the loss takes all of it
        let state = state.step(&params, LOSS);

        assert_eq!(state, Step::Finished(TrialOutcome::Ruined));

        let mut state = TrialState {
            money: 3.0,
            credit_remaining: 5.0,
            losing_streak: 2,
        };
        assert_eq!(state.place_bet(&params), Some(4.0));
        assert_eq!(state.money, 4.0);
        assert_eq!(state.credit_remaining, 4.0);
    }

    #[test]
    fn stalls_when_bet_exceeds_money_and_credit() {
        let params = SimulationParameters {
            credit_limit: 1.0,
            ..fair_coin()
        };
        let state = TrialState {
            money: 2.0,
            credit_remaining: 1.0,
            losing_streak: 3,
        };

        assert_eq!(
            state.step(&params, WIN),
            Step::Finished(TrialOutcome::Stalled)
        );

        let mut drained = state;
        assert_eq!(drained.place_bet(&params), None);
        assert_eq!(drained.money, 3.0);
        assert_eq!(drained.credit_remaining, 0.0);
    }

    #[test]
    fn reaching_goal_finishes_trial() {
        let params = fair_coin();
        let state = TrialState {
            money: 19.0,
            credit_remaining: 0.0,
            losing_streak: 0,
        };

        assert_eq!(
            state.step(&params, WIN),
            Step::Finished(TrialOutcome::GoalReached)
        );
    }

    #[test]
    fn starting_at_goal_is_an_immediate_win() {
        let params = SimulationParameters {
            starting_money: 25.0,
            ..fair_coin()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert_eq!(run_trial(&params, &mut rng), TrialOutcome::GoalReached);
        assert_eq!(
            TrialState::new(&params).step(&params, LOSS),
            Step::Finished(TrialOutcome::GoalReached)
        );
    }

    #[test]
    fn overflowing_bet_without_cap_stalls() {
        let params = SimulationParameters {
            win_probability: 0.0001,
            credit_limit: 1e12,
            ..fair_coin()
        };
        let mut state = TrialState::new(&params);
        state.losing_streak = 200;

        assert_eq!(state.bet_size(&params), f64::INFINITY);
        assert_eq!(state.place_bet(&params), None);
        assert_eq!(state.credit_remaining, 0.0);
    }

    #[test]
    fn certain_zero_payout_win_stalls_instead_of_looping() {
        let params = SimulationParameters {
            win_probability: 1.0,
            payout_multiplier: 1.0,
            ..fair_coin()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        assert_eq!(run_trial(&params, &mut rng), TrialOutcome::Stalled);
    }

    #[test]
    fn certain_win_with_payout_below_rounding_stalls() {
        let params = SimulationParameters {
            win_probability: 1.0,
            payout_multiplier: 1.0 + f64::EPSILON,
            ..fair_coin()
        };
        assert!(params.validate().is_ok());

        assert_eq!(
            TrialState::new(&params).step(&params, WIN),
            Step::Finished(TrialOutcome::Stalled)
        );
        assert_eq!(run_trial_within(params, 4), TrialOutcome::Stalled);
    }

    #[test]
    fn stakes_below_rounding_of_bankroll_stall() {
        let params = SimulationParameters {
            base_bet: 1e-20,
            max_bet: Some(1e-20),
            ..fair_coin()
        };
        assert!(params.validate().is_ok());

        assert_eq!(
            TrialState::new(&params).step(&params, LOSS),
            Step::Finished(TrialOutcome::Stalled)
        );
        assert_eq!(run_trial_within(params, 5), TrialOutcome::Stalled);
    }

    #[test]
    fn tiny_stake_with_visible_payout_keeps_playing() {
        let params = SimulationParameters {
            payout_multiplier: 1e30,
            base_bet: 1e-20,
            max_bet: Some(1e-20),
            ..fair_coin()
        };
        let state = TrialState::new(&params);

        // a win adds 1e10, a loss is lost to rounding
        assert_eq!(state.terminal(&params), None);
        assert_eq!(
            state.step(&params, WIN),
            Step::Finished(TrialOutcome::GoalReached)
        );
        assert_eq!(run_trial_within(params, 6), TrialOutcome::GoalReached);
    }

    #[test]
    fn money_and_credit_never_go_negative() {
        let params = SimulationParameters {
            win_probability: 0.3,
            payout_multiplier: 2.5,
            credit_limit: 7.5,
            ..fair_coin()
        };
        let draws = [0.9, 0.9, 0.1, 0.9, 0.9, 0.9, 0.2, 0.9, 0.9, 0.9, 0.9];
        let mut step = Step::Playing(TrialState::new(&params));

        for draw in draws {
            let Step::Playing(state) = step else { break };
            assert!(state.money >= 0.0);
            assert!(state.credit_remaining >= 0.0);
            step = state.step(&params, draw);
        }
    }

    #[test]
    fn seeded_trials_are_reproducible() {
        let params = SimulationParameters {
            credit_limit: 5.0,
            ..fair_coin()
        };
        let mut rng_a = ChaCha8Rng::seed_from_u64(42);
        let mut rng_b = ChaCha8Rng::seed_from_u64(42);

        let outcomes_a: Vec<TrialOutcome> =
            (0..200).map(|_| run_trial(&params, &mut rng_a)).collect();
        let outcomes_b: Vec<TrialOutcome> =
            (0..200).map(|_| run_trial(&params, &mut rng_b)).collect();

        assert_eq!(outcomes_a, outcomes_b);
    }
}
