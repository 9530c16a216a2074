use crate::trial::TrialOutcome;

/// Estimated probabilities for one run. `loss_probability` covers both ruin and stalls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateResult {
    pub win_probability: f64,
    pub loss_probability: f64,
}

/// Outcome counts over a set of trials. Merging is associative and commutative, so
/// partial tallies from any number of workers can be summed in any order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrialTally {
    pub goal_reached: u64,
    pub ruined: u64,
    pub stalled: u64,
}

impl TrialTally {
    pub fn record(&mut self, outcome: TrialOutcome) {
        match outcome {
            TrialOutcome::GoalReached => self.goal_reached += 1,
            TrialOutcome::Ruined => self.ruined += 1,
            TrialOutcome::Stalled => self.stalled += 1,
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            goal_reached: self.goal_reached + other.goal_reached,
            ruined: self.ruined + other.ruined,
            stalled: self.stalled + other.stalled,
        }
    }

    pub fn trials(&self) -> u64 {
        self.goal_reached + self.ruined + self.stalled
    }

    pub fn wins(&self) -> u64 {
        self.goal_reached
    }

    pub fn losses(&self) -> u64 {
        self.ruined + self.stalled
    }

    /// Converts counts to probabilities. An empty tally reports a certain loss.
    pub fn into_result(self) -> AggregateResult {
        let trials = self.trials();
        if trials == 0 {
            return AggregateResult {
                win_probability: 0.0,
                loss_probability: 1.0,
            };
        }

        let win_probability = self.wins() as f64 / trials as f64;
        // 1 - x is exact enough that the pair always sums to exactly 1.0
        AggregateResult {
            win_probability,
            loss_probability: 1.0 - win_probability,
        }
    }
}
