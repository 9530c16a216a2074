use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::params::SimulationParameters;
use crate::tally::{AggregateResult, TrialTally};
use crate::trial::run_trial;

/// Trials per parallel work unit. Each chunk owns one RNG stream.
pub const CHUNK_TRIALS: u64 = 4_096;

/// Runs `count` trials on one thread against the caller's RNG.
pub fn tally_trials<R: Rng + ?Sized>(
    params: &SimulationParameters,
    count: u64,
    rng: &mut R,
) -> TrialTally {
    let mut tally = TrialTally::default();
    for _ in 0..count {
        tally.record(run_trial(params, rng));
    }
    tally
}

/// Runs every trial sequentially with the given randomness handle.
pub fn simulate<R: Rng + ?Sized>(params: &SimulationParameters, rng: &mut R) -> AggregateResult {
    debug_assert!(params.validate().is_ok(), "parameters must be validated by the caller");

    let tally = tally_trials(params, params.trial_count, rng);
    debug!(
        trials = tally.trials(),
        goal_reached = tally.goal_reached,
        ruined = tally.ruined,
        stalled = tally.stalled,
        "sequential simulation finished"
    );
    tally.into_result()
}

/// Splits the trials into fixed-size chunks and runs them on the rayon pool.
///
/// Chunk `i` draws from stream `i` of a ChaCha generator keyed by `seed`, so the tally
/// depends only on `params` and `seed`, never on how many threads ran it.
pub fn tally_parallel(params: &SimulationParameters, seed: u64) -> TrialTally {
    let trial_count = params.trial_count;
    let chunks = trial_count.div_ceil(CHUNK_TRIALS);

    (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(chunk);
            let start = chunk * CHUNK_TRIALS;
            let count = CHUNK_TRIALS.min(trial_count - start);
            tally_trials(params, count, &mut rng)
        })
        .reduce(TrialTally::default, TrialTally::merge)
}

pub fn simulate_parallel(params: &SimulationParameters, seed: u64) -> AggregateResult {
    debug_assert!(params.validate().is_ok(), "parameters must be validated by the caller");

    let tally = tally_parallel(params, seed);
    debug!(
        seed,
        trials = tally.trials(),
        goal_reached = tally.goal_reached,
        ruined = tally.ruined,
        stalled = tally.stalled,
        "parallel simulation finished"
    );
    tally.into_result()
}

/// Seeds a parallel run from the thread-local generator. Returns the seed so the run
/// can be replayed with [`simulate_parallel`].
pub fn simulate_with_entropy(params: &SimulationParameters) -> (u64, AggregateResult) {
    let seed = rand::thread_rng().gen::<u64>();
    (seed, simulate_parallel(params, seed))
}
