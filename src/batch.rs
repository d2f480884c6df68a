//! Many independent transfer problems in one call.
//!
//! Every request is solved on its own, so one failure never affects its
//! neighbours and results come back in request order.

use crate::config::SolverConfig;
use crate::error::Result;
use crate::solver::{solve_with_config, TransferRequest, TransferSolution};

/// Solve each request sequentially.
pub fn solve_batch(
    requests: &[TransferRequest],
    config: &SolverConfig,
) -> Vec<Result<TransferSolution>> {
    requests
        .iter()
        .map(|request| solve_with_config(request, config))
        .collect()
}

/// Solve each request on the rayon thread pool.
///
/// Same contract as [`solve_batch`]; the solver keeps no shared state, so
/// requests need no coordination.
#[cfg(feature = "parallel")]
pub fn solve_batch_parallel(
    requests: &[TransferRequest],
    config: &SolverConfig,
) -> Vec<Result<TransferSolution>> {
    use rayon::prelude::*;

    requests
        .par_iter()
        .map(|request| solve_with_config(request, config))
        .collect()
}
