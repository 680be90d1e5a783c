use ndarray::Zip;

use crate::escape::evaluate;
use crate::solver::{FieldState, Solver};

/// Evaluates one cell at a time.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarSolver;

impl Solver<FieldState> for ScalarSolver {
    fn solve(&self, mut state: FieldState) -> FieldState {
        let (h, log_h) = (state.horizon.value(), state.horizon.log());
        let max_iter = state.max_iter;
        let xs = &state.xs;
        let ys = &state.ys;
        Zip::indexed(&mut state.field).for_each(|(i, j), v| {
            *v = evaluate(xs[i], ys[j], max_iter, h, log_h);
        });
        state
    }
}
