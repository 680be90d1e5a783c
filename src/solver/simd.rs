use lazy_static::lazy_static;
use wide::{f64x4, CmpGt};

use crate::escape::smooth;
use crate::solver::{FieldState, Solver};

lazy_static! {
    static ref ZERO: f64x4 = f64x4::splat(0.0);
    static ref TWO: f64x4 = f64x4::splat(2.0);
}

const LANES: usize = 4;

/// Evaluates four points of a column at once.
///
/// Uses the same operation order as [`crate::escape::evaluate`], so results
/// are bit-identical to [`super::ScalarSolver`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SimdSolver;

/// Escape values for up to four points sharing the real part `creal`.
///
/// Lanes past `cimag.len()` are padded with the origin, which never escapes.
fn evaluate4(
    creal: f64,
    cimag: &[f64],
    max_iter: u32,
    horizon: f64,
    log_horizon: f64,
) -> [f64; LANES] {
    let lanes = cimag.len();
    debug_assert!(lanes > 0 && lanes <= LANES);
    let mut re_in = [0.0; LANES];
    let mut im_in = [0.0; LANES];
    re_in[..lanes].fill(creal);
    im_in[..lanes].copy_from_slice(cimag);

    let h = f64x4::splat(horizon);
    let mut cre = f64x4::new(re_in);
    let mut cim = f64x4::new(im_in);
    let mut re = cre;
    let mut im = cim;

    let mut out = [0.0; LANES];
    let mut active = lanes;
    for n in 0..max_iter {
        let mut re2 = re * re;
        let mut im2 = im * im;
        let mag = re2 + im2;
        let escaped = mag.cmp_gt(h);
        if escaped.any() {
            for (k, &m) in mag.to_array().iter().enumerate().take(lanes) {
                if m > horizon {
                    out[k] = smooth(n, m, log_horizon);
                    active -= 1;
                }
            }
            if active == 0 {
                break;
            }
            // park escaped lanes at the origin so they never fire again
            cre = escaped.blend(*ZERO, cre);
            cim = escaped.blend(*ZERO, cim);
            re = escaped.blend(*ZERO, re);
            im = escaped.blend(*ZERO, im);
            re2 = escaped.blend(*ZERO, re2);
            im2 = escaped.blend(*ZERO, im2);
        }
        im = *TWO * re * im + cim;
        re = re2 - im2 + cre;
    }
    out
}

impl Solver<FieldState> for SimdSolver {
    fn solve(&self, mut state: FieldState) -> FieldState {
        let (h, log_h) = (state.horizon.value(), state.horizon.log());
        let ys = state.ys.to_vec();
        for (i, mut column) in state.field.outer_iter_mut().enumerate() {
            let creal = state.xs[i];
            for (j, chunk) in ys.chunks(LANES).enumerate() {
                let values = evaluate4(creal, chunk, state.max_iter, h, log_h);
                for (k, &v) in values.iter().take(chunk.len()).enumerate() {
                    column[j * LANES + k] = v;
                }
            }
        }
        state
    }
}
