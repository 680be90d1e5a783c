use std::sync::Arc;

use ndarray::{concatenate, s, Array1, Array2, Axis};

use crate::escape::Horizon;
use crate::threads::{Call, Join, RangeSplitter, Split, WorkerPool};

pub mod scalar;
pub mod simd;

pub use scalar::ScalarSolver;
pub use simd::SimdSolver;

pub trait Solver<T> {
    fn solve(&self, state: T) -> T;

    fn threaded(self, n: usize) -> WorkerPool<T, T>
    where
        Self: Sized + Clone + Send + 'static,
        T: Split + Join + Send + 'static,
    {
        WorkerPool::with(n, || {
            let solver = self.clone();
            move |state| solver.solve(state)
        })
    }
}

impl<T> Solver<T> for WorkerPool<T, T>
where
    T: Split + Join + Send + 'static,
{
    fn solve(&self, state: T) -> T {
        self.call(state)
    }
}

/// A block of columns of the escape field together with everything needed
/// to fill it in.
///
/// `field[[i, j]]` belongs to the point `xs[i] + ys[j]*i`. Splitting cuts
/// along the x axis, so every part shares the full y axis.
#[derive(Clone, Debug)]
pub struct FieldState {
    pub(crate) xs: Array1<f64>,
    pub(crate) ys: Arc<Array1<f64>>,
    pub(crate) field: Array2<f64>,
    pub(crate) max_iter: u32,
    pub(crate) horizon: Horizon,
}

impl FieldState {
    pub fn new(xs: Array1<f64>, ys: Array1<f64>, max_iter: u32, horizon: Horizon) -> Self {
        let field = Array2::zeros((xs.len(), ys.len()));
        Self {
            xs,
            ys: Arc::new(ys),
            field,
            max_iter,
            horizon,
        }
    }

    pub fn width(&self) -> usize {
        self.xs.len()
    }

    pub fn height(&self) -> usize {
        self.ys.len()
    }

    /// Take the axes and the field out of the state.
    pub fn into_parts(self) -> (Array1<f64>, Array1<f64>, Array2<f64>) {
        let ys = Arc::try_unwrap(self.ys).unwrap_or_else(|shared| (*shared).clone());
        (self.xs, ys, self.field)
    }
}

impl Split for FieldState {
    fn split_to_vec(self, n: usize) -> Vec<Self> {
        RangeSplitter::split(0, self.width(), n)
            .into_iter()
            .map(|(m, k)| FieldState {
                xs: self.xs.slice(s![m..k]).to_owned(),
                ys: self.ys.clone(),
                field: self.field.slice(s![m..k, ..]).to_owned(),
                max_iter: self.max_iter,
                horizon: self.horizon,
            })
            .collect()
    }
}

impl Join for FieldState {
    fn join_vec(parts: Vec<Self>) -> Self {
        assert!(!parts.is_empty(), "nothing to join");
        let ys = parts[0].ys.clone();
        let max_iter = parts[0].max_iter;
        let horizon = parts[0].horizon;
        for part in &parts {
            assert!(Arc::ptr_eq(&part.ys, &ys), "parts of different fields");
            assert!(part.max_iter == max_iter, "different iteration budget");
        }
        let xs: Vec<_> = parts.iter().map(|p| p.xs.view()).collect();
        let fields: Vec<_> = parts.iter().map(|p| p.field.view()).collect();
        Self {
            xs: concatenate(Axis(0), &xs).expect("x axes are one-dimensional"),
            ys,
            field: concatenate(Axis(0), &fields).expect("parts share the y axis"),
            max_iter,
            horizon,
        }
    }
}
