#![allow(clippy::new_without_default)]
//! Smooth escape-time fields of the Mandelbrot set.
//!
//! [`sample`] maps a rectangle of the complex plane onto a `width` x `height`
//! grid and evaluates every grid point with [`escape::evaluate`]. The result
//! is an [`EscapeField`] where `field[[i, j]]` belongs to `xs[i] + ys[j]*i`
//! and holds either 0 (the point stayed bounded) or a positive, continuous
//! escape value.
use std::time::Instant;

use log::debug;
use ndarray::{Array1, Array2};

use crate::coord::Frame;
use crate::escape::Horizon;
use crate::solver::{FieldState, ScalarSolver, Solver};

pub mod bench;
mod complex;
pub mod coord;
pub mod error;
pub mod escape;
pub mod painter;
pub mod solver;
pub mod threads;

pub use error::{Error, Result};

/// Escape values indexed by `[[x, y]]`.
pub type EscapeField = Array2<f64>;

/// The sampled axes and the escape field computed over them.
#[derive(Clone, Debug)]
pub struct Sample {
    pub xs: Array1<f64>,
    pub ys: Array1<f64>,
    pub field: EscapeField,
}

impl Sample {
    pub fn width(&self) -> usize {
        self.xs.len()
    }

    pub fn height(&self) -> usize {
        self.ys.len()
    }

    pub fn into_parts(self) -> (Array1<f64>, Array1<f64>, EscapeField) {
        (self.xs, self.ys, self.field)
    }
}

/// What to sample: the region and the lattice laid over it.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleConfig {
    pub frame: Frame<f64>,
    pub width: usize,
    pub height: usize,
    pub max_iter: u32,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            frame: Frame::default(),
            width: 720,
            height: 720,
            max_iter: 512,
        }
    }
}

pub struct Sampler {
    solver: Box<dyn Solver<FieldState>>,
    horizon: Horizon,
}

impl Sampler {
    /// A sampler running `S` on `threads` worker threads, or on the calling
    /// thread when `threads` is 0 or 1.
    pub fn new<S>(threads: usize) -> Self
    where
        S: Solver<FieldState> + Default + Clone + Send + 'static,
    {
        let solver: Box<dyn Solver<FieldState>> = if threads <= 1 {
            Box::<S>::default()
        } else {
            Box::new(S::default().threaded(threads))
        };
        Self {
            solver,
            horizon: Horizon::default(),
        }
    }

    pub fn with_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn sample(
        &self,
        frame: &Frame<f64>,
        width: usize,
        height: usize,
        max_iter: u32,
    ) -> Result<Sample> {
        if width == 0 {
            return Err(Error::EmptyAxis { axis: 'x', len: width });
        }
        if height == 0 {
            return Err(Error::EmptyAxis { axis: 'y', len: height });
        }
        if max_iter == 0 {
            return Err(Error::ZeroIterations);
        }
        frame.validate(&self.horizon)?;

        debug!(
            "sampling {}x{} over {:?} with {} iterations",
            width, height, frame, max_iter
        );
        let start = Instant::now();
        let (xs, ys) = frame.axes(width, height);
        let state = FieldState::new(xs, ys, max_iter, self.horizon);
        let (xs, ys, field) = self.solver.solve(state).into_parts();
        debug!("sampled {} cells in {:?}", width * height, start.elapsed());

        Ok(Sample { xs, ys, field })
    }

    pub fn sample_config(&self, config: &SampleConfig) -> Result<Sample> {
        self.sample(&config.frame, config.width, config.height, config.max_iter)
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new::<ScalarSolver>(num_cpus::get_physical())
    }
}

/// Sample the escape field of `[xmin, xmax] x [ymin, ymax]` on a
/// `width` x `height` grid, using all physical cores.
pub fn sample(
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
    width: usize,
    height: usize,
    max_iter: u32,
) -> Result<Sample> {
    sample_frame(&Frame::from_nums(xmin, xmax, ymin, ymax), width, height, max_iter)
}

pub fn sample_frame(
    frame: &Frame<f64>,
    width: usize,
    height: usize,
    max_iter: u32,
) -> Result<Sample> {
    Sampler::default().sample(frame, width, height, max_iter)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::solver::SimdSolver;

    #[test]
    fn test_shape() {
        let s = sample(-2.0, 1.0, -1.5, 1.5, 31, 17, 40).unwrap();
        assert_eq!(s.width(), 31);
        assert_eq!(s.height(), 17);
        assert_eq!(s.field.dim(), (31, 17));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            sample(-2.0, 1.0, -1.5, 1.5, 0, 10, 40),
            Err(Error::EmptyAxis { axis: 'x', .. })
        ));
        assert!(matches!(
            sample(-2.0, 1.0, -1.5, 1.5, 10, 0, 40),
            Err(Error::EmptyAxis { axis: 'y', .. })
        ));
        assert!(matches!(
            sample(-2.0, 1.0, -1.5, 1.5, 10, 10, 0),
            Err(Error::ZeroIterations)
        ));
        assert!(matches!(
            sample(1.0, 1.0, -1.5, 1.5, 10, 10, 10),
            Err(Error::InvertedBounds { axis: 'x', .. })
        ));
    }

    #[test]
    fn test_samplers_agree() {
        let frame = Frame::around(-0.748, 0.1, 0.0014);
        let reference = Sampler::new::<ScalarSolver>(1).sample(&frame, 37, 29, 300).unwrap();
        for sampler in [
            Sampler::new::<ScalarSolver>(4),
            Sampler::new::<SimdSolver>(1),
            Sampler::new::<SimdSolver>(3),
        ] {
            let s = sampler.sample(&frame, 37, 29, 300).unwrap();
            assert_eq!(s.xs, reference.xs);
            assert_eq!(s.ys, reference.ys);
            assert_eq!(s.field, reference.field);
        }
    }

    #[test]
    fn test_sample_config_default() {
        let config = SampleConfig {
            width: 24,
            height: 16,
            ..SampleConfig::default()
        };
        let s = Sampler::new::<ScalarSolver>(2).sample_config(&config).unwrap();
        assert_eq!(s.field.dim(), (24, 16));
        assert_eq!(s.xs[0], -2.0);
        assert_eq!(s.ys[15], 1.5);
    }
}
