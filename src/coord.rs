use ndarray::Array1;
use num::{traits::NumOps, Num, One};

use crate::complex::{c, mag2, C};
use crate::error::{Error, Result};
use crate::escape::Horizon;

trait Two {
    fn two() -> Self;
}

impl<T> Two for T
where
    T: One + NumOps,
{
    fn two() -> Self {
        T::one() + T::one()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Axis<T> {
    pub min: T,
    pub max: T,
}

impl<T> Axis<T>
where
    T: Num + Copy,
{
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn length(&self) -> T {
        self.max - self.min
    }

    pub fn center(&self) -> T {
        (self.max + self.min) / T::two()
    }
}

impl Axis<f64> {
    /// `n` evenly spaced samples over `[min, max]`, both endpoints included.
    ///
    /// Sample `k` is `min + k * step`; the last sample is pinned to `max` so
    /// rounding in the step never moves the far edge.
    pub fn linspace(&self, n: usize) -> Array1<f64> {
        if n <= 1 {
            return Array1::from_elem(n, self.min);
        }
        let step = self.length() / (n - 1) as f64;
        let mut v = Array1::from_shape_fn(n, |k| k as f64 * step + self.min);
        v[n - 1] = self.max;
        v
    }

    fn validate(&self, name: char) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(Error::NonFiniteBound { axis: name });
        }
        if self.min >= self.max {
            return Err(Error::InvertedBounds {
                axis: name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// A rectangular region of the complex plane.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<T> {
    pub x: Axis<T>,
    pub y: Axis<T>,
}

impl<T> Frame<T>
where
    T: Num + Copy,
{
    pub fn new(x: Axis<T>, y: Axis<T>) -> Self {
        Self { x, y }
    }

    pub fn from_nums(x1: T, x2: T, y1: T, y2: T) -> Self {
        Self::new(Axis::new(x1, x2), Axis::new(y1, y2))
    }

    pub fn from_box(center_x: T, center_y: T, width: T, height: T) -> Self {
        let x1 = center_x - (width / T::two());
        let x2 = center_x + (width / T::two());
        let y1 = center_y - (height / T::two());
        let y2 = center_y + (height / T::two());
        Self::from_nums(x1, x2, y1, y2)
    }

    /// Square region `center ± range` on both axes.
    pub fn around(center_x: T, center_y: T, range: T) -> Self {
        Self::from_nums(
            center_x - range,
            center_x + range,
            center_y - range,
            center_y + range,
        )
    }

    pub fn aspect_ratio(&self) -> T {
        self.x.length() / self.y.length()
    }
}

impl Frame<f64> {
    pub fn corners(&self) -> [C<f64>; 4] {
        [
            c(self.x.min, self.y.min),
            c(self.x.min, self.y.max),
            c(self.x.max, self.y.min),
            c(self.x.max, self.y.max),
        ]
    }

    /// Check the bounds are finite, ordered, and that every point of the
    /// frame starts safely inside `horizon`, see [`Horizon::contains`].
    pub fn validate(&self, horizon: &Horizon) -> Result<()> {
        self.x.validate('x')?;
        self.y.validate('y')?;
        let radius = self
            .corners()
            .iter()
            .map(|&corner| mag2(corner))
            .fold(0.0, f64::max);
        if !horizon.contains(radius) {
            return Err(Error::OutsideHorizon { radius });
        }
        Ok(())
    }

    /// Coordinate axes for a `width` x `height` lattice over this frame.
    pub fn axes(&self, width: usize, height: usize) -> (Array1<f64>, Array1<f64>) {
        (self.x.linspace(width), self.y.linspace(height))
    }
}

impl Default for Frame<f64> {
    fn default() -> Self {
        Self::new(Axis::new(-2.0, 1.0), Axis::new(-1.5, 1.5))
    }
}
