use num::complex::Complex;

pub type C<T> = Complex<T>;

pub fn c(re: f64, im: f64) -> C<f64> {
    Complex::new(re, im)
}

/// Squared magnitude, the quantity compared against the horizon.
pub fn mag2(z: C<f64>) -> f64 {
    z.re * z.re + z.im * z.im
}
