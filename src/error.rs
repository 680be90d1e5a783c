use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{axis} axis needs at least one sample, got {len}")]
    EmptyAxis { axis: char, len: usize },
    #[error("{axis} axis bounds are inverted or empty: min {min} >= max {max}")]
    InvertedBounds { axis: char, min: f64, max: f64 },
    #[error("{axis} axis bound is not finite")]
    NonFiniteBound { axis: char },
    #[error("iteration budget must be at least 1")]
    ZeroIterations,
    #[error("region reaches |c|^2 = {radius}, beyond the divergence horizon")]
    OutsideHorizon { radius: f64 },
    #[error("horizon {horizon} too small, ln(horizon) must exceed 1")]
    HorizonTooSmall { horizon: f64 },
    #[error("unknown colormap: {0}")]
    UnknownColormap(String),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}
