use std::fmt;
use std::str::FromStr;

use image::{Rgb, RgbImage};

use crate::error::Error;
use crate::EscapeField;

pub trait ColorScale {
    /// Color for a normalized value in `[0, 1]`.
    fn color(&self, frac: f64) -> Rgb<u8>;
}

pub trait Painter {
    fn paint(&self, field: &EscapeField) -> RgbImage;
}

const JET: &[[u8; 3]] = &[
    [0x00, 0x00, 0x80],
    [0x00, 0x00, 0xff],
    [0x00, 0x80, 0xff],
    [0x00, 0xff, 0xff],
    [0x80, 0xff, 0x80],
    [0xff, 0xff, 0x00],
    [0xff, 0x80, 0x00],
    [0xff, 0x00, 0x00],
    [0x80, 0x00, 0x00],
];

const INFERNO: &[[u8; 3]] = &[
    [0x00, 0x00, 0x04],
    [0x28, 0x0b, 0x54],
    [0x65, 0x15, 0x6e],
    [0x9f, 0x2a, 0x63],
    [0xd4, 0x48, 0x42],
    [0xf5, 0x7d, 0x15],
    [0xfa, 0xc1, 0x27],
    [0xfc, 0xff, 0xa4],
];

const RAINBOW: &[[u8; 3]] = &[
    [0xbe, 0x0a, 0xff],
    [0x58, 0x0a, 0xff],
    [0x14, 0x7d, 0xf5],
    [0x0a, 0xef, 0xff],
    [0x0a, 0xff, 0x99],
    [0xa1, 0xff, 0x0a],
    [0xde, 0xff, 0x0a],
    [0xff, 0xd3, 0x00],
    [0xff, 0x87, 0x00],
    [0xff, 0x00, 0x00],
];

const GREYSCALE: &[[u8; 3]] = &[[0xff, 0xff, 0xff], [0x00, 0x00, 0x00]];

fn mix(a: u8, b: u8, frac: f64) -> u8 {
    let af = a as f64;
    let bf = b as f64;
    let m = af * (1.0 - frac) + bf * frac;
    f64::round(m) as u8
}

/// Piecewise linear interpolation between evenly spaced color stops.
fn gradient(stops: &[[u8; 3]], frac: f64) -> Rgb<u8> {
    let last = stops.len() - 1;
    let pos = frac.clamp(0.0, 1.0) * last as f64;
    let n = (pos.floor() as usize).min(last - 1);
    let frac = pos - n as f64;
    let (rgb1, rgb2) = (stops[n], stops[n + 1]);
    Rgb([
        mix(rgb1[0], rgb2[0], frac),
        mix(rgb1[1], rgb2[1], frac),
        mix(rgb1[2], rgb2[2], frac),
    ])
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Colormap {
    Jet,
    Inferno,
    Rainbow,
    Greyscale,
}

impl Colormap {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jet => "jet",
            Self::Inferno => "inferno",
            Self::Rainbow => "rainbow",
            Self::Greyscale => "greyscale",
        }
    }

    fn stops(&self) -> &'static [[u8; 3]] {
        match self {
            Self::Jet => JET,
            Self::Inferno => INFERNO,
            Self::Rainbow => RAINBOW,
            Self::Greyscale => GREYSCALE,
        }
    }
}

impl ColorScale for Colormap {
    fn color(&self, frac: f64) -> Rgb<u8> {
        gradient(self.stops(), frac)
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Colormap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jet" => Ok(Self::Jet),
            "inferno" => Ok(Self::Inferno),
            "rainbow" => Ok(Self::Rainbow),
            "greyscale" | "grayscale" | "grey" | "gray" => Ok(Self::Greyscale),
            _ => Err(Error::UnknownColormap(s.to_string())),
        }
    }
}

/// Paints nonzero escape values through a power-law normalization
/// `((v - vmin) / (vmax - vmin))^gamma`, where the range is taken over the
/// nonzero cells only. Zero cells did not escape and get `interior`.
///
/// The field is drawn transposed with the origin at the lower left, so
/// `field[[i, j]]` lands in column `i`, row `height - 1 - j`.
pub struct PowerNormPainter<C> {
    color: C,
    gamma: f64,
    interior: Rgb<u8>,
}

impl<C> PowerNormPainter<C>
where
    C: ColorScale,
{
    pub fn new(color: C, gamma: f64) -> Self {
        Self {
            color,
            gamma,
            interior: Rgb([0, 0, 0]),
        }
    }

    pub fn with_interior(mut self, interior: Rgb<u8>) -> Self {
        self.interior = interior;
        self
    }

    /// Smallest and largest nonzero value, if any cell escaped.
    fn range(field: &EscapeField) -> Option<(f64, f64)> {
        field
            .iter()
            .filter(|&&v| v != 0.0)
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    fn normalize(&self, v: f64, vmin: f64, vmax: f64) -> f64 {
        if vmax > vmin {
            ((v - vmin) / (vmax - vmin)).powf(self.gamma)
        } else {
            0.0
        }
    }
}

impl<C> Painter for PowerNormPainter<C>
where
    C: ColorScale,
{
    fn paint(&self, field: &EscapeField) -> RgbImage {
        let (width, height) = field.dim();
        let mut img = RgbImage::new(width as u32, height as u32);
        let (vmin, vmax) = Self::range(field).unwrap_or((0.0, 0.0));
        for ((i, j), &v) in field.indexed_iter() {
            let color = if v == 0.0 {
                self.interior
            } else {
                self.color.color(self.normalize(v, vmin, vmax))
            };
            img.put_pixel(i as u32, (height - 1 - j) as u32, color);
        }
        img
    }
}

/// How to turn a field into an image.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub colormap: Colormap,
    pub gamma: f64,
}

impl RenderConfig {
    pub fn painter(&self) -> PowerNormPainter<Colormap> {
        PowerNormPainter::new(self.colormap, self.gamma)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            colormap: Colormap::Jet,
            gamma: 0.3,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(Colormap::Jet.color(0.0), Rgb(JET[0]));
        assert_eq!(Colormap::Jet.color(1.0), Rgb(JET[JET.len() - 1]));
        assert_eq!(Colormap::Greyscale.color(0.5), Rgb([128, 128, 128]));
        assert_eq!(Colormap::Rainbow.color(2.0), Rgb(RAINBOW[9]));
    }

    #[test]
    fn test_colormap_names() {
        for cmap in [
            Colormap::Jet,
            Colormap::Inferno,
            Colormap::Rainbow,
            Colormap::Greyscale,
        ] {
            assert_eq!(cmap.to_string().parse::<Colormap>().unwrap(), cmap);
        }
        assert_eq!("Gray".parse::<Colormap>().unwrap(), Colormap::Greyscale);
        assert!("viridis".parse::<Colormap>().is_err());
    }

    #[test]
    fn test_zero_is_interior() {
        let field = array![[0.0, 1.0], [4.0, 0.0]];
        let img = PowerNormPainter::new(Colormap::Greyscale, 1.0)
            .with_interior(Rgb([1, 2, 3]))
            .paint(&field);
        assert_eq!(img.dimensions(), (2, 2));
        // field[[0, 0]] sits at the bottom left
        assert_eq!(*img.get_pixel(0, 1), Rgb([1, 2, 3]));
        assert_eq!(*img.get_pixel(1, 0), Rgb([1, 2, 3]));
        // smallest nonzero value maps to the start of the scale
        assert_eq!(*img.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*img.get_pixel(1, 1), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_gamma() {
        let painter = PowerNormPainter::new(Colormap::Greyscale, 0.5);
        assert!((painter.normalize(0.25, 0.0, 1.0) - 0.5).abs() < 1e-12);
        assert_eq!(painter.normalize(3.0, 3.0, 3.0), 0.0);
    }

    #[test]
    fn test_all_interior() {
        let field = EscapeField::zeros((3, 4));
        let img = RenderConfig::default().painter().paint(&field);
        assert_eq!(img.dimensions(), (3, 4));
        assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
