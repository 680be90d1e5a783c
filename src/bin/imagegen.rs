use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use log::info;
use structopt::clap::{Error as ClapError, ErrorKind};
use structopt::StructOpt;

use mandelfield::coord::Frame;
use mandelfield::painter::{Colormap, Painter, RenderConfig};
use mandelfield::solver::{ScalarSolver, SimdSolver};
use mandelfield::{Result, SampleConfig, Sampler};

#[derive(StructOpt, Debug)]
#[structopt(
    name = "mandelfield-imagegen",
    about = "Render a smooth escape-time image of the Mandelbrot set"
)]
struct Opt {
    /// Real part of the region center
    #[structopt(long, default_value = "-0.5", allow_hyphen_values = true)]
    center_x: f64,
    /// Imaginary part of the region center
    #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
    center_y: f64,
    /// Half the side of the square region around the center
    #[structopt(long, default_value = "1.5")]
    range: f64,
    /// Explicit bounds, all four override --center-x/--center-y/--range
    #[structopt(long, allow_hyphen_values = true)]
    xmin: Option<f64>,
    #[structopt(long, allow_hyphen_values = true)]
    xmax: Option<f64>,
    #[structopt(long, allow_hyphen_values = true)]
    ymin: Option<f64>,
    #[structopt(long, allow_hyphen_values = true)]
    ymax: Option<f64>,
    /// Image width in pixels
    #[structopt(short, long, default_value = "720")]
    width: usize,
    /// Image height in pixels
    #[structopt(long, default_value = "720")]
    height: usize,
    /// Iteration budget per point
    #[structopt(short = "i", long, default_value = "512")]
    max_iter: u32,
    /// Exponent of the power-law normalization
    #[structopt(short, long, default_value = "0.3")]
    gamma: f64,
    /// jet, inferno, rainbow or greyscale
    #[structopt(short, long, default_value = "jet")]
    colormap: Colormap,
    /// Worker threads, defaults to the number of physical cores
    #[structopt(short, long)]
    threads: Option<usize>,
    /// Evaluate four points at a time with SIMD
    #[structopt(long)]
    simd: bool,
    /// Output PNG file, defaults to mandelbrot_<cmap>_iter<n>_<HH-MM-SS>Z.png (UTC)
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
}

impl Opt {
    fn frame(&self) -> Frame<f64> {
        match (self.xmin, self.xmax, self.ymin, self.ymax) {
            (Some(x1), Some(x2), Some(y1), Some(y2)) => Frame::from_nums(x1, x2, y1, y2),
            (None, None, None, None) => Frame::around(self.center_x, self.center_y, self.range),
            _ => ClapError::with_description(
                "--xmin, --xmax, --ymin and --ymax must be given together",
                ErrorKind::ArgumentConflict,
            )
            .exit(),
        }
    }

    fn sample_config(&self) -> SampleConfig {
        SampleConfig {
            frame: self.frame(),
            width: self.width,
            height: self.height,
            max_iter: self.max_iter,
        }
    }

    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            colormap: self.colormap,
            gamma: self.gamma,
        }
    }

    fn sampler(&self) -> Sampler {
        let threads = self.threads.unwrap_or_else(num_cpus::get_physical);
        if self.simd {
            Sampler::new::<SimdSolver>(threads)
        } else {
            Sampler::new::<ScalarSolver>(threads)
        }
    }

    fn output(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            default_output(self.colormap, self.max_iter, now)
        })
    }
}

/// `mandelbrot_<cmap>_iter<n>_<HH-MM-SS>Z.png`, stamped with the UTC time of
/// day of `unix_secs`.
fn default_output(colormap: Colormap, max_iter: u32, unix_secs: u64) -> PathBuf {
    let secs = unix_secs % 86400;
    PathBuf::from(format!(
        "mandelbrot_{}_iter{}_{:02}-{:02}-{:02}Z.png",
        colormap,
        max_iter,
        secs / 3600,
        (secs / 60) % 60,
        secs % 60
    ))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opt::from_args();

    let start = Instant::now();
    let sample = opt.sampler().sample_config(&opt.sample_config())?;
    let img = opt.render_config().painter().paint(&sample.field);

    let output = opt.output();
    img.save(&output)?;
    info!("wrote {}", output.display());
    info!("total time: {:.2?}", start.elapsed());
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_output_is_utc() {
        // 2022-10-01T13:05:09Z
        let name = default_output(Colormap::Inferno, 2048, 1_664_629_509);
        assert_eq!(name, PathBuf::from("mandelbrot_inferno_iter2048_13-05-09Z.png"));
        let midnight = default_output(Colormap::Jet, 512, 86400 * 19000);
        assert_eq!(midnight, PathBuf::from("mandelbrot_jet_iter512_00-00-00Z.png"));
    }
}
