//! A small timing harness for the `benches/` targets.
use std::fs;
use std::io::{self, stdout, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::warn;

#[derive(Clone)]
pub struct Benchmark {
    f: Rc<dyn Fn()>,
    name: String,
    iterations: usize,
    cells: Option<usize>,
}

pub enum Unit {
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
}

impl Unit {
    pub fn format(&self, d: &Duration, width: usize) -> String {
        let (symbol, value) = match self {
            Self::Nanosecond => ("ns", d.as_nanos()),
            Self::Microsecond => ("us", d.as_micros()),
            Self::Millisecond => ("ms", d.as_millis()),
            Self::Second => ("s", d.as_secs() as u128),
        };
        format!("{:>width$}{:<2}", value, symbol)
    }

    pub fn scaled(d: &Duration, treshold: u128) -> Self {
        if d.as_nanos() < treshold {
            Self::Nanosecond
        } else if d.as_micros() < treshold {
            Self::Microsecond
        } else if d.as_millis() < treshold {
            Self::Millisecond
        } else {
            Self::Second
        }
    }
}

impl Benchmark {
    pub fn iter<F: Fn() + 'static>(name: &str, n: usize, f: F) -> Self {
        Self {
            f: Rc::new(f),
            name: name.to_string(),
            iterations: n,
            cells: None,
        }
    }

    pub fn once<F: Fn() + 'static>(name: &str, f: F) -> Self {
        Self::iter(name, 1, f)
    }

    /// Report throughput for a run that evaluates `cells` grid points per call.
    pub fn with_cells(mut self, cells: usize) -> Self {
        self.cells = Some(cells);
        self
    }

    fn run(&self) -> Duration {
        let start = Instant::now();
        for _ in 0..self.iterations {
            (self.f)();
        }
        start.elapsed()
    }
}

pub struct BenchResult {
    pub name: String,
    pub iterations: usize,
    pub total: Duration,
    pub cells: Option<usize>,
}

impl BenchResult {
    pub fn per_call(&self) -> Duration {
        self.total.div_f64(self.iterations.max(1) as f64)
    }

    /// Millions of cells evaluated per second.
    pub fn mcells_per_sec(&self) -> Option<f64> {
        let secs = self.per_call().as_secs_f64();
        match self.cells {
            Some(cells) if secs > 0.0 => Some(cells as f64 / secs / 1e6),
            _ => None,
        }
    }
}

pub struct BenchmarkReport {
    benches: Vec<Benchmark>,
    results: Vec<BenchResult>,
}

impl BenchmarkReport {
    pub fn new() -> Self {
        Self {
            benches: vec![],
            results: vec![],
        }
    }

    pub fn add_bench(&mut self, bench: Benchmark) {
        self.benches.push(bench);
    }

    pub fn with_benches(benches: Vec<Benchmark>) -> Self {
        let mut this = Self::new();
        for bench in benches {
            this.add_bench(bench);
        }
        this
    }

    pub fn results(&self) -> &[BenchResult] {
        &self.results
    }

    pub fn run(&mut self) {
        for bench in &self.benches {
            let total = bench.run();
            self.results.push(BenchResult {
                name: bench.name.clone(),
                iterations: bench.iterations,
                total,
                cells: bench.cells,
            });
            print!(".");
            let _ = stdout().flush();
        }
        println!();
    }

    pub fn show(&self) {
        println!(
            "  {: <36} {: >8}   {: >8}   {: >8}",
            "benchmark", "total", "per_call", "Mcell/s"
        );
        for r in &self.results {
            let per_call = r.per_call();
            let rate = r
                .mcells_per_sec()
                .map(|m| format!("{:>8.2}", m))
                .unwrap_or_else(|| format!("{:>8}", "-"));
            println!(
                "  {: <36} {}   {}   {}",
                r.name,
                Unit::scaled(&r.total, 100000).format(&r.total, 6),
                Unit::scaled(&per_call, 100000).format(&per_call, 6),
                rate,
            )
        }
    }

    pub fn write_csv(&self, filename: &str) -> io::Result<()> {
        let mut lines: Vec<String> =
            vec!["benchmark,total_us,iterations,per_call_us,mcells_per_sec".to_string()];
        for r in &self.results {
            lines.push(format!(
                "{},{},{},{},{}",
                r.name,
                r.total.as_micros(),
                r.iterations,
                r.per_call().as_micros(),
                r.mcells_per_sec().map(|m| m.to_string()).unwrap_or_default(),
            ));
        }
        lines.push("".to_string());
        fs::write(filename, lines.join("\n"))
    }

    pub fn report(&mut self, name: &str) {
        print!("Benchmark: {}", name);
        self.run();
        self.show();
        let filename = format!("benchmark_{}.csv", name);
        if let Err(e) = self.write_csv(&filename) {
            warn!("could not write {}: {}", filename, e);
        }
    }
}
