//! Prints a synthetic weather-station CSV with a few injected outliers.
//!
//! ```text
//! cargo run --bin generate_sample -- --rows 500 > stations.csv
//! ```

use std::io;

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeDelta};
use clap::Parser;

#[derive(Parser)]
#[command(name = "generate_sample", about = "Print a sample sensor dataset as CSV")]
struct Args {
    /// Number of rows to generate.
    #[arg(long, default_value_t = 200)]
    rows: usize,

    /// Seed of the pseudo-random generator.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Share of rows with an injected outlier.
    #[arg(long, default_value_t = 0.02)]
    outlier_rate: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid start date")?;
    let stations = ["north", "harbour", "airport"];

    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    writer.write_record([
        "Date and Time",
        "station",
        "temperature",
        "humidity",
        "pressure",
        "wind_speed",
        "status",
    ])?;

    for i in 0..args.rows {
        let when = start + TimeDelta::hours(i as i64);
        let mut temperature = rng.gauss(12.0, 3.0);
        let humidity = rng.gauss(70.0, 8.0).clamp(0.0, 100.0);
        let mut pressure = rng.gauss(1013.0, 4.0);
        let wind_speed = rng.gauss(5.0, 1.5).abs();

        // Sensor glitches
        if rng.next_f64() < args.outlier_rate {
            temperature += if rng.next_f64() < 0.5 { -35.0 } else { 40.0 };
        }
        if rng.next_f64() < args.outlier_rate {
            pressure -= 60.0;
        }

        let status = if rng.next_f64() < 0.05 { "maintenance" } else { "ok" };
        writer.write_record([
            when.format("%Y-%m-%d %H:%M:%S").to_string(),
            rng.pick(&stations).to_string(),
            format!("{temperature:.2}"),
            format!("{humidity:.1}"),
            format!("{pressure:.1}"),
            format!("{wind_speed:.2}"),
            status.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
