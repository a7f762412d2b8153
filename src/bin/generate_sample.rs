//! Writes a synthetic 24-hour EMF meter log in the layout the viewer loads.
//!
//! Usage: `generate_sample [output.csv]`

use chrono::{NaiveDate, TimeDelta};

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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
}

const SECONDS: i64 = 24 * 60 * 60;

/// Power density in µW/m² at `secs` seconds past noon.
fn power_density(secs: i64, rng: &mut SimpleRng) -> (f64, &'static str) {
    let hour = 12.0 + secs as f64 / 3600.0;
    // Phone call: 20:01:00 to 20:03:00.
    if (28_860..28_980).contains(&secs) {
        return (rng.gauss(2400.0, 350.0).max(0.0), "phone");
    }
    // Router duty cycle while the household is awake.
    let awake = !(23.0..29.666).contains(&hour);
    let base = if awake { 35.0 } else { 8.0 };
    let burst = if awake && rng.next_f64() < 0.002 { rng.gauss(300.0, 60.0) } else { 0.0 };
    ((base + burst + rng.gauss(0.0, base * 0.2)).max(0.0), "ambient")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_path = std::env::args().nth(1).unwrap_or_else(|| "sample_emf.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let start = NaiveDate::from_ymd_opt(2023, 1, 6)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .ok_or("invalid start time")?;

    let mut writer = csv::Writer::from_path(&output_path)?;
    writer.write_record(["index", "datetime", "mG", "V/m", "mW/m2", "microW/m2", "source"])?;

    for secs in 0..SECONDS {
        let ts = start + TimeDelta::seconds(secs);
        let (pd, source) = power_density(secs, &mut rng);
        let mg = rng.gauss(0.6, 0.15).max(0.0);
        let vm = rng.gauss(1.8, 0.4).max(0.0);
        writer.write_record([
            secs.to_string(),
            ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{mg:.2}"),
            format!("{vm:.2}"),
            format!("{:.4}", pd / 1000.0),
            format!("{pd:.1}"),
            source.to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {SECONDS} readings to {output_path}");
    Ok(())
}
