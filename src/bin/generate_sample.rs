use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

/// Pressure coefficient of potential flow around a cylinder.
fn potential_cp(theta_deg: f64) -> f64 {
    let s = theta_deg.to_radians().sin();
    1.0 - 4.0 * s * s
}

/// Rough measured Cp: follows potential flow up to separation, then a flat base pressure.
fn measured_cp(theta_deg: f64) -> f64 {
    const SEPARATION_DEG: f64 = 80.0;
    const BASE_CP: f64 = -1.2;
    if theta_deg <= SEPARATION_DEG {
        potential_cp(theta_deg).max(BASE_CP)
    } else {
        BASE_CP
    }
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
}

/// One sample set along the cylinder surface at a given time.
fn sample_set(times_index: usize, rng: &mut SimpleRng) -> String {
    const RADIUS: f64 = 0.5;
    const RHO_U2_HALF: f64 = 0.5;

    // Later time steps are closer to the converged solution.
    let noise = 0.15 / (times_index + 1) as f64;

    let mut out = String::new();
    let _ = writeln!(out, "# Sample set along the cylinder wall");
    let _ = writeln!(out, "# theta\tx\ty\tp\tCp");
    for i in 0..=36 {
        let theta = i as f64 * 5.0;
        let (sin, cos) = theta.to_radians().sin_cos();
        let cp = measured_cp(theta) + rng.gauss(0.0, noise);
        let p = cp * RHO_U2_HALF;
        let _ = writeln!(
            out,
            "{theta:e}\t{:e}\t{:e}\t{p:e}\t{cp:e}",
            -RADIUS * cos,
            RADIUS * sin
        );
    }
    out
}

fn write(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_case".to_string());
    let root = Path::new(&output);
    let mut rng = SimpleRng::new(42);

    let times = ["5", "10", "20"];
    let sets = ["cylinderUpper", "cylinderLower"];
    for (times_index, time) in times.iter().enumerate() {
        for set in sets {
            let path = root
                .join("postProcessing")
                .join("sample")
                .join(time)
                .join(format!("{set}.xy"));
            write(&path, &sample_set(times_index, &mut rng))?;
            log::info!("wrote {}", path.display());
        }
    }

    let mut reference = String::new();
    let _ = writeln!(reference, "Pressure coefficient around a circular cylinder");
    let _ = writeln!(reference, "theta[deg] Cp[-]");
    for i in 0..=18 {
        let theta = i as f64 * 10.0;
        let _ = writeln!(reference, "{theta} {:.4}", measured_cp(theta));
    }
    let reference_path = root.join("ref").join("Cp.dat");
    write(&reference_path, &reference)?;

    println!(
        "Wrote {} sample sets and {} to {output}",
        times.len() * sets.len(),
        reference_path.display()
    );
    println!(
        "Try: foam-plot --case-dir {}/postProcessing --reference {} --x theta --y Cp --title Cp_vs_theta",
        output,
        reference_path.display()
    );
    Ok(())
}
