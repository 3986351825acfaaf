/*
 * Config File Module
 *
 * Reads and writes the plain-text configuration file: one `key: value` line
 * per setting, `#` comments, and an optional list of response curve samples
 * after a `total-buckets:` line.
 *
 * Parsing is lenient. A malformed value is logged and replaced by its
 * default; a short or malformed sample list discards the whole curve so the
 * built-in default is used. Nothing here validates ranges: that happens when
 * the simulation is built from the loaded values.
 */

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::{info, warn};

use crate::curve::ResponseCurve;
use crate::error::ConfigError;
use crate::params::SimulationParams;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.txt";

// Fallbacks for unreadable lines
const DEFAULT_BOIDS: usize = 5;
const DEFAULT_MASS: f32 = 0.01;
const DEFAULT_RANGES: [f32; 3] = [0.2, 0.4, 0.6];
const DEFAULT_MULTIPLIERS: [f32; 3] = [3.0, 2.0, 2.5];
const DEFAULT_ARENA: f32 = 500.0;
const DEFAULT_FORCE: f32 = 1.0;
const DEFAULT_MIN_VELOCITY: f32 = 1.0;
const DEFAULT_MAX_VELOCITY: f32 = 15.0;

#[derive(Clone, Debug, PartialEq)]
pub struct LoadedConfig {
    pub params: SimulationParams,
    // None falls back to the default curve
    pub curve: Option<Vec<f32>>,
}

impl LoadedConfig {
    pub fn response_curve(&self) -> ResponseCurve {
        match &self.curve {
            Some(samples) => ResponseCurve::new(samples.clone()).unwrap_or_default(),
            None => ResponseCurve::default(),
        }
    }
}

pub fn parse_config(text: &str) -> LoadedConfig {
    let mut params = SimulationParams::default();
    let mut curve = None;
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        if line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix("boids: ") {
            params.num_boids = match rest.trim().parse::<i64>() {
                Ok(n) if n > 0 => n as usize,
                Ok(_) => DEFAULT_BOIDS,
                Err(_) => fallback("boids", DEFAULT_BOIDS),
            };
        } else if let Some(rest) = line.strip_prefix("mass: ") {
            params.boid_mass = parse_scalar(rest).unwrap_or_else(|| fallback("mass", DEFAULT_MASS));
        } else if let Some(rest) = line.strip_prefix("ACG: ") {
            let [a, c, g] = parse_triple(rest).unwrap_or_else(|| fallback("ACG", DEFAULT_RANGES));
            params.avoidance_range = a;
            params.cohesion_range = c;
            params.max_search_range = g;
        } else if let Some(rest) = line.strip_prefix("ACG forces: ") {
            let [a, c, g] =
                parse_triple(rest).unwrap_or_else(|| fallback("ACG forces", DEFAULT_MULTIPLIERS));
            params.avoidance_multiplier = a;
            params.cohesion_multiplier = c;
            params.gather_multiplier = g;
        } else if let Some(rest) = line.strip_prefix("arena: ") {
            params.arena_radius = parse_scalar(rest).unwrap_or_else(|| fallback("arena", DEFAULT_ARENA));
        } else if let Some(rest) = line.strip_prefix("force: ") {
            params.force_multiplier = parse_scalar(rest).unwrap_or_else(|| fallback("force", DEFAULT_FORCE));
        } else if let Some(rest) = line.strip_prefix("min-velocity: ") {
            params.min_velocity =
                parse_scalar(rest).unwrap_or_else(|| fallback("min-velocity", DEFAULT_MIN_VELOCITY));
        } else if let Some(rest) = line.strip_prefix("max-velocity: ") {
            params.max_velocity =
                parse_scalar(rest).unwrap_or_else(|| fallback("max-velocity", DEFAULT_MAX_VELOCITY));
        } else if let Some(rest) = line.strip_prefix("total-buckets: ") {
            curve = match rest.trim().parse::<i64>() {
                Ok(count) if count > 0 => read_samples(&mut lines, count as usize),
                Ok(_) => None,
                Err(_) => {
                    warn!("error reading total buckets, using default curve");
                    None
                }
            };
        }
    }

    LoadedConfig { params, curve }
}

fn read_samples<'a>(lines: &mut impl Iterator<Item = &'a str>, count: usize) -> Option<Vec<f32>> {
    let mut samples = Vec::with_capacity(count);
    for index in 0..count {
        let line = lines.next().unwrap_or("");
        if line.trim().is_empty() {
            warn!(index, count, "bucket list ended early, using default curve");
            return None;
        }
        match parse_scalar(line) {
            Some(value) => samples.push(value),
            None => {
                warn!(index, line, "unreadable bucket value, using default curve");
                return None;
            }
        }
    }
    Some(samples)
}

fn fallback<T: std::fmt::Debug>(key: &str, value: T) -> T {
    warn!(key, default = ?value, "error reading config value, using default");
    value
}

// Leading token only: "3.5 # comment" reads 3.5
fn parse_scalar<T: FromStr>(text: &str) -> Option<T> {
    text.split_whitespace().next()?.parse().ok()
}

fn parse_triple(text: &str) -> Option<[f32; 3]> {
    let mut values = text.split(',').map(|part| parse_scalar::<f32>(part));
    let triple = [values.next()??, values.next()??, values.next()??];
    Some(triple)
}

pub fn write_config(params: &SimulationParams, curve: &ResponseCurve) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = write!(
        out,
        "#CONFIG FILE\n\n\
         # total number of boids to create\n\
         boids: {}\n\n\
         # boids mass\n\
         mass: {}\n\n\
         # avoidance/cohesion, cohesion/gather, and max ranges\n\
         ACG: {}, {}, {}\n\n\
         # boid force multipliers\n\
         ACG forces: {}, {}, {}\n\n\
         # radius of arena\n\
         arena: {}\n\n\
         # force multiplier\n\
         force: {}\n\n\
         # minimum velocity of boids\n\
         min-velocity: {}\n\n\
         # maximum velocity of boids\n\
         max-velocity: {}\n\n\
         # response curve samples\n\
         total-buckets: {}\n",
        params.num_boids,
        params.boid_mass,
        params.avoidance_range,
        params.cohesion_range,
        params.max_search_range,
        params.avoidance_multiplier,
        params.cohesion_multiplier,
        params.gather_multiplier,
        params.arena_radius,
        params.force_multiplier,
        params.min_velocity,
        params.max_velocity,
        curve.bucket_count(),
    );
    for sample in curve.samples() {
        let _ = writeln!(out, "{}", sample);
    }
    out.push_str("\n# eof");
    out
}

pub fn load_config(path: impl AsRef<Path>) -> Result<LoadedConfig, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    info!(path = %path.display(), "Loaded config file");
    Ok(parse_config(&text))
}

pub fn save_config(
    path: impl AsRef<Path>,
    params: &SimulationParams,
    curve: &ResponseCurve,
) -> Result<(), ConfigError> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, write_config(params, curve))?;
    info!(path = %path.display(), "Saved config file");
    Ok(())
}
