use serde::Deserialize;

use crate::grid::BoundsPolicy;
use crate::solver::SimParams;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sim: SimConfig,
    pub display: DisplayConfig,
    pub brush: BrushConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub grid_size: usize,
    pub dx: f64,
    pub dt: f64,
    pub viscosity: f64,
    pub dye_decay: f64,
    pub jacobi_iters: usize,
    pub workers: usize,
    pub checked_bounds: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: usize,
    pub height: usize,
    pub target_fps: usize,
    pub steps_per_frame: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Brush radius in cells (Euclidean distance).
    pub radius: i32,
    /// Scale from cursor displacement to injected velocity.
    pub gain: f64,
    /// Degrees of hue advanced per frame.
    pub hue_step: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            display: DisplayConfig::default(),
            brush: BrushConfig::default(),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: 200,
            dx: 0.005,
            dt: 0.01,
            viscosity: 0.001,
            dye_decay: 0.95,
            jacobi_iters: 40,
            workers: 4,
            checked_bounds: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            target_fps: 60,
            steps_per_frame: 1,
        }
    }
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            radius: 10,
            gain: 5.0,
            hue_step: 3,
        }
    }
}

impl SimConfig {
    pub fn params(&self) -> SimParams {
        SimParams {
            dx: self.dx,
            dt: self.dt,
            viscosity: self.viscosity,
            dye_decay: self.dye_decay,
            jacobi_iters: self.jacobi_iters,
            workers: self.workers,
            bounds: if self.checked_bounds {
                BoundsPolicy::Checked
            } else {
                BoundsPolicy::Relaxed
            },
        }
    }
}

pub fn load() -> Config {
    let path = std::path::Path::new("dyetide.yaml");
    if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("Warning: failed to parse dyetide.yaml: {e}; using defaults");
                    Config::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: failed to read dyetide.yaml: {e}; using defaults");
                Config::default()
            }
        }
    } else {
        Config::default()
    }
}
