//! Eulerian fluid solver on a toroidal grid.
//!
//! One `step()` advances velocity, pressure and dye by a fixed time step:
//! semi-Lagrangian advection, Jacobi diffusion, a pressure solve on the
//! discrete Poisson equation, gradient subtraction, then dye transport and
//! decay. Every stage reads the current grid and writes a scratch grid of
//! the same shape, swapped in O(1) when the stage (or Jacobi iteration)
//! finishes.

pub mod diagnostics;
mod params;

pub use params::SimParams;

use crate::grid::Grid;
use crate::math::{CellValue, Rgb, Vec2};
use crate::partition::RowPartitioner;

/// Backward advection: trace each cell upstream by `rdx_dt = dt/dx` along
/// the velocity field, truncate the traced coordinate toward zero to a cell
/// index, and average the four wrapped samples at that cell and its +1
/// offsets with equal 1/4 weights.
///
/// The unweighted 4-sample average is a deliberate simplification of
/// bilinear interpolation and is kept exactly as-is.
fn advect<T: CellValue>(dst: &mut Grid<T>, src: &Grid<T>, velocity: &Grid<Vec2>, rdx_dt: f64) {
    let (w, h) = (dst.width() as i32, dst.height() as i32);
    for y in 0..h {
        for x in 0..w {
            let v = velocity.get(x, y);
            let bx = (x as f64 - rdx_dt * v.x) as i32;
            let by = (y as f64 - rdx_dt * v.y) as i32;
            let sum = src.get_wrapped(bx, by)
                + src.get_wrapped(bx + 1, by)
                + src.get_wrapped(bx, by + 1)
                + src.get_wrapped(bx + 1, by + 1);
            dst.set(x, y, sum * 0.25);
        }
    }
}

/// One Jacobi relaxation sweep: per cell,
/// `beta * (4 wrapped neighbors of cur + alpha * source)`, written into
/// `scratch` across parallel row bands. Callers swap `cur`/`scratch` after
/// each sweep so the next one reads a fully-updated field.
fn jacobi<T: CellValue>(
    cur: &Grid<T>,
    source: &Grid<T>,
    scratch: &mut Grid<T>,
    alpha: f64,
    beta: f64,
    partitioner: &RowPartitioner,
) {
    let w = cur.width();
    partitioner.run(scratch.as_mut_slice(), w, |y0, y1, band| {
        for y in y0..y1 {
            for x in 0..w {
                let (xi, yi) = (x as i32, y as i32);
                let sum = cur.get_wrapped(xi - 1, yi)
                    + cur.get_wrapped(xi + 1, yi)
                    + cur.get_wrapped(xi, yi - 1)
                    + cur.get_wrapped(xi, yi + 1)
                    + source.get(xi, yi) * alpha;
                band[(y - y0) * w + x] = sum * beta;
            }
        }
    });
}

/// Central-difference divergence of `velocity` into `dst`, wrapped indices.
fn divergence(dst: &mut Grid<f64>, velocity: &Grid<Vec2>, halfrdx: f64) {
    let (w, h) = (dst.width() as i32, dst.height() as i32);
    for y in 0..h {
        for x in 0..w {
            dst.set(
                x,
                y,
                halfrdx
                    * ((velocity.get_wrapped(x + 1, y).x - velocity.get_wrapped(x - 1, y).x)
                        + (velocity.get_wrapped(x, y + 1).y - velocity.get_wrapped(x, y - 1).y)),
            );
        }
    }
}

/// Copy of the dye field handed to the renderer, recycled between threads.
pub struct DyeSnapshot {
    pub width: usize,
    pub height: usize,
    pub dye: Vec<Rgb>,
}

impl DyeSnapshot {
    pub fn new_empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dye: vec![Rgb::BLACK; width * height],
        }
    }
}

/// The simulation: four field grid pairs plus parameters and the worker
/// pool for the relaxation loops. All grids share one width×height shape
/// fixed at construction.
pub struct FluidSim {
    width: usize,
    height: usize,
    params: SimParams,
    partitioner: RowPartitioner,
    dye: Grid<Rgb>,
    dye_tmp: Grid<Rgb>,
    velocity: Grid<Vec2>,
    velocity_tmp: Grid<Vec2>,
    pressure: Grid<f64>,
    pressure_tmp: Grid<f64>,
    div_velocity: Grid<f64>,
}

impl FluidSim {
    pub fn new(width: usize, height: usize, params: SimParams) -> Self {
        let partitioner = RowPartitioner::new(params.workers);
        let b = params.bounds;
        Self {
            width,
            height,
            partitioner,
            dye: Grid::with_policy(width, height, b),
            dye_tmp: Grid::with_policy(width, height, b),
            velocity: Grid::with_policy(width, height, b),
            velocity_tmp: Grid::with_policy(width, height, b),
            pressure: Grid::with_policy(width, height, b),
            pressure_tmp: Grid::with_policy(width, height, b),
            div_velocity: Grid::with_policy(width, height, b),
            params,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Live-adjustable parameters. Grid shape, bounds policy and the worker
    /// pool are fixed at construction; `workers` and `bounds` in `p` are
    /// ignored here.
    pub fn set_params(&mut self, p: &SimParams) {
        self.params.dt = p.dt;
        self.params.viscosity = p.viscosity;
        self.params.dye_decay = p.dye_decay;
        self.params.jacobi_iters = p.jacobi_iters;
    }

    /// Read access for the renderer.
    pub fn dye_at(&self, x: i32, y: i32) -> Rgb {
        self.dye.get(x, y)
    }

    pub fn dye(&self) -> &Grid<Rgb> {
        &self.dye
    }

    pub fn velocity(&self) -> &Grid<Vec2> {
        &self.velocity
    }

    pub fn snapshot_into(&self, dst: &mut DyeSnapshot) {
        dst.width = self.width;
        dst.height = self.height;
        dst.dye.copy_from_slice(self.dye.as_slice());
    }

    /// Reset all fields to rest.
    pub fn clear(&mut self) {
        self.dye.fill(Rgb::BLACK);
        self.dye_tmp.fill(Rgb::BLACK);
        self.velocity.fill(Vec2::ZERO);
        self.velocity_tmp.fill(Vec2::ZERO);
        self.pressure.fill(0.0);
        self.pressure_tmp.fill(0.0);
        self.div_velocity.fill(0.0);
    }

    /// Advance the simulation by one fixed time step. The five stages run
    /// unconditionally in sequence; there is no partial completion.
    pub fn step(&mut self) {
        self.advect_velocity();
        self.diffuse();
        self.compute_pressure();
        self.subtract_pressure_gradient();
        self.advect_dye();
        self.decay_dye();
    }

    /// Add `displacement` to the velocity and paint `color` into the dye of
    /// every cell within Euclidean distance `radius` of `(cx, cy)`, clamped
    /// to the grid (the brush does not wrap at the boundary).
    pub fn apply_impulse(&mut self, cx: i32, cy: i32, displacement: Vec2, radius: i32, color: Rgb) {
        let r = radius.max(0);
        let x0 = (cx - r).max(0);
        let x1 = (cx + r).min(self.width as i32 - 1);
        let y0 = (cy - r).max(0);
        let y1 = (cy + r).min(self.height as i32 - 1);
        let r2 = (r * r) as f64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = (x - cx) as f64;
                let dy = (y - cy) as f64;
                if dx * dx + dy * dy <= r2 {
                    self.velocity.set(x, y, self.velocity.get(x, y) + displacement);
                    self.dye.set(x, y, color);
                }
            }
        }
    }

    fn advect_velocity(&mut self) {
        let rdx_dt = self.params.dt / self.params.dx;
        advect(&mut self.velocity_tmp, &self.velocity, &self.velocity, rdx_dt);
        self.velocity.swap(&mut self.velocity_tmp);
    }

    /// Viscous diffusion: implicit solve by Jacobi relaxation with
    /// `alpha = dx²/(ν·dt)`, `beta = 1/(4+alpha)`, swapping after every
    /// iteration so each sweep reads the previous sweep's full field.
    fn diffuse(&mut self) {
        let p = &self.params;
        let alpha = p.dx * p.dx / (p.viscosity * p.dt);
        let beta = 1.0 / (4.0 + alpha);
        for _ in 0..self.params.jacobi_iters {
            jacobi(
                &self.velocity,
                &self.velocity,
                &mut self.velocity_tmp,
                alpha,
                beta,
                &self.partitioner,
            );
            self.velocity.swap(&mut self.velocity_tmp);
        }
    }

    /// Solve the discrete Poisson equation for pressure: divergence is
    /// computed once per step, pressure restarts from zero, then Jacobi
    /// with `alpha = -dx²`, `beta = 1/4`.
    fn compute_pressure(&mut self) {
        divergence(&mut self.div_velocity, &self.velocity, 0.5 / self.params.dx);
        self.pressure.fill(0.0);

        let alpha = -(self.params.dx * self.params.dx);
        let beta = 0.25;
        for _ in 0..self.params.jacobi_iters {
            jacobi(
                &self.pressure,
                &self.div_velocity,
                &mut self.pressure_tmp,
                alpha,
                beta,
                &self.partitioner,
            );
            self.pressure.swap(&mut self.pressure_tmp);
        }
    }

    /// Project velocity toward divergence-free by subtracting the pressure
    /// gradient, in place: reads and writes are per-cell independent once
    /// pressure is finalized.
    fn subtract_pressure_gradient(&mut self) {
        let halfrdx = 0.5 / self.params.dx;
        let (w, h) = (self.width as i32, self.height as i32);
        for y in 0..h {
            for x in 0..w {
                let grad_x = halfrdx
                    * (self.pressure.get_wrapped(x + 1, y) - self.pressure.get_wrapped(x - 1, y));
                let grad_y = halfrdx
                    * (self.pressure.get_wrapped(x, y + 1) - self.pressure.get_wrapped(x, y - 1));
                let mut v = self.velocity.get(x, y);
                v.x -= grad_x;
                v.y -= grad_y;
                self.velocity.set(x, y, v);
            }
        }
    }

    fn advect_dye(&mut self) {
        let rdx_dt = self.params.dt / self.params.dx;
        advect(&mut self.dye_tmp, &self.dye, &self.velocity, rdx_dt);
        self.dye.swap(&mut self.dye_tmp);
    }

    fn decay_dye(&mut self) {
        let decay = self.params.dye_decay;
        for c in self.dye.as_mut_slice() {
            *c = *c * decay;
        }
    }
}
