use crate::grid::BoundsPolicy;

/// Construction-time solver parameters. Fixed for the simulation's lifetime
/// except where `FluidSim::set_params` allows live adjustment.
#[derive(Clone, Debug)]
pub struct SimParams {
    /// Cell spacing of the discretization.
    pub dx: f64,
    /// Fixed time step per `step()` call.
    pub dt: f64,
    /// Kinematic viscosity used by the diffusion stage.
    pub viscosity: f64,
    /// Fraction of dye retained per step, in [0, 1].
    pub dye_decay: f64,
    /// Jacobi iteration count for both the diffusion and pressure solves.
    pub jacobi_iters: usize,
    /// Worker count for the banded relaxation loops; `<= 1` is serial.
    pub workers: usize,
    /// Coordinate checking on the non-wrapped accessors.
    pub bounds: BoundsPolicy,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            dx: 0.005,
            dt: 0.01,
            viscosity: 0.001,
            dye_decay: 0.95,
            jacobi_iters: 40,
            workers: 4,
            bounds: BoundsPolicy::Checked,
        }
    }
}
