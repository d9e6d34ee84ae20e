use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use crate::math::{Rgb, Vec2};
use crate::solver::{diagnostics, DyeSnapshot, FluidSim, SimParams};

/// Diagnostics are printed every this many steps.
const DIAG_INTERVAL: u64 = 100;

/// Commands the render thread sends to the physics thread. Impulses are
/// queued here and drained before each step, so the simulation fields have
/// a single writer.
pub enum SimCommand {
    Impulse {
        x: i32,
        y: i32,
        displacement: Vec2,
        radius: i32,
        color: Rgb,
    },
    SetParams(SimParams),
    SetPaused(bool),
    Clear,
}

/// Channels connecting the main (render) thread to the physics thread.
pub struct PhysicsChannels {
    pub cmd_tx: mpsc::Sender<SimCommand>,
    pub snap_rx: mpsc::Receiver<DyeSnapshot>,
    pub snap_return_tx: mpsc::Sender<DyeSnapshot>,
}

/// Spawn the physics thread and return its channels + join handle.
///
/// The snapshot channel has capacity 1, so the physics thread runs at most
/// one step ahead of the renderer. Consumed snapshots come back on the
/// return channel and are recycled to avoid per-frame allocation.
pub fn spawn_physics_thread(
    grid_size: usize,
    params: SimParams,
    steps_per_frame: usize,
    running: Arc<AtomicBool>,
) -> (PhysicsChannels, std::thread::JoinHandle<()>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<SimCommand>();
    let (snap_tx, snap_rx) = mpsc::sync_channel::<DyeSnapshot>(1);
    let (snap_return_tx, snap_return_rx) = mpsc::channel::<DyeSnapshot>();

    let handle = std::thread::spawn(move || {
        let mut sim = FluidSim::new(grid_size, grid_size, params);
        let mut snap_buf = DyeSnapshot::new_empty(grid_size, grid_size);
        let mut step_count: u64 = 0;
        let mut paused = false;

        while running.load(Ordering::SeqCst) {
            while let Ok(cmd) = cmd_rx.try_recv() {
                match cmd {
                    SimCommand::Impulse {
                        x,
                        y,
                        displacement,
                        radius,
                        color,
                    } => sim.apply_impulse(x, y, displacement, radius, color),
                    SimCommand::SetParams(p) => sim.set_params(&p),
                    SimCommand::SetPaused(p) => paused = p,
                    SimCommand::Clear => sim.clear(),
                }
            }

            if !paused {
                for _ in 0..steps_per_frame {
                    sim.step();
                    step_count += 1;

                    if step_count % DIAG_INTERVAL == 0 {
                        let div =
                            diagnostics::mean_abs_divergence(sim.velocity(), sim.params().dx);
                        let ke = diagnostics::kinetic_energy(sim.velocity());
                        let dye = diagnostics::total_dye(sim.dye());
                        eprintln!(
                            "step={} div={:.3e} KE={:.6e} dye={:.3e}",
                            step_count, div, ke, dye
                        );
                    }
                }
            }

            sim.snapshot_into(&mut snap_buf);
            if snap_tx.send(snap_buf).is_err() {
                break;
            }
            let expected_len = grid_size * grid_size;
            snap_buf = snap_return_rx
                .try_recv()
                .ok()
                .filter(|b| b.dye.len() == expected_len)
                .unwrap_or_else(|| DyeSnapshot::new_empty(grid_size, grid_size));
        }
    });

    let channels = PhysicsChannels {
        cmd_tx,
        snap_rx,
        snap_return_tx,
    };
    (channels, handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_produces_snapshots() {
        let running = Arc::new(AtomicBool::new(true));
        let (channels, handle) = spawn_physics_thread(8, SimParams::default(), 1, running.clone());

        let snap = channels.snap_rx.recv().expect("first snapshot");
        assert_eq!(snap.width, 8);
        assert_eq!(snap.height, 8);
        assert_eq!(snap.dye.len(), 64);
        channels.snap_return_tx.send(snap).unwrap();

        running.store(false, Ordering::SeqCst);
        drop(channels);
        handle.join().unwrap();
    }

    #[test]
    fn test_impulse_shows_up_in_snapshot() {
        let running = Arc::new(AtomicBool::new(true));
        let (channels, handle) = spawn_physics_thread(8, SimParams::default(), 1, running.clone());

        channels
            .cmd_tx
            .send(SimCommand::Impulse {
                x: 4,
                y: 4,
                displacement: Vec2::new(0.5, 0.0),
                radius: 2,
                color: Rgb::new(1.0, 0.0, 0.0),
            })
            .unwrap();

        // The impulse is drained before some upcoming step; poll a bounded
        // number of snapshots for the dye to appear.
        let mut seen = false;
        for _ in 0..50 {
            let snap = channels.snap_rx.recv().expect("snapshot");
            seen = snap.dye.iter().any(|c| !c.is_black());
            let _ = channels.snap_return_tx.send(snap);
            if seen {
                break;
            }
        }
        assert!(seen, "injected dye should appear in a snapshot");

        running.store(false, Ordering::SeqCst);
        drop(channels);
        handle.join().unwrap();
    }

    #[test]
    fn test_clear_empties_dye() {
        let running = Arc::new(AtomicBool::new(true));
        let (channels, handle) = spawn_physics_thread(8, SimParams::default(), 1, running.clone());

        channels
            .cmd_tx
            .send(SimCommand::Impulse {
                x: 4,
                y: 4,
                displacement: Vec2::ZERO,
                radius: 2,
                color: Rgb::new(0.0, 1.0, 0.0),
            })
            .unwrap();

        let mut seen = false;
        for _ in 0..50 {
            let snap = channels.snap_rx.recv().expect("snapshot");
            seen = snap.dye.iter().any(|c| !c.is_black());
            let _ = channels.snap_return_tx.send(snap);
            if seen {
                break;
            }
        }
        assert!(seen, "dye should appear before the clear");

        // Once the clear is processed no impulse follows, so dye stays black.
        channels.cmd_tx.send(SimCommand::Clear).unwrap();
        let mut black = false;
        for _ in 0..50 {
            let snap = channels.snap_rx.recv().expect("snapshot");
            black = snap.dye.iter().all(|c| c.is_black());
            let _ = channels.snap_return_tx.send(snap);
            if black {
                break;
            }
        }
        assert!(black, "clear should empty the dye field");

        running.store(false, Ordering::SeqCst);
        drop(channels);
        handle.join().unwrap();
    }

    #[test]
    fn test_paused_dye_does_not_decay() {
        let running = Arc::new(AtomicBool::new(true));
        let (channels, handle) = spawn_physics_thread(8, SimParams::default(), 1, running.clone());

        let color = Rgb::new(0.25, 0.5, 0.75);
        channels.cmd_tx.send(SimCommand::SetPaused(true)).unwrap();
        channels
            .cmd_tx
            .send(SimCommand::Impulse {
                x: 4,
                y: 4,
                displacement: Vec2::ZERO,
                radius: 0,
                color,
            })
            .unwrap();

        // With stepping paused the painted cell keeps its exact color.
        let mut exact = false;
        for _ in 0..50 {
            let snap = channels.snap_rx.recv().expect("snapshot");
            exact = snap.dye[4 * 8 + 4] == color;
            let _ = channels.snap_return_tx.send(snap);
            if exact {
                break;
            }
        }
        assert!(exact, "paused sim must not advect or decay the dye");

        running.store(false, Ordering::SeqCst);
        drop(channels);
        handle.join().unwrap();
    }
}
