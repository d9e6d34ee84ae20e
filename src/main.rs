mod brush;
mod config;
mod grid;
mod math;
mod partition;
mod physics;
mod renderer;
mod solver;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use math::Vec2;
use physics::{spawn_physics_thread, PhysicsChannels, SimCommand};
use solver::DyeSnapshot;

fn main() {
    let cfg = config::load();
    let grid_size = cfg.sim.grid_size.max(1);
    let mut params = cfg.sim.params();

    let mut render_cfg =
        renderer::RenderConfig::fit(cfg.display.width, cfg.display.height, grid_size);
    let mut w = render_cfg.display_width;
    let mut h = render_cfg.display_height;

    let mut window = Window::new(
        "dyetide",
        w,
        h,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )
    .expect("Failed to create window");

    window.set_target_fps(cfg.display.target_fps);

    // Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    let (channels, physics_thread) = spawn_physics_thread(
        grid_size,
        params.clone(),
        cfg.display.steps_per_frame.max(1),
        running.clone(),
    );
    let PhysicsChannels {
        cmd_tx,
        snap_rx,
        snap_return_tx,
    } = channels;

    // Main thread: render + display
    let mut framebuf = vec![0u32; w * h];
    let mut rgba_buf: Vec<u8> = Vec::new();
    let mut frame: u32 = 0;
    let mut frame_count = 0u32;
    let mut last_fps_time = Instant::now();
    let mut last_snap: Option<DyeSnapshot> = None;
    let mut prev_cell: Option<(i32, i32)> = None;
    let mut paused = false;

    while window.is_open() && running.load(Ordering::SeqCst) {
        // --- Keyboard handling ---
        if window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            break;
        }

        // Space: pause/resume stepping
        if window.is_key_pressed(Key::Space, KeyRepeat::No) {
            paused = !paused;
            let _ = cmd_tx.send(SimCommand::SetPaused(paused));
        }

        // C: clear all fields
        if window.is_key_pressed(Key::C, KeyRepeat::No) {
            let _ = cmd_tx.send(SimCommand::Clear);
        }

        // Up/Down: viscosity, Left/Right: dye decay
        let mut params_changed = false;
        if window.is_key_pressed(Key::Up, KeyRepeat::Yes) {
            params.viscosity *= 2.0;
            params_changed = true;
        }
        if window.is_key_pressed(Key::Down, KeyRepeat::Yes) {
            params.viscosity /= 2.0;
            params_changed = true;
        }
        if window.is_key_pressed(Key::Right, KeyRepeat::Yes) {
            params.dye_decay = (params.dye_decay + 0.01).min(1.0);
            params_changed = true;
        }
        if window.is_key_pressed(Key::Left, KeyRepeat::Yes) {
            params.dye_decay = (params.dye_decay - 0.01).max(0.0);
            params_changed = true;
        }
        if params_changed {
            let _ = cmd_tx.send(SimCommand::SetParams(params.clone()));
        }

        // --- Check for window resize ---
        let (new_w, new_h) = window.get_size();
        if new_w != w || new_h != h {
            render_cfg = renderer::RenderConfig::fit(new_w, new_h, grid_size);
            w = render_cfg.display_width;
            h = render_cfg.display_height;
            framebuf = vec![0u32; w * h];
            if let Some(ref s) = last_snap {
                renderer::render_into(s, &render_cfg, &mut rgba_buf);
                renderer::rgba_to_argb(&rgba_buf, &mut framebuf);
            }
        }

        // --- Mouse drag: inject dye and velocity along the cursor path ---
        if window.get_mouse_down(MouseButton::Left) {
            if let Some((mx, my)) = window.get_mouse_pos(MouseMode::Clamp) {
                let (cx, cy) =
                    render_cfg.pixel_to_cell(mx as usize, my as usize, grid_size, grid_size);
                let displacement = match prev_cell {
                    Some((px, py)) => {
                        Vec2::new((cx - px) as f64, (cy - py) as f64) * cfg.brush.gain
                    }
                    None => Vec2::ZERO,
                };
                let _ = cmd_tx.send(SimCommand::Impulse {
                    x: cx,
                    y: cy,
                    displacement,
                    radius: cfg.brush.radius,
                    color: brush::brush_color(frame, cfg.brush.hue_step),
                });
                prev_cell = Some((cx, cy));
            }
        } else {
            prev_cell = None;
        }

        // --- Non-blocking: grab latest snapshot if available ---
        let mut snap = None;
        while let Ok(s) = snap_rx.try_recv() {
            snap = Some(s);
        }

        if let Some(s) = snap {
            renderer::render_into(&s, &render_cfg, &mut rgba_buf);
            renderer::rgba_to_argb(&rgba_buf, &mut framebuf);
            // Return old snapshot buffer to physics thread for reuse
            if let Some(old) = last_snap.take() {
                let _ = snap_return_tx.send(old);
            }
            last_snap = Some(s);
        }

        window.update_with_buffer(&framebuf, w, h).unwrap();

        frame += 1;
        frame_count += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            window.set_title(&format!(
                "dyetide — {frame_count} fps — visc {:.4} decay {:.2}{}",
                params.viscosity,
                params.dye_decay,
                if paused { " [paused]" } else { "" }
            ));
            frame_count = 0;
            last_fps_time = now;
        }
    }

    // Shutdown
    running.store(false, Ordering::SeqCst);
    drop(snap_rx);
    let _ = physics_thread.join();
}
