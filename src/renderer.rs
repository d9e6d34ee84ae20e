use crate::math::Rgb;
use crate::solver::DyeSnapshot;

/// Convert a dye color to RGBA. Components outside [0, 1] are clamped
/// before quantization.
pub fn dye_to_rgba(c: Rgb) -> [u8; 4] {
    [
        (c.r.clamp(0.0, 1.0) * 255.0) as u8,
        (c.g.clamp(0.0, 1.0) * 255.0) as u8,
        (c.b.clamp(0.0, 1.0) * 255.0) as u8,
        255,
    ]
}

/// Render layout mapping the simulation grid to window pixels.
pub struct RenderConfig {
    pub display_width: usize,
    pub display_height: usize,
}

impl RenderConfig {
    /// Fit the layout to the given pixel dimensions, never smaller than one
    /// pixel per cell.
    pub fn fit(pixel_width: usize, pixel_height: usize, grid_size: usize) -> Self {
        Self {
            display_width: pixel_width.max(grid_size),
            display_height: pixel_height.max(grid_size),
        }
    }

    /// Window pixel to grid cell, truncating division. The reverse of the
    /// nearest-neighbor upscale in `render_into`.
    pub fn pixel_to_cell(&self, px: usize, py: usize, grid_width: usize, grid_height: usize) -> (i32, i32) {
        let cx = (px * grid_width / self.display_width).min(grid_width - 1);
        let cy = (py * grid_height / self.display_height).min(grid_height - 1);
        (cx as i32, cy as i32)
    }
}

/// Render the dye field to an RGBA buffer by nearest-neighbor upscale,
/// reusing `buf` across frames.
pub fn render_into(snap: &DyeSnapshot, cfg: &RenderConfig, buf: &mut Vec<u8>) {
    let dw = cfg.display_width;
    let dh = cfg.display_height;
    buf.resize(dw * dh * 4, 0);

    for screen_y in 0..dh {
        let sim_y = (screen_y * snap.height / dh).min(snap.height - 1);
        let row = &snap.dye[sim_y * snap.width..(sim_y + 1) * snap.width];
        for screen_x in 0..dw {
            let sim_x = (screen_x * snap.width / dw).min(snap.width - 1);
            let rgba = dye_to_rgba(row[sim_x]);
            let offset = (screen_y * dw + screen_x) * 4;
            buf[offset..offset + 4].copy_from_slice(&rgba);
        }
    }
}

/// Pack an RGBA byte buffer into the 0RGB u32 layout minifb expects.
pub fn rgba_to_argb(rgba: &[u8], out: &mut Vec<u32>) {
    out.clear();
    out.extend(rgba.chunks_exact(4).map(|px| {
        ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | (px[2] as u32)
    }));
}
