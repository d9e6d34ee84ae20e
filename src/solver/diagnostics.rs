use crate::grid::Grid;
use crate::math::{Rgb, Vec2};

/// Mean absolute divergence of a velocity field, wrapped central differences:
/// `0.5/dx * ((vx(x+1,y) - vx(x-1,y)) + (vy(x,y+1) - vy(x,y-1)))`.
pub fn mean_abs_divergence(velocity: &Grid<Vec2>, dx: f64) -> f64 {
    let halfrdx = 0.5 / dx;
    let (w, h) = (velocity.width() as i32, velocity.height() as i32);
    let mut sum = 0.0;
    for y in 0..h {
        for x in 0..w {
            let div = halfrdx
                * ((velocity.get_wrapped(x + 1, y).x - velocity.get_wrapped(x - 1, y).x)
                    + (velocity.get_wrapped(x, y + 1).y - velocity.get_wrapped(x, y - 1).y));
            sum += div.abs();
        }
    }
    sum / (w * h) as f64
}

/// Volume-averaged kinetic energy: `0.5 * <vx² + vy²>`.
pub fn kinetic_energy(velocity: &Grid<Vec2>) -> f64 {
    let sum: f64 = velocity
        .as_slice()
        .iter()
        .map(|v| v.x * v.x + v.y * v.y)
        .sum();
    0.5 * sum / velocity.len() as f64
}

/// Total dye mass: sum of all components over all cells.
pub fn total_dye(dye: &Grid<Rgb>) -> f64 {
    dye.as_slice().iter().map(|c| c.r + c.g + c.b).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divergence_zero_for_uniform_flow() {
        let mut v: Grid<Vec2> = Grid::new(8, 8);
        v.fill(Vec2::new(0.3, -0.7));
        let div = mean_abs_divergence(&v, 0.005);
        assert!(div.abs() < 1e-12, "uniform flow has zero divergence, got {}", div);
    }

    #[test]
    fn test_divergence_positive_for_source() {
        // Outward flow from the center of a 5x5 grid
        let mut v: Grid<Vec2> = Grid::new(5, 5);
        for y in 0..5 {
            for x in 0..5 {
                v.set(x, y, Vec2::new((x - 2) as f64, (y - 2) as f64));
            }
        }
        let div = mean_abs_divergence(&v, 1.0);
        assert!(div > 0.1, "source flow should diverge, got {}", div);
    }

    #[test]
    fn test_kinetic_energy_zero_at_rest() {
        let v: Grid<Vec2> = Grid::new(6, 6);
        assert_eq!(kinetic_energy(&v), 0.0);
    }

    #[test]
    fn test_kinetic_energy_uniform() {
        let mut v: Grid<Vec2> = Grid::new(4, 4);
        v.fill(Vec2::new(1.0, 0.0));
        assert!((kinetic_energy(&v) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_total_dye_sums_components() {
        let mut d: Grid<Rgb> = Grid::new(2, 2);
        d.set(0, 0, Rgb::new(0.5, 0.25, 0.25));
        d.set(1, 1, Rgb::new(1.0, 0.0, 0.0));
        assert!((total_dye(&d) - 2.0).abs() < 1e-12);
    }
}
