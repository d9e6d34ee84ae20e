use std::ops::{Add, AddAssign, Mul, Sub};

/// 2-component velocity / displacement vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f64) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }
}

/// Dye color with components in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn is_black(self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }
}

impl Add for Rgb {
    type Output = Rgb;
    fn add(self, rhs: Rgb) -> Rgb {
        Rgb::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl Mul<f64> for Rgb {
    type Output = Rgb;
    fn mul(self, s: f64) -> Rgb {
        Rgb::new(self.r * s, self.g * s, self.b * s)
    }
}

/// Element types the field kernels operate on: scalars (`f64`), velocity
/// (`Vec2`) and dye (`Rgb`). Zero default, addition and scaling are all the
/// advection and relaxation stencils need.
pub trait CellValue:
    Copy + Default + Add<Output = Self> + Mul<f64, Output = Self> + Send + Sync + 'static
{
}

impl<T> CellValue for T where
    T: Copy + Default + Add<Output = T> + Mul<f64, Output = T> + Send + Sync + 'static
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_add_scale() {
        let v = Vec2::new(1.0, -2.0) + Vec2::new(0.5, 0.5);
        assert_eq!(v, Vec2::new(1.5, -1.5));
        assert_eq!(v * 2.0, Vec2::new(3.0, -3.0));
    }

    #[test]
    fn test_vec2_default_is_zero() {
        assert_eq!(Vec2::default(), Vec2::ZERO);
    }

    #[test]
    fn test_vec2_length() {
        assert!((Vec2::new(3.0, 4.0).length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_rgb_add_scale() {
        let c = Rgb::new(0.2, 0.4, 0.6) * 0.5;
        assert_eq!(c, Rgb::new(0.1, 0.2, 0.3));
        assert_eq!(c + c, Rgb::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn test_rgb_black() {
        assert!(Rgb::default().is_black());
        assert!(!Rgb::new(0.0, 0.1, 0.0).is_black());
    }
}
