use crate::math::Rgb;

/// Convert HSL to RGB over the six 60-degree hue sectors.
/// `h` is in degrees, `s` and `l` in [0, 1]; output components are in [0, 1].
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = chroma * (1.0 - ((hp % 2.0) - 1.0).abs());
    let (r, g, b) = match hp {
        hp if hp < 1.0 => (chroma, x, 0.0),
        hp if hp < 2.0 => (x, chroma, 0.0),
        hp if hp < 3.0 => (0.0, chroma, x),
        hp if hp < 4.0 => (0.0, x, chroma),
        hp if hp < 5.0 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    Rgb::new(r + m, g + m, b + m)
}

/// Brush color for a given frame: fully saturated, half lightness, hue
/// cycling `hue_step` degrees per frame.
pub fn brush_color(frame: u32, hue_step: u32) -> Rgb {
    hsl_to_rgb(((hue_step * frame) % 360) as f64, 1.0, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rgb_near(c: Rgb, r: f64, g: f64, b: f64) {
        assert!((c.r - r).abs() < 1e-12, "r: got {}, want {}", c.r, r);
        assert!((c.g - g).abs() < 1e-12, "g: got {}, want {}", c.g, g);
        assert!((c.b - b).abs() < 1e-12, "b: got {}, want {}", c.b, b);
    }

    #[test]
    fn test_primary_hues() {
        assert_rgb_near(hsl_to_rgb(0.0, 1.0, 0.5), 1.0, 0.0, 0.0);
        assert_rgb_near(hsl_to_rgb(120.0, 1.0, 0.5), 0.0, 1.0, 0.0);
        assert_rgb_near(hsl_to_rgb(240.0, 1.0, 0.5), 0.0, 0.0, 1.0);
    }

    #[test]
    fn test_secondary_hues() {
        assert_rgb_near(hsl_to_rgb(60.0, 1.0, 0.5), 1.0, 1.0, 0.0);
        assert_rgb_near(hsl_to_rgb(180.0, 1.0, 0.5), 0.0, 1.0, 1.0);
        assert_rgb_near(hsl_to_rgb(300.0, 1.0, 0.5), 1.0, 0.0, 1.0);
    }

    #[test]
    fn test_zero_saturation_is_gray() {
        let c = hsl_to_rgb(123.0, 0.0, 0.4);
        assert_rgb_near(c, 0.4, 0.4, 0.4);
    }

    #[test]
    fn test_lightness_extremes() {
        assert_rgb_near(hsl_to_rgb(200.0, 1.0, 0.0), 0.0, 0.0, 0.0);
        assert_rgb_near(hsl_to_rgb(200.0, 1.0, 1.0), 1.0, 1.0, 1.0);
    }

    #[test]
    fn test_components_in_unit_range() {
        let mut h = 0.0;
        while h < 360.0 {
            let c = hsl_to_rgb(h, 1.0, 0.5);
            for v in [c.r, c.g, c.b] {
                assert!((0.0..=1.0).contains(&v), "h={}: component {}", h, v);
            }
            h += 3.7;
        }
    }

    #[test]
    fn test_brush_color_cycles() {
        // hue_step=3: frame 120 wraps back to hue 0
        assert_eq!(brush_color(0, 3), brush_color(120, 3));
        assert_eq!(brush_color(7, 3), brush_color(127, 3));
    }

    #[test]
    fn test_brush_color_never_black() {
        for frame in 0..360 {
            assert!(!brush_color(frame, 3).is_black(), "frame {}", frame);
        }
    }
}
