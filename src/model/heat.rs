//! Flame gradient used for heat coloring.

use serde::{Serialize, Serializer};
use std::f64::consts::PI;
use std::fmt;

/// An RGB heat color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl HeatColor {
    pub const BLACK: HeatColor = HeatColor {
        red: 0,
        green: 0,
        blue: 0,
    };
}

impl fmt::Display for HeatColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.red, self.green, self.blue)
    }
}

impl Serialize for HeatColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// (start, end) of each channel's ramp; starts below 0 put the channel
// part way up its curve at the cold end
const RED_RAMP: (f64, f64) = (-0.5, 0.5);
const GREEN_RAMP: (f64, f64) = (0.2, 1.0);
const BLUE_RAMP: (f64, f64) = (-0.7, 1.0);

/// Map a position in `[0, 1]` onto the purple → red → orange → white gradient
pub fn flame_gradient(decimal: f64) -> HeatColor {
    HeatColor {
        red: channel(sinusoidal_decimal(decimal, RED_RAMP)),
        green: channel(sinusoidal_decimal(decimal, GREEN_RAMP)),
        blue: channel(sinusoidal_decimal(decimal, BLUE_RAMP)),
    }
}

/// Half sine wave easing from 0 at `start` to 1 at `end`, clamped outside
fn sinusoidal_decimal(decimal: f64, (start, end): (f64, f64)) -> f64 {
    let position = (decimal - start) / (end - start);
    if position <= 0.0 {
        0.0
    } else if position >= 1.0 {
        1.0
    } else {
        ((PI * (position - 0.5)).sin() + 1.0) / 2.0
    }
}

fn channel(intensity: f64) -> u8 {
    (255.0 * intensity.clamp(0.0, 1.0)).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_ends() {
        assert_eq!(
            flame_gradient(0.0),
            HeatColor {
                red: 128,
                green: 0,
                blue: 93
            }
        );
        assert_eq!(
            flame_gradient(1.0),
            HeatColor {
                red: 255,
                green: 255,
                blue: 255
            }
        );
    }

    #[test]
    fn test_gradient_known_points() {
        let rgb = |decimal: f64| flame_gradient(decimal).to_string();
        assert_eq!(rgb(0.25), "rgb(218, 2, 151)");
        assert_eq!(rgb(0.5), "rgb(255, 79, 204)");
        assert_eq!(rgb(0.95), "rgb(255, 253, 254)");
    }

    #[test]
    fn test_sinusoidal_decimal_clamps() {
        assert_eq!(sinusoidal_decimal(-1.0, RED_RAMP), 0.0);
        assert_eq!(sinusoidal_decimal(0.0, RED_RAMP), 0.5);
        assert_eq!(sinusoidal_decimal(0.5, RED_RAMP), 1.0);
        assert_eq!(sinusoidal_decimal(0.1, GREEN_RAMP), 0.0);
    }

    #[test]
    fn test_gradient_is_monotonic() {
        let mut previous = flame_gradient(0.0);
        for step in 1..=100 {
            let color = flame_gradient(step as f64 / 100.0);
            assert!(color.red >= previous.red);
            assert!(color.green >= previous.green);
            assert!(color.blue >= previous.blue);
            previous = color;
        }
    }

    #[test]
    fn test_display_format() {
        let color = HeatColor {
            red: 255,
            green: 128,
            blue: 0,
        };
        assert_eq!(color.to_string(), "rgb(255, 128, 0)");
        assert_eq!(serde_json::to_value(color).unwrap(), "rgb(255, 128, 0)");
    }
}
