use std::f64::consts::E;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TransitionError;

/// Shapes linear progress before channel interpolation.
///
/// Every curve maps 0 to 0 and 1 to 1. Parameter text accepts either the
/// name or its number (`0` linear through `6` exp).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Curve {
    #[default]
    Linear,
    Quadratic,
    Sqrt,
    Log,
    Pow10,
    Ln,
    Exp,
}

impl Curve {
    pub const ALL: [Curve; 7] =
        [Curve::Linear, Curve::Quadratic, Curve::Sqrt, Curve::Log, Curve::Pow10, Curve::Ln, Curve::Exp];

    /// Shaped fraction for linear progress `f`, clamped to [0, 1].
    pub fn apply(self, f: f32) -> f32 {
        let f = if f.is_finite() { f64::from(f.clamp(0.0, 1.0)) } else { 0.0 };
        let shaped = match self {
            Curve::Linear => f,
            Curve::Quadratic => f * f,
            Curve::Sqrt => f.sqrt(),
            Curve::Log => 1.0 + (f * 0.9 + 0.1).log10(),
            Curve::Pow10 => (10f64.powf(f) - 1.0) / 9.0,
            Curve::Ln => 1.0 + (f * (1.0 - 1.0 / E) + 1.0 / E).ln(),
            Curve::Exp => (f.exp() - 1.0) / (E - 1.0),
        };
        shaped.clamp(0.0, 1.0) as f32
    }
}

impl FromStr for Curve {
    type Err = TransitionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if let Ok(n) = raw.parse::<usize>() {
            return Curve::ALL.get(n).copied().ok_or_else(|| TransitionError::UnknownCurve(raw.to_owned()));
        }
        match raw.to_ascii_lowercase().as_str() {
            "" | "linear" => Ok(Curve::Linear),
            "quadratic" | "square" => Ok(Curve::Quadratic),
            "sqrt" => Ok(Curve::Sqrt),
            "log" | "log10" => Ok(Curve::Log),
            "pow10" | "10^n" => Ok(Curve::Pow10),
            "ln" => Ok(Curve::Ln),
            "exp" | "e^n" => Ok(Curve::Exp),
            _ => Err(TransitionError::UnknownCurve(raw.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for curve in Curve::ALL {
            assert!(curve.apply(0.0).abs() < 1e-6, "{curve:?} at 0");
            assert!((curve.apply(1.0) - 1.0).abs() < 1e-6, "{curve:?} at 1");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for curve in Curve::ALL {
            let mut last = 0.0;
            for i in 0..=20 {
                let v = curve.apply(i as f32 / 20.0);
                assert!(v >= last, "{curve:?} decreased at step {i}");
                last = v;
            }
        }
    }

    #[test]
    fn shapes_bend_the_right_way() {
        assert_eq!(Curve::Linear.apply(0.5), 0.5);
        assert_eq!(Curve::Quadratic.apply(0.5), 0.25);
        assert!(Curve::Sqrt.apply(0.25) > 0.49);
        assert!(Curve::Log.apply(0.5) > 0.5);
        assert!(Curve::Pow10.apply(0.5) < 0.5);
        assert!(Curve::Ln.apply(0.5) > 0.5);
        assert!(Curve::Exp.apply(0.5) < 0.5);
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        assert_eq!(Curve::Quadratic.apply(-1.0), 0.0);
        assert_eq!(Curve::Quadratic.apply(3.0), 1.0);
        assert_eq!(Curve::Linear.apply(f32::NAN), 0.0);
    }

    #[test]
    fn parses_names_and_numbers() {
        assert_eq!("".parse::<Curve>().unwrap(), Curve::Linear);
        assert_eq!("1".parse::<Curve>().unwrap(), Curve::Quadratic);
        assert_eq!("6".parse::<Curve>().unwrap(), Curve::Exp);
        assert_eq!(" Sqrt ".parse::<Curve>().unwrap(), Curve::Sqrt);
        assert!(matches!("7".parse::<Curve>(), Err(TransitionError::UnknownCurve(_))));
        assert!("wobble".parse::<Curve>().is_err());
    }
}
