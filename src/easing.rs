use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::RotatorError;

/// Easing curves, named the way the jQuery easing plugin names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Easing {
    Linear,
    #[default]
    Swing,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    SineInOut,
    BackIn,
    BackOut,
}

impl Easing {
    fn curve(self) -> fn(f32) -> f32 {
        match self {
            Easing::Linear => simple_easing::linear,
            // jQuery's swing is the sine in-out curve
            Easing::Swing => simple_easing::sine_in_out,
            Easing::QuadIn => simple_easing::quad_in,
            Easing::QuadOut => simple_easing::quad_out,
            Easing::QuadInOut => simple_easing::quad_in_out,
            Easing::CubicIn => simple_easing::cubic_in,
            Easing::CubicOut => simple_easing::cubic_out,
            Easing::CubicInOut => simple_easing::cubic_in_out,
            Easing::SineInOut => simple_easing::sine_in_out,
            Easing::BackIn => simple_easing::back_in,
            Easing::BackOut => simple_easing::back_out,
        }
    }

    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        (self.curve())(t.clamp(0.0, 1.0))
    }

    fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::Swing => "swing",
            Easing::QuadIn => "easeInQuad",
            Easing::QuadOut => "easeOutQuad",
            Easing::QuadInOut => "easeInOutQuad",
            Easing::CubicIn => "easeInCubic",
            Easing::CubicOut => "easeOutCubic",
            Easing::CubicInOut => "easeInOutCubic",
            Easing::SineInOut => "easeInOutSine",
            Easing::BackIn => "easeInBack",
            Easing::BackOut => "easeOutBack",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = RotatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let easing = match s {
            "linear" => Easing::Linear,
            "swing" => Easing::Swing,
            "easeInQuad" | "quad_in" => Easing::QuadIn,
            "easeOutQuad" | "quad_out" => Easing::QuadOut,
            "easeInOutQuad" | "quad_in_out" => Easing::QuadInOut,
            "easeInCubic" | "cubic_in" => Easing::CubicIn,
            "easeOutCubic" | "cubic_out" => Easing::CubicOut,
            "easeInOutCubic" | "cubic_in_out" => Easing::CubicInOut,
            "easeInOutSine" | "sine_in_out" => Easing::SineInOut,
            "easeInBack" | "back_in" => Easing::BackIn,
            "easeOutBack" | "back_out" => Easing::BackOut,
            other => {
                return Err(RotatorError::InvalidOption {
                    name: "easing",
                    reason: format!("unknown easing {other:?}"),
                });
            }
        };
        Ok(easing)
    }
}

impl TryFrom<String> for Easing {
    type Error = RotatorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Interpolates one value over a fixed duration, advanced by frame time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    easing: Easing,
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl Tween {
    pub fn new(easing: Easing, from: f32, to: f32, duration: f32) -> Self {
        Self { easing, from, to, duration, elapsed: 0.0 }
    }

    /// Advances by `dt` seconds and returns the new value.
    pub fn apply(&mut self, dt: f32) -> f32 {
        self.elapsed += dt;
        self.value()
    }

    pub fn value(&self) -> f32 {
        self.from + (self.to - self.from) * self.easing.apply(self.progress())
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in [
            Easing::Linear,
            Easing::Swing,
            Easing::QuadInOut,
            Easing::CubicOut,
            Easing::SineInOut,
            Easing::BackIn,
            Easing::BackOut,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-5, "{easing} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-5, "{easing} at 1");
        }
    }

    #[test]
    fn test_named_curves() {
        assert_eq!(Easing::CubicOut.apply(0.3), simple_easing::cubic_out(0.3));
        assert_eq!(Easing::BackIn.apply(0.6), simple_easing::back_in(0.6));
        assert_eq!(Easing::Swing.apply(0.2), simple_easing::sine_in_out(0.2));
        assert_eq!(Easing::QuadOut.apply(1.7), 1.0);
    }

    #[test]
    fn test_swing_is_symmetric() {
        assert!((Easing::Swing.apply(0.5) - 0.5).abs() < 1e-6);
        let a = Easing::Swing.apply(0.25);
        let b = Easing::Swing.apply(0.75);
        assert!((a + b - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("easeOutCubic".parse::<Easing>().unwrap(), Easing::CubicOut);
        assert_eq!("cubic_out".parse::<Easing>().unwrap(), Easing::CubicOut);
        assert!("bounce".parse::<Easing>().is_err());
    }

    #[test]
    fn test_tween_reaches_target() {
        let mut tween = Tween::new(Easing::Linear, 10.0, 20.0, 1.0);
        assert_eq!(tween.apply(0.5), 15.0);
        assert!(!tween.is_finished());
        assert_eq!(tween.apply(0.75), 20.0);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_zero_duration_tween_is_done() {
        let tween = Tween::new(Easing::Swing, 0.0, 1.0, 0.0);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 1.0);
    }
}
