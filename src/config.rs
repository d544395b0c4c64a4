//! Options as a page would pass them, and the normalised configuration the
//! rotator runs with.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::constants::*;
use crate::easing::Easing;
use crate::error::RotatorError;
use crate::slide::{Size, StyleDelta};
use crate::transitions::{Choreography, ClipOrigin, CoverDirection};

/// Recognised options, camelCase like the plugin's option object.
/// Every field is optional; missing ones take the plugin defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RotatorOptions {
    pub fx: String,
    /// Milliseconds between transitions, 0 for manual only.
    pub timeout: u64,
    pub speed: u64,
    pub speed_in: Option<u64>,
    pub speed_out: Option<u64>,
    pub sync: bool,
    pub continuous: bool,
    pub random: bool,
    pub nowrap: bool,
    #[serde(alias = "pauseOnHover")]
    pub pause: bool,
    pub autostop: bool,
    pub autostop_count: Option<usize>,
    pub starting_slide: usize,
    /// Extra milliseconds before the first transition, may be negative.
    pub delay: i64,
    pub easing: Option<Easing>,
    pub ease_in: Option<Easing>,
    pub ease_out: Option<Easing>,
    pub fast_on_event: bool,
    pub fit: bool,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub container_resize: bool,
    pub direction: CoverDirection,
    pub clip: ClipOrigin,
    pub css_before: StyleDelta,
    pub anim_in: StyleDelta,
    pub anim_out: StyleDelta,
    pub css_after: StyleDelta,
    /// Shows the viewer's pager dots when set.
    pub pager: Option<String>,
    /// Key name the viewer binds to the next slide.
    pub next: Option<String>,
    /// Key name the viewer binds to the previous slide.
    pub prev: Option<String>,
}

impl Default for RotatorOptions {
    fn default() -> Self {
        Self {
            fx: DEFAULT_FX.to_string(),
            timeout: DEFAULT_TIMEOUT_MS,
            speed: DEFAULT_SPEED_MS,
            speed_in: None,
            speed_out: None,
            sync: true,
            continuous: false,
            random: false,
            nowrap: false,
            pause: false,
            autostop: false,
            autostop_count: None,
            starting_slide: 0,
            delay: 0,
            easing: None,
            ease_in: None,
            ease_out: None,
            fast_on_event: false,
            fit: false,
            width: None,
            height: None,
            container_resize: true,
            direction: CoverDirection::default(),
            clip: ClipOrigin::default(),
            css_before: StyleDelta::default(),
            anim_in: StyleDelta::default(),
            anim_out: StyleDelta::default(),
            css_after: StyleDelta::default(),
            pager: None,
            next: None,
            prev: None,
        }
    }
}

impl RotatorOptions {
    pub fn from_json(json: &str) -> Result<Self, RotatorError> {
        serde_json::from_str(json).map_err(|e| RotatorError::InvalidOption {
            name: "options",
            reason: e.to_string(),
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self, RotatorError> {
        let json = fs::read_to_string(path).map_err(|e| RotatorError::InvalidOption {
            name: "options",
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_json(&json)
    }

    /// Resolves defaults and keeps timeout and speed consistent.
    pub fn normalize(&self) -> RotatorConfig {
        let mut timeout = self.timeout;
        let mut speed = self.speed;
        if timeout > 0 {
            if !self.sync {
                speed /= 2;
            }
            if speed == 0 {
                timeout = timeout.max(MIN_DWELL_MS);
            }
            while speed > 0 && timeout < speed + MIN_DWELL_MS {
                timeout += speed;
            }
        }

        let order = if self.random {
            Order::Random
        } else if timeout == 0 && !self.continuous {
            Order::Manual
        } else {
            Order::Sequential
        };

        let autostop = match (self.autostop, self.autostop_count) {
            (false, _) => Autostop::Off,
            (true, Some(count)) if count > 0 => Autostop::After(count),
            (true, _) => Autostop::SlideCount,
        };

        let fit = match (self.fit, self.width, self.height) {
            (true, Some(width), Some(height)) => Some(Size::new(width, height)),
            _ => None,
        };

        RotatorConfig {
            fx: self.fx.clone(),
            timeout: Duration::from_millis(timeout),
            speed_in: Duration::from_millis(self.speed_in.unwrap_or(speed)),
            speed_out: Duration::from_millis(self.speed_out.unwrap_or(speed)),
            ease_in: self.ease_in.or(self.easing).unwrap_or_default(),
            ease_out: self.ease_out.or(self.easing).unwrap_or_default(),
            sync: self.sync,
            order,
            wrap: !self.nowrap,
            pause_on_hover: self.pause,
            continuous: self.continuous,
            autostop,
            starting_slide: self.starting_slide,
            delay_ms: self.delay,
            fast_on_event: self.fast_on_event,
            fit,
            container: match (self.width, self.height) {
                (Some(width), Some(height)) => Some(Size::new(width, height)),
                _ => None,
            },
            container_resize: self.container_resize,
            direction: self.direction,
            clip: self.clip,
            custom: Choreography {
                curr_before: StyleDelta::default(),
                next_before: self.css_before,
                anim_in: self.anim_in,
                anim_out: self.anim_out,
                curr_after: self.css_after,
            },
            pager: self.pager.clone(),
            next: self.next.clone(),
            prev: self.prev.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Sequential,
    Random,
    /// Sequential, but only triggers move the show.
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Autostop {
    Off,
    /// Stop after as many automatic transitions as there are slides.
    SlideCount,
    After(usize),
}

/// Normalised configuration. Fixed once the rotator starts.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatorConfig {
    pub fx: String,
    pub timeout: Duration,
    pub speed_in: Duration,
    pub speed_out: Duration,
    pub ease_in: Easing,
    pub ease_out: Easing,
    pub sync: bool,
    pub order: Order,
    pub wrap: bool,
    pub pause_on_hover: bool,
    pub continuous: bool,
    pub autostop: Autostop,
    pub starting_slide: usize,
    pub delay_ms: i64,
    pub fast_on_event: bool,
    /// Forced slide size (`fit` with both `width` and `height`).
    pub fit: Option<Size>,
    /// Explicit container size.
    pub container: Option<Size>,
    pub container_resize: bool,
    pub direction: CoverDirection,
    pub clip: ClipOrigin,
    pub custom: Choreography,
    pub pager: Option<String>,
    pub next: Option<String>,
    pub prev: Option<String>,
}

impl RotatorConfig {
    /// Whether a timer ever moves the show.
    pub fn auto_advance(&self) -> bool {
        self.order != Order::Manual && (!self.timeout.is_zero() || self.continuous)
    }

    /// Delay before the first automatic transition.
    pub fn first_delay(&self) -> Duration {
        if self.continuous {
            return CONTINUOUS_DELAY;
        }
        let millis = self.timeout.as_millis() as i64 + self.delay_ms;
        Duration::from_millis(millis.max(0) as u64)
    }
}

impl Default for RotatorConfig {
    fn default() -> Self {
        RotatorOptions::default().normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RotatorConfig::default();
        assert_eq!(config.fx, "fade");
        assert_eq!(config.timeout, Duration::from_millis(4000));
        assert_eq!(config.speed_in, Duration::from_millis(1000));
        assert_eq!(config.order, Order::Sequential);
        assert!(config.wrap);
        assert!(config.auto_advance());
        assert_eq!(config.ease_in, Easing::Swing);
    }

    #[test]
    fn test_timeout_grows_to_fit_speed() {
        let options = RotatorOptions { timeout: 1000, speed: 900, ..RotatorOptions::default() };
        assert_eq!(options.normalize().timeout, Duration::from_millis(1900));
    }

    #[test]
    fn test_unsynced_halves_speed() {
        let options = RotatorOptions { sync: false, speed: 1000, ..RotatorOptions::default() };
        let config = options.normalize();
        assert_eq!(config.speed_in, Duration::from_millis(500));
        assert_eq!(config.speed_out, Duration::from_millis(500));
    }

    #[test]
    fn test_zero_timeout_is_manual() {
        let options = RotatorOptions { timeout: 0, ..RotatorOptions::default() };
        let config = options.normalize();
        assert_eq!(config.order, Order::Manual);
        assert!(!config.auto_advance());

        let continuous = RotatorOptions { timeout: 0, continuous: true, ..RotatorOptions::default() };
        assert!(continuous.normalize().auto_advance());
    }

    #[test]
    fn test_autostop_variants() {
        let on = RotatorOptions { autostop: true, ..RotatorOptions::default() };
        assert_eq!(on.normalize().autostop, Autostop::SlideCount);
        let counted = RotatorOptions { autostop: true, autostop_count: Some(3), ..RotatorOptions::default() };
        assert_eq!(counted.normalize().autostop, Autostop::After(3));
        assert_eq!(RotatorOptions::default().normalize().autostop, Autostop::Off);
    }

    #[test]
    fn test_first_delay_adds_signed_delay() {
        let options = RotatorOptions { delay: -1000, ..RotatorOptions::default() };
        assert_eq!(options.normalize().first_delay(), Duration::from_millis(3000));
        let options = RotatorOptions { delay: -9000, ..RotatorOptions::default() };
        assert_eq!(options.normalize().first_delay(), Duration::ZERO);
    }

    #[test]
    fn test_options_from_json() {
        let options = RotatorOptions::from_json(
            r#"{
                "fx": "scrollHorz",
                "timeout": 0,
                "speedIn": 300,
                "nowrap": true,
                "pauseOnHover": true,
                "easing": "easeOutCubic",
                "direction": "up",
                "cssBefore": { "opacity": 0 }
            }"#,
        )
        .unwrap();
        let config = options.normalize();
        assert_eq!(config.fx, "scrollHorz");
        assert_eq!(config.speed_in, Duration::from_millis(300));
        assert_eq!(config.speed_out, Duration::from_millis(1000));
        assert!(!config.wrap);
        assert!(config.pause_on_hover);
        assert_eq!(config.ease_out, Easing::CubicOut);
        assert_eq!(config.direction, CoverDirection::Up);
        assert_eq!(config.custom.next_before.opacity, Some(0.0));
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let err = RotatorOptions::from_json(r#"{"cleartype": true}"#).unwrap_err();
        assert!(matches!(err, RotatorError::InvalidOption { name: "options", .. }));
    }
}
