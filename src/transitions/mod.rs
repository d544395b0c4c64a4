//! Named transition presets.
//!
//! A preset only describes styles: where the incoming panel starts, where
//! both panels animate to, and what the outgoing panel looks like once it is
//! gone. Moving the panels is the [`TransitionEngine`](crate::TransitionEngine)'s job.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::RotatorError;
use crate::slide::{Size, StyleDelta};

mod presets;

/// Styles for one transition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Choreography {
    /// Applied to the outgoing panel before anything moves.
    pub curr_before: StyleDelta,
    /// Applied to the incoming panel before anything moves.
    pub next_before: StyleDelta,
    /// Target of the outgoing animation.
    pub anim_out: StyleDelta,
    /// Target of the incoming animation.
    pub anim_in: StyleDelta,
    /// Applied to the outgoing panel once its animation is over.
    pub curr_after: StyleDelta,
}

/// Edge a `cover` / `uncover` transition moves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverDirection {
    #[default]
    Left,
    Right,
    Up,
    Down,
}

/// Where a `wipe` reveal starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipOrigin {
    #[default]
    Corner,
    L2r,
    R2l,
    T2b,
    B2t,
    Zoom,
}

/// Geometry of the step being choreographed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub container: Size,
    pub outgoing: Size,
    pub incoming: Size,
    pub forward: bool,
    pub direction: CoverDirection,
    pub clip: ClipOrigin,
}

pub trait Transition: Send + Sync {
    fn choreograph(&self, step: &Step) -> Choreography;
}

impl<F> Transition for F
where
    F: Fn(&Step) -> Choreography + Send + Sync,
{
    fn choreograph(&self, step: &Step) -> Choreography {
        self(step)
    }
}

/// Fixed styles supplied through the options (`cssBefore`, `animIn`,
/// `animOut`, `cssAfter`). With no styles at all it is a plain cut.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Custom(pub Choreography);

impl Transition for Custom {
    fn choreograph(&self, _step: &Step) -> Choreography {
        self.0
    }
}

pub const CUSTOM: &str = "custom";

#[derive(Clone)]
pub struct TransitionRegistry {
    presets: HashMap<String, Arc<dyn Transition>>,
}

impl TransitionRegistry {
    pub fn empty() -> Self {
        Self { presets: HashMap::new() }
    }

    /// Registers `transition` under `name`, returning the preset it replaced.
    pub fn register<T>(&mut self, name: impl Into<String>, transition: T) -> Option<Arc<dyn Transition>>
    where
        T: Transition + 'static,
    {
        self.presets.insert(name.into(), Arc::new(transition))
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Transition>, RotatorError> {
        self.presets
            .get(name)
            .cloned()
            .ok_or_else(|| RotatorError::UnknownTransition(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for TransitionRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        presets::register_all(&mut registry);
        registry
    }
}

impl fmt::Debug for TransitionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionRegistry").field("presets", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(forward: bool) -> Step {
        Step {
            container: Size::new(400.0, 300.0),
            outgoing: Size::new(400.0, 300.0),
            incoming: Size::new(200.0, 100.0),
            forward,
            direction: CoverDirection::Left,
            clip: ClipOrigin::Corner,
        }
    }

    #[test]
    fn test_default_registry_has_presets() {
        let registry = TransitionRegistry::default();
        for name in ["fade", "scrollLeft", "scrollHorz", "zoom", "cover", "uncover", "wipe", "toss"] {
            assert!(registry.contains(name), "{name} missing");
        }
        assert!(!registry.contains(CUSTOM));
    }

    #[test]
    fn test_unknown_transition() {
        let registry = TransitionRegistry::default();
        let err = registry.get("spin").err();
        assert_eq!(err, Some(RotatorError::UnknownTransition("spin".into())));
    }

    #[test]
    fn test_register_closure() {
        let mut registry = TransitionRegistry::empty();
        registry.register("cut", |_: &Step| Choreography::default());
        assert_eq!(registry.names(), vec!["cut"]);
        let choreography = registry.get("cut").unwrap().choreograph(&step(true));
        assert_eq!(choreography, Choreography::default());
    }

    #[test]
    fn test_fade_crossfades() {
        let fade = TransitionRegistry::default().get("fade").unwrap();
        let c = fade.choreograph(&step(true));
        assert_eq!(c.next_before.opacity, Some(0.0));
        assert_eq!(c.anim_in.opacity, Some(1.0));
        assert_eq!(c.anim_out.opacity, Some(0.0));
    }

    #[test]
    fn test_scroll_horz_follows_direction() {
        let scroll = TransitionRegistry::default().get("scrollHorz").unwrap();
        let forward = scroll.choreograph(&step(true));
        let backward = scroll.choreograph(&step(false));
        assert_eq!(forward.next_before.left, Some(200.0));
        assert_eq!(forward.anim_out.left, Some(-400.0));
        assert_eq!(backward.next_before.left, Some(-200.0));
        assert_eq!(backward.anim_out.left, Some(400.0));
    }

    #[test]
    fn test_cover_direction() {
        let cover = TransitionRegistry::default().get("cover").unwrap();
        let mut s = step(true);
        s.direction = CoverDirection::Down;
        let c = cover.choreograph(&s);
        assert_eq!(c.next_before.top, Some(-300.0));
        assert_eq!(c.next_before.z_index, Some(2));
    }

    #[test]
    fn test_wipe_starts_clipped() {
        let wipe = TransitionRegistry::default().get("wipe").unwrap();
        let mut s = step(true);
        s.clip = ClipOrigin::L2r;
        let c = wipe.choreograph(&s);
        let clip = c.next_before.clip.unwrap();
        assert_eq!((clip.right, clip.bottom), (0.0, 300.0));
        assert_eq!(c.anim_in.clip.unwrap().right, 400.0);
    }
}
