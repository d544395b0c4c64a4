use std::time::Duration;

use tracing::{debug, warn};

use crate::easing::{Easing, Tween};
use crate::engine::{Completion, TransitionEngine, TransitionRequest, prepare, settle};
use crate::slide::{ClipRect, Panel, StyleDelta};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Property {
    Opacity,
    Left,
    Top,
    Width,
    Height,
}

impl Property {
    fn read(self, panel: &Panel) -> f32 {
        let style = &panel.style;
        match self {
            Property::Opacity => style.opacity,
            Property::Left => style.left,
            Property::Top => style.top,
            Property::Width => style.width,
            Property::Height => style.height,
        }
    }

    fn write(self, panel: &mut Panel, value: f32) {
        let delta = StyleDelta::default();
        let delta = match self {
            Property::Opacity => delta.opacity(value),
            Property::Left => delta.left(value),
            Property::Top => delta.top(value),
            Property::Width => delta.width(value),
            Property::Height => delta.height(value),
        };
        panel.apply(&delta);
    }
}

/// One panel animating towards a target style.
#[derive(Debug)]
struct Animation {
    panel: usize,
    tweens: Vec<(Property, Tween)>,
    clip: Option<(ClipRect, ClipRect, Tween)>,
    clock: Tween,
}

impl Animation {
    fn start(panel: usize, panels: &mut [Panel], target: &StyleDelta, easing: Easing, duration: Duration) -> Self {
        let secs = duration.as_secs_f32();
        let mut animation = Self {
            panel,
            tweens: Vec::new(),
            clip: None,
            clock: Tween::new(Easing::Linear, 0.0, 1.0, secs),
        };
        let Some(p) = panels.get_mut(panel) else {
            return animation;
        };

        // Flags jump straight to their final value.
        p.apply(&StyleDelta { visible: target.visible, z_index: target.z_index, ..StyleDelta::default() });

        let numeric = [
            (Property::Opacity, target.opacity),
            (Property::Left, target.left),
            (Property::Top, target.top),
            (Property::Width, target.width),
            (Property::Height, target.height),
        ];
        for (property, to) in numeric {
            if let Some(to) = to {
                animation.tweens.push((property, Tween::new(easing, property.read(p), to, secs)));
            }
        }
        if let Some(to) = target.clip {
            let from = p.style.clip.unwrap_or(ClipRect::new(0.0, p.style.width, p.style.height, 0.0));
            animation.clip = Some((from, to, Tween::new(easing, 0.0, 1.0, secs)));
        }
        animation
    }

    /// Returns true once the animation is over.
    fn step(&mut self, panels: &mut [Panel], dt: f32) -> bool {
        if let Some(panel) = panels.get_mut(self.panel) {
            for (property, tween) in self.tweens.iter_mut() {
                property.write(panel, tween.apply(dt));
            }
            if let Some((from, to, tween)) = self.clip.as_mut() {
                let t = tween.apply(dt);
                panel.style.clip = Some(from.lerp(*to, t));
            }
        }
        self.clock.apply(dt);
        self.clock.is_finished()
    }
}

#[derive(Debug)]
struct Active {
    request: TransitionRequest,
    outgoing: Option<Animation>,
    incoming: Option<Animation>,
    incoming_started: bool,
    done: Completion,
}

/// Frame-driven engine: the outgoing panel animates out, then (or, with
/// `sync`, meanwhile) the incoming one animates in.
#[derive(Debug, Default)]
pub struct TweenEngine {
    active: Option<Active>,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jumps the running transition to its end.
    pub fn finish_now(&mut self, panels: &mut [Panel]) {
        if let Some(active) = self.active.take() {
            settle(panels, &active.request);
            active.done.complete();
        }
    }
}

impl TransitionEngine for TweenEngine {
    fn run(&mut self, panels: &mut [Panel], request: TransitionRequest, done: Completion) {
        if self.active.is_some() {
            warn!("transition started while another was running; finishing the previous one");
            self.finish_now(panels);
        }
        if request.outgoing >= panels.len() || request.incoming >= panels.len() {
            warn!(outgoing = request.outgoing, incoming = request.incoming, "transition panels out of range");
            done.complete();
            return;
        }

        prepare(panels, &request);
        let choreography = request.choreography;
        let outgoing = Animation::start(
            request.outgoing,
            panels,
            &choreography.anim_out,
            request.ease_out,
            request.speed_out,
        );
        let incoming = request.sync.then(|| {
            Animation::start(request.incoming, panels, &choreography.anim_in, request.ease_in, request.speed_in)
        });
        debug!(
            outgoing = request.outgoing,
            incoming = request.incoming,
            sync = request.sync,
            "tween transition started"
        );
        self.active = Some(Active {
            incoming_started: incoming.is_some(),
            request,
            outgoing: Some(outgoing),
            incoming,
            done,
        });
    }

    fn update(&mut self, panels: &mut [Panel], dt: Duration) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let dt = dt.as_secs_f32();
        let incoming_was_running = active.incoming.is_some();

        if let Some(outgoing) = active.outgoing.as_mut() {
            if outgoing.step(panels, dt) {
                active.outgoing = None;
                if let Some(panel) = panels.get_mut(active.request.outgoing) {
                    panel.apply(&active.request.choreography.curr_after);
                }
                if !active.incoming_started {
                    let request = &active.request;
                    active.incoming = Some(Animation::start(
                        request.incoming,
                        panels,
                        &request.choreography.anim_in,
                        request.ease_in,
                        request.speed_in,
                    ));
                    active.incoming_started = true;
                }
            }
        }

        if incoming_was_running {
            if let Some(incoming) = active.incoming.as_mut() {
                if incoming.step(panels, dt) {
                    active.incoming = None;
                }
            }
        }

        if active.outgoing.is_none() && active.incoming.is_none() && active.incoming_started {
            self.finish_now(panels);
        }
    }

    fn slide_inserted(&mut self, index: usize) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let shift = |i: &mut usize| {
            if *i >= index {
                *i += 1;
            }
        };
        shift(&mut active.request.outgoing);
        shift(&mut active.request.incoming);
        if let Some(animation) = active.outgoing.as_mut() {
            shift(&mut animation.panel);
        }
        if let Some(animation) = active.incoming.as_mut() {
            shift(&mut animation.panel);
        }
    }

    fn is_animating(&self) -> bool {
        self.active.is_some()
    }
}

/// Applies the final styles and completes before `run` returns.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantEngine;

impl TransitionEngine for InstantEngine {
    fn run(&mut self, panels: &mut [Panel], request: TransitionRequest, done: Completion) {
        prepare(panels, &request);
        settle(panels, &request);
        done.complete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide::Size;
    use crate::transitions::Choreography;
    use std::sync::mpsc;

    fn panels() -> Vec<Panel> {
        let mut panels = vec![Panel::new(Size::new(100.0, 50.0)), Panel::new(Size::new(100.0, 50.0))];
        panels[0].apply(&StyleDelta::shown());
        panels
    }

    fn fade(sync: bool) -> TransitionRequest {
        TransitionRequest {
            outgoing: 0,
            incoming: 1,
            forward: true,
            choreography: Choreography {
                next_before: StyleDelta::default().opacity(0.0),
                anim_in: StyleDelta::default().opacity(1.0),
                anim_out: StyleDelta::default().opacity(0.0),
                curr_after: StyleDelta::hidden(),
                ..Choreography::default()
            },
            speed_in: Duration::from_millis(100),
            speed_out: Duration::from_millis(100),
            ease_in: Easing::Linear,
            ease_out: Easing::Linear,
            sync,
        }
    }

    #[test]
    fn test_sync_crossfade_completes_after_duration() {
        let (tx, rx) = mpsc::channel();
        let mut panels = panels();
        let mut engine = TweenEngine::new();
        engine.run(&mut panels, fade(true), Completion::new(0, 1, tx));
        assert!(engine.is_animating());
        assert_eq!(panels[1].style.opacity, 0.0);

        engine.update(&mut panels, Duration::from_millis(50));
        assert!((panels[0].style.opacity - 0.5).abs() < 1e-4);
        assert!((panels[1].style.opacity - 0.5).abs() < 1e-4);
        assert!(rx.try_recv().is_err());

        engine.update(&mut panels, Duration::from_millis(60));
        assert!(!engine.is_animating());
        assert!(rx.try_recv().is_ok());
        assert!(!panels[0].is_visible());
        assert!(panels[1].is_visible());
        assert_eq!(panels[1].style.opacity, 1.0);
    }

    #[test]
    fn test_unsynced_runs_out_then_in() {
        let (tx, rx) = mpsc::channel();
        let mut panels = panels();
        let mut engine = TweenEngine::new();
        engine.run(&mut panels, fade(false), Completion::new(0, 1, tx));

        engine.update(&mut panels, Duration::from_millis(100));
        assert_eq!(panels[1].style.opacity, 0.0);
        assert!(engine.is_animating());

        engine.update(&mut panels, Duration::from_millis(100));
        assert!(!engine.is_animating());
        assert!(rx.try_recv().is_ok());
        assert_eq!(panels[1].style.opacity, 1.0);
    }

    #[test]
    fn test_instant_engine_completes_in_run() {
        let (tx, rx) = mpsc::channel();
        let mut panels = panels();
        InstantEngine.run(&mut panels, fade(true), Completion::new(3, 9, tx));
        let completed = rx.try_recv().unwrap();
        assert_eq!((completed.generation, completed.ticket), (3, 9));
        assert!(!panels[0].is_visible());
        assert!(panels[1].is_visible());
    }

    #[test]
    fn test_insert_shifts_running_panels() {
        let (tx, _rx) = mpsc::channel();
        let mut panels = panels();
        let mut engine = TweenEngine::new();
        engine.run(&mut panels, fade(true), Completion::new(0, 1, tx));
        panels.insert(0, Panel::new(Size::new(10.0, 10.0)));
        engine.slide_inserted(0);
        engine.update(&mut panels, Duration::from_millis(200));
        assert!(!panels[1].is_visible());
        assert!(panels[2].is_visible());
        assert!(!panels[0].is_visible());
    }
}
