//! Slide rotation and transition scheduling.
//!
//! A [`Rotator`] owns a set of slides laid out as stacked [`Panel`]s and
//! shows one at a time. It advances on a timer, on triggers (next, prev,
//! pager, hover) and on direct calls, and hands every change of slide to a
//! [`TransitionEngine`] together with the [`Choreography`] of the configured
//! transition preset. Time only moves through [`Rotator::tick`], so a render
//! loop, a test or a headless driver all run the show the same way.

pub mod config;
pub mod constants;
pub mod easing;
pub mod engine;
pub mod error;
pub mod events;
pub mod navigation;
pub mod pager;
pub mod rotator;
pub mod scheduler;
pub mod slide;
pub mod state;
pub mod transitions;
pub mod tween;

pub use config::{Autostop, Order, RotatorConfig, RotatorOptions};
pub use easing::{Easing, Tween};
pub use engine::{Completion, TransitionEngine, TransitionRequest};
pub use error::RotatorError;
pub use events::{RotatorEvent, RotatorObserver, TimeoutQuery};
pub use navigation::{Direction, RandomOrder};
pub use pager::{Pager, PagerSink, Trigger, TriggerHandle};
pub use rotator::{Dispatch, Rotator};
pub use scheduler::{Scheduler, TimerId};
pub use slide::{ClipRect, Panel, PanelStyle, Size, SlideContent, StyleDelta};
pub use state::Phase;
pub use transitions::{Choreography, ClipOrigin, CoverDirection, Custom, Step, Transition, TransitionRegistry};
pub use tween::{InstantEngine, TweenEngine};
