use std::sync::mpsc::Sender;
use std::time::Duration;

use tracing::warn;

use crate::easing::Easing;
use crate::slide::{Panel, StyleDelta};
use crate::transitions::Choreography;

/// Everything an engine needs to move from one panel to another.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRequest {
    pub outgoing: usize,
    pub incoming: usize,
    pub forward: bool,
    pub choreography: Choreography,
    pub speed_in: Duration,
    pub speed_out: Duration,
    pub ease_in: Easing,
    pub ease_out: Easing,
    /// Animate in and out at the same time instead of out, then in.
    pub sync: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Completed {
    pub generation: u64,
    pub ticket: u64,
}

/// Completion token handed to the engine with every transition.
///
/// Consumed by [`Completion::complete`], so it can fire at most once. It is
/// `Send`: an engine may finish on another thread, the rotator picks the
/// signal up on its next tick.
#[derive(Debug)]
pub struct Completion {
    signal: Completed,
    tx: Sender<Completed>,
    fired: bool,
}

impl Completion {
    pub(crate) fn new(generation: u64, ticket: u64, tx: Sender<Completed>) -> Self {
        Self { signal: Completed { generation, ticket }, tx, fired: false }
    }

    /// Generation of the rotator when the transition started.
    pub fn generation(&self) -> u64 {
        self.signal.generation
    }

    pub fn complete(mut self) {
        self.fired = true;
        // The receiver is gone once the rotator is dropped; nothing is waiting then.
        let _ = self.tx.send(self.signal);
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if !self.fired {
            warn!(ticket = self.signal.ticket, "transition dropped without completing");
        }
    }
}

/// Animates a pair of panels.
///
/// `run` must eventually call [`Completion::complete`] exactly once, after the
/// incoming panel is fully shown and the outgoing one hidden. It may do so
/// before returning.
pub trait TransitionEngine {
    fn run(&mut self, panels: &mut [Panel], request: TransitionRequest, done: Completion);

    /// Called once per frame by [`Rotator::tick`](crate::Rotator::tick).
    fn update(&mut self, _panels: &mut [Panel], _dt: Duration) {}

    /// A panel was inserted at `index`; indices at or above it moved up by one.
    fn slide_inserted(&mut self, _index: usize) {}

    fn is_animating(&self) -> bool {
        false
    }
}

/// Stacks the pair and puts the incoming panel in its starting style:
/// natural geometry, shown above the outgoing one, then `next_before`.
pub fn prepare(panels: &mut [Panel], request: &TransitionRequest) {
    let choreography = &request.choreography;
    if let Some(outgoing) = panels.get_mut(request.outgoing) {
        outgoing.apply(&StyleDelta::default().z_index(1));
        outgoing.apply(&choreography.curr_before);
    }
    if let Some(incoming) = panels.get_mut(request.incoming) {
        incoming.reset_geometry();
        incoming.apply(&StyleDelta::shown().z_index(2));
        incoming.apply(&choreography.next_before);
    }
}

/// Final styles of both panels; the outgoing one ends hidden.
pub fn settle(panels: &mut [Panel], request: &TransitionRequest) {
    let choreography = &request.choreography;
    if let Some(outgoing) = panels.get_mut(request.outgoing) {
        outgoing.apply(&choreography.anim_out);
        outgoing.apply(&choreography.curr_after);
        outgoing.apply(&StyleDelta::hidden());
    }
    if let Some(incoming) = panels.get_mut(request.incoming) {
        incoming.apply(&choreography.anim_in);
    }
}
