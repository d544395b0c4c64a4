/// Lifecycle notifications, in the order the rotator emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotatorEvent {
    /// The show started on `first`.
    Started { first: usize },
    /// A transition is about to run.
    Before { from: usize, to: usize, forward: bool, manual: bool },
    /// A transition committed; `to` is now on display.
    After { from: usize, to: usize, forward: bool, manual: bool },
    /// Autostop ran out, or a non-wrapping show reached its last slide.
    End,
    SlideAdded { index: usize },
    Stopped,
}

pub trait RotatorObserver {
    fn on_event(&mut self, event: &RotatorEvent);
}

impl<F> RotatorObserver for F
where
    F: FnMut(&RotatorEvent),
{
    fn on_event(&mut self, event: &RotatorEvent) {
        self(event)
    }
}

/// Context for a per-slide timeout override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutQuery {
    pub from: usize,
    pub to: usize,
    pub forward: bool,
}
