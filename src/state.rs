use crate::navigation::RandomOrder;
use crate::scheduler::TimerId;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Phase {
    Idle,    // Constructed, not started
    Running, // Advancing or waiting for the timer / a trigger
    Stopped, // Torn down, every deferred callback is stale
}

/// The transition currently handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InFlight {
    pub ticket: u64,
    pub from: usize,
    pub to: usize,
    pub forward: bool,
    pub manual: bool,
    /// Cursor the random order moves to once the transition commits.
    pub cursor: Option<usize>,
}

/// Mutable rotator state. Owned by one [`Rotator`](crate::Rotator) and only
/// observed from outside through its accessors.
#[derive(Debug)]
pub(crate) struct RotatorState {
    pub current: usize,
    pub next: usize,
    pub generation: u64,
    pub in_flight: Option<InFlight>,
    pub paused: u32,
    pub random: Option<RandomOrder>,
    pub pending_timer: Option<TimerId>,
    /// Automatic transitions left before the show ends (autostop).
    pub countdown: Option<usize>,
    /// Set once the end-of-show notification went out.
    pub ended: bool,
    pub tickets: u64,
}

impl RotatorState {
    pub fn new() -> Self {
        Self {
            current: 0,
            next: 0,
            generation: 0,
            in_flight: None,
            paused: 0,
            random: None,
            pending_timer: None,
            countdown: None,
            ended: false,
            tickets: 0,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn next_ticket(&mut self) -> u64 {
        self.tickets += 1;
        self.tickets
    }
}
