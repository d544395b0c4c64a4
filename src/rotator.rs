use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace, warn};

use crate::config::{Autostop, Order, RotatorConfig};
use crate::constants::{CONTINUOUS_DELAY, FAST_EVENT_SPEED};
use crate::engine::{Completed, Completion, TransitionEngine, TransitionRequest};
use crate::error::RotatorError;
use crate::events::{RotatorEvent, RotatorObserver, TimeoutQuery};
use crate::navigation::{Direction, RandomOrder, step};
use crate::pager::{PagerSink, Trigger, TriggerHandle};
use crate::scheduler::{Scheduler, TimerId};
use crate::slide::{Panel, Size, SlideContent, StyleDelta};
use crate::state::{InFlight, Phase, RotatorState};
use crate::transitions::{CUSTOM, Custom, Step, Transition, TransitionRegistry};

/// What became of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A transition was handed to the engine.
    Started,
    /// Another transition is in flight; the request was dropped.
    Dropped,
    /// The requested slide is already on display.
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimerFire {
    generation: u64,
}

type TimeoutFn = Box<dyn FnMut(&TimeoutQuery) -> Option<Duration>>;

/// Shows one slide of a container at a time and rotates through them.
///
/// Everything happens on the caller's frame loop: [`Rotator::tick`] advances
/// the engine, applies finished transitions and fires due timers. Deferred
/// work carries the generation it was scheduled under and is ignored once
/// [`Rotator::stop`] has bumped it.
pub struct Rotator<S> {
    config: RotatorConfig,
    slides: Vec<S>,
    panels: Vec<Panel>,
    container: Size,
    phase: Phase,
    state: RotatorState,
    transition: Arc<dyn Transition>,
    fallback: Option<RotatorError>,
    engine: Box<dyn TransitionEngine>,
    scheduler: Scheduler<TimerFire>,
    completions_tx: Sender<Completed>,
    completions_rx: Receiver<Completed>,
    triggers_tx: Sender<Trigger>,
    triggers_rx: Receiver<Trigger>,
    pager: Option<Box<dyn PagerSink>>,
    observers: Vec<Box<dyn RotatorObserver>>,
    timeout_fn: Option<TimeoutFn>,
    rng: StdRng,
}

impl<S: SlideContent> Rotator<S> {
    /// Builds an idle rotator. An unknown `fx` falls back to the custom
    /// transition described by the options; see [`Rotator::fallback`].
    pub fn new<E>(config: RotatorConfig, slides: Vec<S>, registry: &TransitionRegistry, engine: E) -> Self
    where
        E: TransitionEngine + 'static,
    {
        let custom: Arc<dyn Transition> = Arc::new(Custom(config.custom));
        let (transition, fallback) = if config.fx == CUSTOM {
            (custom, None)
        } else {
            match registry.get(&config.fx) {
                Ok(transition) => (transition, None),
                Err(e) => {
                    warn!(fx = %config.fx, "unknown transition, using custom styles");
                    (custom, Some(e))
                }
            }
        };

        let panels: Vec<Panel> = slides
            .iter()
            .map(|slide| {
                let mut panel = Panel::new(slide.size());
                if let Some(fit) = config.fit {
                    panel.fit_to(fit);
                }
                panel
            })
            .collect();

        let (completions_tx, completions_rx) = mpsc::channel();
        let (triggers_tx, triggers_rx) = mpsc::channel();
        let mut rotator = Self {
            config,
            slides,
            panels,
            container: Size::default(),
            phase: Phase::Idle,
            state: RotatorState::new(),
            transition,
            fallback,
            engine: Box::new(engine),
            scheduler: Scheduler::new(),
            completions_tx,
            completions_rx,
            triggers_tx,
            triggers_rx,
            pager: None,
            observers: Vec::new(),
            timeout_fn: None,
            rng: StdRng::from_os_rng(),
        };
        rotator.resize_container();
        rotator
    }

    /// Reseeds the generator behind random order.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn observe(&mut self, observer: impl RotatorObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Lets each auto-advance pick its own delay; `None` keeps the configured timeout.
    pub fn set_timeout_fn(&mut self, timeout_fn: impl FnMut(&TimeoutQuery) -> Option<Duration> + 'static) {
        self.timeout_fn = Some(Box::new(timeout_fn));
    }

    /// Builds one anchor per slide and keeps the sink's active anchor in step.
    pub fn register_pager(&mut self, mut sink: impl PagerSink + 'static) {
        for index in 0..self.slides.len() {
            sink.anchor_added(index);
        }
        if self.phase == Phase::Running {
            sink.set_active(self.state.current);
        }
        self.pager = Some(Box::new(sink));
    }

    /// Sender for next/prev/pager/hover triggers, drained on every tick.
    pub fn triggers(&self) -> TriggerHandle {
        TriggerHandle::new(self.triggers_tx.clone())
    }

    pub fn start(&mut self) -> Result<usize, RotatorError> {
        if self.phase != Phase::Idle {
            return Err(RotatorError::WrongPhase(self.phase));
        }
        let len = self.slides.len();
        if len < 2 {
            warn!(count = len, "terminating; too few slides");
            return Err(RotatorError::TooFewSlides { count: len });
        }

        let first = if self.config.order == Order::Random {
            let order = RandomOrder::shuffled(len, &mut self.rng);
            let first = order.current();
            self.state.random = Some(order);
            first
        } else if self.config.starting_slide < len {
            self.config.starting_slide
        } else {
            0
        };

        self.stack(first);
        self.state.current = first;
        self.state.next = self.peek_next(first);
        self.state.countdown = match self.config.autostop {
            Autostop::Off => None,
            Autostop::SlideCount => Some(len),
            Autostop::After(count) => Some(count),
        };
        self.phase = Phase::Running;
        info!(slides = len, first, fx = %self.config.fx, "rotator started");

        if let Some(pager) = self.pager.as_mut() {
            pager.set_active(first);
        }
        self.emit(RotatorEvent::Started { first });

        if self.config.auto_advance() {
            let delay = self.config.first_delay();
            self.arm(delay);
        }
        Ok(first)
    }

    /// Tears the show down. Every timer or completion scheduled before is ignored.
    pub fn stop(&mut self) {
        if self.phase == Phase::Stopped {
            return;
        }
        self.state.generation += 1;
        self.cancel_timer();
        self.state.in_flight = None;
        self.phase = Phase::Stopped;
        info!(generation = self.state.generation, "rotator stopped");
        self.emit(RotatorEvent::Stopped);
    }

    /// Nested pauses are counted; the timer keeps running but its fires are skipped.
    pub fn pause(&mut self) -> u32 {
        self.state.paused += 1;
        debug!(paused = self.state.paused, "paused");
        self.state.paused
    }

    /// Releases one pause. The last release re-arms the timer if a paused
    /// fire let it lapse.
    pub fn resume(&mut self) -> u32 {
        self.state.paused = self.state.paused.saturating_sub(1);
        debug!(paused = self.state.paused, "resumed");
        if self.state.paused == 0
            && self.phase == Phase::Running
            && !self.state.is_busy()
            && self.state.pending_timer.is_none()
        {
            let (current, next) = (self.state.current, self.state.next);
            self.rearm(current, next, true);
        }
        self.state.paused
    }

    /// Drops every pause and moves to the next slide right away.
    pub fn resume_now(&mut self) -> Result<Dispatch, RotatorError> {
        self.state.paused = 0;
        self.ensure_running()?;
        if self.state.is_busy() {
            return Ok(Dispatch::Dropped);
        }
        self.cancel_timer();
        let cursor = self.state.random.as_ref().map(|order| order.peek(Direction::Forward).0);
        let (current, next) = (self.state.current, self.state.next);
        Ok(self.run_transition(current, next, true, true, cursor))
    }

    pub fn advance(&mut self, direction: Direction) -> Result<Dispatch, RotatorError> {
        self.ensure_running()?;
        if self.state.is_busy() {
            return Ok(Dispatch::Dropped);
        }
        let len = self.slides.len();
        let current = self.state.current;
        let peeked = self.state.random.as_ref().map(|order| order.peek(direction));
        let (to, cursor) = match peeked {
            Some((cursor, to)) => (to, Some(cursor)),
            None => {
                let to = step(current, len, direction, self.config.wrap).ok_or_else(|| {
                    let index = if direction.is_forward() { current as i64 + 1 } else { current as i64 - 1 };
                    RotatorError::out_of_range(index, len)
                })?;
                (to, None)
            }
        };
        self.cancel_timer();
        Ok(self.run_transition(current, to, direction.is_forward(), true, cursor))
    }

    pub fn go_to(&mut self, index: usize) -> Result<Dispatch, RotatorError> {
        self.ensure_running()?;
        let len = self.slides.len();
        if index >= len {
            return Err(RotatorError::out_of_range(index as i64, len));
        }
        if self.state.is_busy() {
            return Ok(Dispatch::Dropped);
        }
        self.cancel_timer();
        let current = self.state.current;
        Ok(self.run_transition(current, index, index >= current, true, None))
    }

    pub fn hover(&mut self, entered: bool) {
        if !self.config.pause_on_hover {
            return;
        }
        if entered {
            self.pause();
        } else {
            self.resume();
        }
    }

    pub fn trigger(&mut self, trigger: Trigger) -> Result<Dispatch, RotatorError> {
        match trigger {
            Trigger::Next => self.advance(Direction::Forward),
            Trigger::Prev => self.advance(Direction::Backward),
            Trigger::Pager(index) => self.go_to(index),
            Trigger::HoverEnter | Trigger::HoverLeave => {
                self.hover(trigger == Trigger::HoverEnter);
                Ok(Dispatch::Unchanged)
            }
        }
    }

    /// One step of the frame loop.
    pub fn tick(&mut self, dt: Duration) {
        while let Ok(trigger) = self.triggers_rx.try_recv() {
            if let Err(e) = self.trigger(trigger) {
                debug!(?trigger, error = %e, "trigger rejected");
            }
        }
        self.engine.update(&mut self.panels, dt);
        self.drain_completions();
        for (id, fire) in self.scheduler.advance(dt) {
            self.on_timer(id, fire);
        }
    }

    /// Adds a slide at the end, or at the front with `prepend`. Returns its index.
    pub fn add_slide(&mut self, slide: S, prepend: bool) -> usize {
        let mut panel = Panel::new(slide.size());
        if let Some(fit) = self.config.fit {
            panel.fit_to(fit);
        }
        let index = if prepend { 0 } else { self.slides.len() };
        self.slides.insert(index, slide);
        self.panels.insert(index, panel);

        if prepend {
            self.engine.slide_inserted(index);
            self.state.current += 1;
            self.state.next += 1;
            if let Some(flight) = self.state.in_flight.as_mut() {
                flight.from += 1;
                flight.to += 1;
            }
        }
        if let Some(order) = self.state.random.as_mut() {
            let at = order.insert(prepend, &mut self.rng);
            // The flight's target cursor moves with the entries behind it.
            if let Some(cursor) = self.state.in_flight.as_mut().and_then(|flight| flight.cursor.as_mut()) {
                if *cursor >= at {
                    *cursor += 1;
                }
            }
        }
        if self.phase == Phase::Running && !self.state.is_busy() {
            self.state.next = self.peek_next(self.state.current);
        }
        if self.config.autostop == Autostop::SlideCount {
            if let Some(countdown) = self.state.countdown.as_mut() {
                *countdown += 1;
            }
        }
        self.resize_container();

        let anchor = self.slides.len() - 1;
        let running = self.phase == Phase::Running;
        let current = self.state.current;
        if let Some(pager) = self.pager.as_mut() {
            pager.anchor_added(anchor);
            if prepend && running {
                pager.set_active(current);
            }
        }
        debug!(index, prepend, "slide added");
        self.emit(RotatorEvent::SlideAdded { index });
        index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.state.current
    }

    pub fn next_index(&self) -> usize {
        self.state.next
    }

    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn paused_count(&self) -> u32 {
        self.state.paused
    }

    pub fn has_ended(&self) -> bool {
        self.state.ended
    }

    pub fn random_order(&self) -> Option<&[usize]> {
        self.state.random.as_ref().map(RandomOrder::as_slice)
    }

    pub fn has_pending_timer(&self) -> bool {
        self.state.pending_timer.is_some()
    }

    /// Time left before the armed auto-advance fires.
    pub fn time_until_advance(&self) -> Option<Duration> {
        self.state.pending_timer.and_then(|id| self.scheduler.remaining(id))
    }

    /// Why the configured transition was replaced, if it was.
    pub fn fallback(&self) -> Option<&RotatorError> {
        self.fallback.as_ref()
    }

    pub fn config(&self) -> &RotatorConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slides(&self) -> &[S] {
        &self.slides
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn is_animating(&self) -> bool {
        self.engine.is_animating()
    }

    fn ensure_running(&self) -> Result<(), RotatorError> {
        match self.phase {
            Phase::Running => Ok(()),
            phase => Err(RotatorError::WrongPhase(phase)),
        }
    }

    fn resize_container(&mut self) {
        let largest = self.panels.iter().fold(Size::default(), |acc, p| acc.max(p.natural()));
        self.container = match self.config.container {
            Some(size) if !self.config.container_resize => size,
            _ => largest,
        };
    }

    /// Stacks every panel at the origin; only `first` is shown. The first
    /// slide is on top and the others descend after it, wrapping around.
    fn stack(&mut self, first: usize) {
        let len = self.panels.len() as i32;
        let first_z = first as i32;
        for (i, panel) in self.panels.iter_mut().enumerate() {
            let i = i as i32;
            let z = if i >= first_z { len - (i - first_z) } else { first_z - i };
            panel.reset_geometry();
            panel.apply(&StyleDelta::default().visible(i == first_z).opacity(1.0).z_index(z));
        }
    }

    fn peek_next(&self, current: usize) -> usize {
        match self.state.random.as_ref() {
            Some(order) => order.peek(Direction::Forward).1,
            None => step(current, self.slides.len(), Direction::Forward, true).unwrap_or(0),
        }
    }

    fn arm(&mut self, delay: Duration) {
        self.cancel_timer();
        let fire = TimerFire { generation: self.state.generation };
        self.state.pending_timer = Some(self.scheduler.schedule(delay, fire));
        trace!(?delay, "auto-advance armed");
    }

    fn cancel_timer(&mut self) {
        if let Some(id) = self.state.pending_timer.take() {
            self.scheduler.cancel(id);
        }
    }

    /// Schedules the next auto-advance after a transition (or a no-op jump).
    fn rearm(&mut self, from: usize, to: usize, forward: bool) {
        if self.phase != Phase::Running || self.state.ended || !self.config.auto_advance() {
            return;
        }
        let delay = if self.config.continuous {
            CONTINUOUS_DELAY
        } else {
            let query = TimeoutQuery { from, to, forward };
            self.timeout_fn
                .as_mut()
                .and_then(|timeout_fn| timeout_fn(&query))
                .unwrap_or(self.config.timeout)
        };
        self.arm(delay);
    }

    fn on_timer(&mut self, id: TimerId, fire: TimerFire) {
        if fire.generation != self.state.generation || self.phase != Phase::Running {
            trace!(generation = fire.generation, "stale timer ignored");
            return;
        }
        if self.state.pending_timer == Some(id) {
            self.state.pending_timer = None;
        }
        if self.state.paused > 0 {
            trace!(paused = self.state.paused, "timer fired while paused");
            return;
        }
        if self.state.is_busy() || self.state.ended {
            return;
        }

        let current = self.state.current;
        let peeked = self.state.random.as_ref().map(|order| order.peek(Direction::Forward));
        let (to, cursor) = match peeked {
            Some((cursor, to)) => (to, Some(cursor)),
            None => match step(current, self.slides.len(), Direction::Forward, self.config.wrap) {
                Some(to) => (to, None),
                None => {
                    self.end_show();
                    return;
                }
            },
        };
        self.run_transition(current, to, true, false, cursor);
    }

    fn run_transition(&mut self, from: usize, to: usize, forward: bool, manual: bool, cursor: Option<usize>) -> Dispatch {
        if self.state.is_busy() {
            debug!(from, to, "transition dropped; another is in flight");
            return Dispatch::Dropped;
        }
        if from == to {
            if let (Some(order), Some(cursor)) = (self.state.random.as_mut(), cursor) {
                order.set_cursor(cursor);
            }
            self.rearm(from, to, forward);
            return Dispatch::Unchanged;
        }

        self.emit(RotatorEvent::Before { from, to, forward, manual });
        let step = Step {
            container: self.container,
            outgoing: self.panels[from].natural(),
            incoming: self.panels[to].natural(),
            forward,
            direction: self.config.direction,
            clip: self.config.clip,
        };
        let choreography = self.transition.choreograph(&step);
        let (speed_in, speed_out) = if manual && self.config.fast_on_event {
            (FAST_EVENT_SPEED, FAST_EVENT_SPEED)
        } else {
            (self.config.speed_in, self.config.speed_out)
        };
        let request = TransitionRequest {
            outgoing: from,
            incoming: to,
            forward,
            choreography,
            speed_in,
            speed_out,
            ease_in: self.config.ease_in,
            ease_out: self.config.ease_out,
            sync: self.config.sync,
        };

        let ticket = self.state.next_ticket();
        self.state.in_flight = Some(InFlight { ticket, from, to, forward, manual, cursor });
        let done = Completion::new(self.state.generation, ticket, self.completions_tx.clone());
        debug!(from, to, forward, manual, "transition started");
        self.engine.run(&mut self.panels, request, done);
        self.drain_completions();
        Dispatch::Started
    }

    fn drain_completions(&mut self) {
        while let Ok(completed) = self.completions_rx.try_recv() {
            self.on_completed(completed);
        }
    }

    fn on_completed(&mut self, completed: Completed) {
        if completed.generation != self.state.generation {
            trace!(generation = completed.generation, "stale completion ignored");
            return;
        }
        let Some(flight) = self.state.in_flight else {
            return;
        };
        if flight.ticket != completed.ticket {
            return;
        }

        self.state.in_flight = None;
        self.state.current = flight.to;
        if let (Some(order), Some(cursor)) = (self.state.random.as_mut(), flight.cursor) {
            order.set_cursor(cursor);
        }
        self.state.next = self.peek_next(flight.to);
        if let Some(pager) = self.pager.as_mut() {
            pager.set_active(flight.to);
        }
        debug!(current = flight.to, next = self.state.next, "transition committed");
        self.emit(RotatorEvent::After {
            from: flight.from,
            to: flight.to,
            forward: flight.forward,
            manual: flight.manual,
        });

        if !flight.manual {
            if let Some(left) = self.state.countdown {
                let left = left.saturating_sub(1);
                self.state.countdown = Some(left);
                if left == 0 {
                    self.end_show();
                    return;
                }
            }
        }
        self.rearm(flight.from, flight.to, flight.forward);
    }

    fn end_show(&mut self) {
        if self.state.ended {
            return;
        }
        self.state.ended = true;
        self.cancel_timer();
        info!(current = self.state.current, "end of show");
        self.emit(RotatorEvent::End);
    }

    fn emit(&mut self, event: RotatorEvent) {
        for observer in self.observers.iter_mut() {
            observer.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RotatorOptions;
    use crate::tween::InstantEngine;

    fn rotator(options: RotatorOptions, count: usize) -> Rotator<Size> {
        let slides = vec![Size::new(320.0, 240.0); count];
        Rotator::new(options.normalize(), slides, &TransitionRegistry::default(), InstantEngine).with_seed(3)
    }

    #[test]
    fn test_stack_puts_first_on_top() {
        let options = RotatorOptions { starting_slide: 2, ..RotatorOptions::default() };
        let mut rotator = rotator(options, 4);
        assert_eq!(rotator.start(), Ok(2));
        let z: Vec<i32> = rotator.panels().iter().map(|p| p.style.z_index).collect();
        assert_eq!(z, vec![2, 1, 4, 3]);
        let visible: Vec<bool> = rotator.panels().iter().map(Panel::is_visible).collect();
        assert_eq!(visible, vec![false, false, true, false]);
        assert_eq!(rotator.next_index(), 3);
    }

    #[test]
    fn test_out_of_range_start_falls_back_to_zero() {
        let options = RotatorOptions { starting_slide: 9, ..RotatorOptions::default() };
        let mut rotator = rotator(options, 3);
        assert_eq!(rotator.start(), Ok(0));
    }

    #[test]
    fn test_stale_timer_fire_is_ignored() {
        let mut rotator = rotator(RotatorOptions::default(), 3);
        rotator.start().unwrap();
        let fire = TimerFire { generation: rotator.generation() + 1 };
        let id = rotator.scheduler.schedule(Duration::ZERO, fire);
        rotator.on_timer(id, fire);
        assert_eq!(rotator.current_index(), 0);
        assert!(rotator.has_pending_timer());
    }

    #[test]
    fn test_paused_fire_waits_for_resume() {
        let mut rotator = rotator(RotatorOptions::default(), 3);
        rotator.start().unwrap();
        rotator.pause();
        rotator.pause();
        rotator.tick(Duration::from_millis(4000));
        assert_eq!(rotator.current_index(), 0);
        assert!(!rotator.has_pending_timer());

        assert_eq!(rotator.resume(), 1);
        assert!(!rotator.has_pending_timer());
        assert_eq!(rotator.resume(), 0);
        assert_eq!(rotator.time_until_advance(), Some(Duration::from_millis(4000)));

        rotator.tick(Duration::from_millis(4000));
        assert_eq!(rotator.current_index(), 1);
    }

    #[test]
    fn test_go_to_current_slide_is_unchanged() {
        let mut rotator = rotator(RotatorOptions::default(), 3);
        rotator.start().unwrap();
        rotator.tick(Duration::from_millis(1500));
        assert_eq!(rotator.go_to(0), Ok(Dispatch::Unchanged));
        assert_eq!(rotator.time_until_advance(), Some(Duration::from_millis(4000)));
    }

    #[test]
    fn test_wrong_phase() {
        let mut rotator = rotator(RotatorOptions::default(), 3);
        assert_eq!(rotator.advance(Direction::Forward), Err(RotatorError::WrongPhase(Phase::Idle)));
        rotator.start().unwrap();
        assert_eq!(rotator.start(), Err(RotatorError::WrongPhase(Phase::Running)));
        rotator.stop();
        assert_eq!(rotator.go_to(1), Err(RotatorError::WrongPhase(Phase::Stopped)));
    }
}
