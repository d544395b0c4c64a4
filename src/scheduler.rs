use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Timer queue on a virtual clock that only moves when the frame loop
/// calls [`Scheduler::advance`].
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, TimerId), T>,
    due: HashMap<TimerId, Duration>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BTreeMap::new(),
            due: HashMap::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.due.contains_key(&id)
    }

    /// Time left before `id` fires.
    pub fn remaining(&self, id: TimerId) -> Option<Duration> {
        self.due.get(&id).map(|due| due.saturating_sub(self.now))
    }

    pub fn schedule(&mut self, delay: Duration, payload: T) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let due = self.now + delay;
        self.queue.insert((due, id), payload);
        self.due.insert(id, due);
        id
    }

    /// Returns the payload if the timer had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let due = self.due.remove(&id)?;
        self.queue.remove(&(due, id))
    }

    /// Moves the clock forward and hands back every payload that came due,
    /// earliest first.
    pub fn advance(&mut self, dt: Duration) -> Vec<(TimerId, T)> {
        self.now += dt;
        let later = self.queue.split_off(&(self.now, TimerId(u64::MAX)));
        let fired = std::mem::replace(&mut self.queue, later);
        fired
            .into_iter()
            .map(|((_, id), payload)| {
                self.due.remove(&id);
                (id, payload)
            })
            .collect()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(30), "late");
        scheduler.schedule(ms(10), "early");
        assert!(scheduler.advance(ms(5)).is_empty());
        let fired: Vec<_> = scheduler.advance(ms(40)).into_iter().map(|(_, p)| p).collect();
        assert_eq!(fired, vec!["early", "late"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_fires_exactly_at_due_time() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(ms(10), ());
        assert_eq!(scheduler.remaining(id), Some(ms(10)));
        assert_eq!(scheduler.advance(ms(10)).len(), 1);
        assert!(!scheduler.is_pending(id));
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(ms(10), 1);
        assert_eq!(scheduler.cancel(id), Some(1));
        assert_eq!(scheduler.cancel(id), None);
        assert!(scheduler.advance(ms(20)).is_empty());
    }
}
