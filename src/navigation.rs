use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn is_forward(self) -> bool {
        self == Direction::Forward
    }
}

/// Sequential step from `current` over `len` slides. `None` when `wrap` is
/// off and the step would leave `[0, len)`.
pub fn step(current: usize, len: usize, direction: Direction, wrap: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match direction {
        Direction::Forward if current + 1 < len => Some(current + 1),
        Direction::Forward => wrap.then_some(0),
        Direction::Backward if current > 0 => Some(current - 1),
        Direction::Backward => wrap.then_some(len - 1),
    }
}

/// Shuffled visiting order for random mode.
///
/// Only the permutation and a cursor into it are kept, so stepping backward
/// walks the permutation rather than the actual visit history: after a jump
/// to an arbitrary slide, "back" lands on the permutation neighbour of the
/// cursor, not on the slide shown before the jump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomOrder {
    map: Vec<usize>,
    cursor: usize,
}

impl RandomOrder {
    pub fn shuffled<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut map: Vec<usize> = (0..len).collect();
        map.shuffle(rng);
        Self { map, cursor: 0 }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.map
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        if cursor < self.map.len() {
            self.cursor = cursor;
        }
    }

    /// Slide under the cursor.
    pub fn current(&self) -> usize {
        self.map[self.cursor]
    }

    /// Cursor and slide one step away, wrapping at both ends.
    pub fn peek(&self, direction: Direction) -> (usize, usize) {
        let len = self.map.len();
        let cursor = match direction {
            Direction::Forward => (self.cursor + 1) % len,
            Direction::Backward => (self.cursor + len - 1) % len,
        };
        (cursor, self.map[cursor])
    }

    /// Registers a newly inserted slide. With `prepend` every existing slide
    /// index shifts up by one and the new slide is index 0; otherwise it is
    /// appended as the last index. The new slide lands at a random position
    /// after the cursor so the permutation stays complete. Returns that position.
    pub fn insert<R: Rng + ?Sized>(&mut self, prepend: bool, rng: &mut R) -> usize {
        let index = if prepend {
            for slot in self.map.iter_mut() {
                *slot += 1;
            }
            0
        } else {
            self.map.len()
        };
        let at = rng.random_range(self.cursor + 1..=self.map.len());
        self.map.insert(at, index);
        at
    }

    pub fn is_permutation(&self) -> bool {
        let mut seen = vec![false; self.map.len()];
        for &slot in &self.map {
            match seen.get_mut(slot) {
                Some(hit) if !*hit => *hit = true,
                _ => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_step_wraps() {
        assert_eq!(step(2, 3, Direction::Forward, true), Some(0));
        assert_eq!(step(0, 3, Direction::Backward, true), Some(2));
        assert_eq!(step(1, 3, Direction::Forward, true), Some(2));
    }

    #[test]
    fn test_step_without_wrap_rejects_edges() {
        assert_eq!(step(2, 3, Direction::Forward, false), None);
        assert_eq!(step(0, 3, Direction::Backward, false), None);
        assert_eq!(step(1, 3, Direction::Backward, false), Some(0));
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 2..40 {
            let order = RandomOrder::shuffled(len, &mut rng);
            assert!(order.is_permutation());
            assert_eq!(order.as_slice().len(), len);
        }
    }

    #[test]
    fn test_peek_wraps_both_ways() {
        let order = RandomOrder { map: vec![2, 0, 1], cursor: 0 };
        assert_eq!(order.peek(Direction::Forward), (1, 0));
        assert_eq!(order.peek(Direction::Backward), (2, 1));
    }

    #[test]
    fn test_insert_keeps_permutation() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut order = RandomOrder::shuffled(4, &mut rng);
        order.set_cursor(2);
        let before = order.current();
        order.insert(true, &mut rng);
        assert!(order.is_permutation());
        assert_eq!(order.current(), before + 1);
        let at = order.insert(false, &mut rng);
        assert_eq!(order.as_slice()[at], 5);
        assert!(at > order.cursor());
        assert!(order.is_permutation());
        assert_eq!(order.as_slice().len(), 6);
        assert!(order.as_slice()[..=order.cursor()].iter().all(|&i| i != 5));
    }

    #[test]
    fn test_duplicate_is_not_permutation() {
        let order = RandomOrder { map: vec![0, 0, 2], cursor: 0 };
        assert!(!order.is_permutation());
    }
}
