use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::Sender;

/// Receives pager updates from the rotator.
pub trait PagerSink {
    /// A slide was added; its anchor is `index`.
    fn anchor_added(&mut self, _index: usize) {}

    /// `index` is now the slide on display.
    fn set_active(&mut self, index: usize);
}

impl<P: PagerSink> PagerSink for Rc<RefCell<P>> {
    fn anchor_added(&mut self, index: usize) {
        self.borrow_mut().anchor_added(index);
    }

    fn set_active(&mut self, index: usize) {
        self.borrow_mut().set_active(index);
    }
}

/// Pager state: one anchor per slide, one of them active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pager {
    anchors: usize,
    active: Option<usize>,
}

impl Pager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchors(&self) -> usize {
        self.anchors
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Anchor labels, 1-based like the plugin's default anchors.
    pub fn labels(&self) -> impl Iterator<Item = String> + '_ {
        (1..=self.anchors).map(|n| n.to_string())
    }
}

impl PagerSink for Pager {
    fn anchor_added(&mut self, _index: usize) {
        self.anchors += 1;
    }

    fn set_active(&mut self, index: usize) {
        self.active = Some(index);
    }
}

/// Navigation requests coming from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Next,
    Prev,
    Pager(usize),
    HoverEnter,
    HoverLeave,
}

/// Cloneable sender for [`Trigger`]s; the rotator drains them on each tick.
#[derive(Debug, Clone)]
pub struct TriggerHandle {
    tx: Sender<Trigger>,
}

impl TriggerHandle {
    pub(crate) fn new(tx: Sender<Trigger>) -> Self {
        Self { tx }
    }

    /// Returns false once the rotator is gone.
    pub fn send(&self, trigger: Trigger) -> bool {
        self.tx.send(trigger).is_ok()
    }

    pub fn next(&self) -> bool {
        self.send(Trigger::Next)
    }

    pub fn prev(&self) -> bool {
        self.send(Trigger::Prev)
    }

    pub fn pager(&self, index: usize) -> bool {
        self.send(Trigger::Pager(index))
    }

    pub fn hover(&self, entered: bool) -> bool {
        self.send(if entered { Trigger::HoverEnter } else { Trigger::HoverLeave })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pager_tracks_anchors() {
        let mut pager = Pager::new();
        for i in 0..3 {
            pager.anchor_added(i);
        }
        pager.set_active(2);
        assert_eq!(pager.anchors(), 3);
        assert_eq!(pager.active(), Some(2));
        assert_eq!(pager.labels().collect::<Vec<_>>(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_shared_pager() {
        let shared = Rc::new(RefCell::new(Pager::new()));
        let mut sink = Rc::clone(&shared);
        sink.anchor_added(0);
        sink.set_active(0);
        assert_eq!(shared.borrow().active(), Some(0));
    }
}
