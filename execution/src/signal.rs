//! Observer channels for table events.
//!
//! A [`Signal`] fans a published value out to every subscriber. Replaying signals
//! also cache the latest value and hand it to late subscribers immediately, which
//! is what state-like events (balance, phase, selected chip) want. One-shot
//! signals (ball stopped, bet result) only reach subscribers present at publish time.

use std::fmt;

/// Handle returned by [`Signal::subscribe`].
pub type SubscriptionId = u64;

type Subscriber<T> = Box<dyn FnMut(&T)>;

pub struct Signal<T> {
    name: &'static str,
    replay: bool,
    last: Option<T>,
    next_id: SubscriptionId,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
}

impl<T> Signal<T> {
    /// Signal that replays its latest value to new subscribers.
    pub fn replaying(name: &'static str) -> Self {
        Self::new(name, true)
    }

    /// Signal that only delivers values published after subscription.
    pub fn one_shot(name: &'static str) -> Self {
        Self::new(name, false)
    }

    fn new(name: &'static str, replay: bool) -> Self {
        Self {
            name,
            replay,
            last: None,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn subscribe<F>(&mut self, mut subscriber: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        if self.replay {
            if let Some(last) = &self.last {
                subscriber(last);
            }
        }
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, value: T) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&value);
        }
        self.last = Some(value);
    }

    /// Most recently published value.
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("replay", &self.replay)
            .field("last", &self.last)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl FnMut(&T) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |value: &T| sink.borrow_mut().push(value.clone()))
    }

    #[test]
    fn test_replaying_signal_delivers_last_value() {
        let mut signal = Signal::replaying("balance");
        signal.publish(10u64);
        signal.publish(20u64);

        let (seen, sub) = recorder::<u64>();
        signal.subscribe(sub);
        assert_eq!(*seen.borrow(), vec![20]);

        signal.publish(30);
        assert_eq!(*seen.borrow(), vec![20, 30]);
    }

    #[test]
    fn test_one_shot_signal_does_not_replay() {
        let mut signal = Signal::one_shot("ball_stopped");
        signal.publish(1u8);

        let (seen, sub) = recorder::<u8>();
        signal.subscribe(sub);
        assert!(seen.borrow().is_empty());

        signal.publish(2);
        assert_eq!(*seen.borrow(), vec![2]);
        assert_eq!(signal.last(), Some(&2));
    }

    #[test]
    fn test_unsubscribe() {
        let mut signal = Signal::one_shot("count");
        let (seen, sub) = recorder::<usize>();
        let id = signal.subscribe(sub);
        signal.publish(1);
        assert!(signal.unsubscribe(id));
        assert!(!signal.unsubscribe(id));
        signal.publish(2);
        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(signal.subscriber_count(), 0);
    }
}
