//! Event channel implementation using crossbeam-channel.
//!
//! Progress events cross from rayon workers to whichever thread renders
//! them (the CLI's progress bar, or a test collecting them).

use super::Event;
use crossbeam_channel::{Receiver, Sender};

/// Cloneable sending half, shared by worker threads
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event; a dropped receiver discards it.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receiving half, owned by the presentation layer
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Iterate until every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Constructors for sender/receiver pairs
pub struct EventChannel;

impl EventChannel {
    /// Unbounded channel; events are small
    pub fn new() -> (EventSender, EventReceiver) {
        Self::wrap(crossbeam_channel::unbounded())
    }

    /// Bounded channel, for consumers that need backpressure
    pub fn bounded(capacity: usize) -> (EventSender, EventReceiver) {
        Self::wrap(crossbeam_channel::bounded(capacity))
    }

    fn wrap((sender, receiver): (Sender<Event>, Receiver<Event>)) -> (EventSender, EventReceiver) {
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A sender whose receiver is already gone, for runs without progress output
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{HashEvent, HashProgress, PipelineEvent};
    use std::path::PathBuf;
    use std::thread;

    #[test]
    fn events_can_be_sent_across_threads() {
        let (sender, receiver) = EventChannel::new();

        let handle = thread::spawn(move || {
            sender.send(Event::Hash(HashEvent::Progress(HashProgress {
                completed: 3,
                total: 9,
                current_path: PathBuf::from("/media/clip.gif"),
            })));
        });

        handle.join().unwrap();

        match receiver.recv().unwrap() {
            Event::Hash(HashEvent::Progress(p)) => assert_eq!(p.completed, 3),
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn null_sender_does_not_panic() {
        let sender = null_sender();
        sender.send(Event::Pipeline(PipelineEvent::Started));
    }

    #[test]
    fn bounded_channel_respects_capacity() {
        let (sender, receiver) = EventChannel::bounded(2);

        sender.send(Event::Pipeline(PipelineEvent::Started));
        sender.send(Event::Pipeline(PipelineEvent::Started));

        assert!(receiver.try_recv().is_some());
        assert!(receiver.try_recv().is_some());
        assert!(receiver.try_recv().is_none());
    }
}
