use crossbeam_channel::{Receiver, Sender, bounded};
use log::warn;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// One visited search node.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tick;

/// The sending half of a progress channel shared by every search worker.
///
/// A full channel blocks the sending worker until the receiver catches up.
/// Once the receiver is dropped, ticks are no longer sent.
#[derive(Debug, Clone)]
pub struct ProgressSink {
    tx: Sender<Tick>,
    disconnected: Arc<AtomicBool>,
}

impl ProgressSink {
    #[must_use]
    pub fn new(tx: Sender<Tick>) -> Self {
        ProgressSink {
            tx,
            disconnected: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a sink over a new channel holding at most `capacity` ticks.
    #[must_use]
    pub fn bounded(capacity: usize) -> (Self, Receiver<Tick>) {
        let (tx, rx) = bounded(capacity);
        (ProgressSink::new(tx), rx)
    }

    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::Relaxed)
    }

    /// Report one visited node, blocking while the channel is full.
    #[inline]
    pub fn tick(&self) {
        if self.is_disconnected() {
            return;
        }
        if self.tx.send(Tick).is_err() && !self.disconnected.swap(true, Ordering::Relaxed) {
            warn!("The progress receiver was dropped, no further progress will be reported");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn ticks_arrive_in_a_bounded_channel() {
        let (sink, rx) = ProgressSink::bounded(4);
        let sender = thread::spawn(move || {
            for _ in 0..100 {
                sink.tick();
            }
        });
        assert_eq!(rx.iter().count(), 100);
        sender.join().unwrap();
    }

    #[test]
    fn dropped_receiver_disables_ticks() {
        let (sink, rx) = ProgressSink::bounded(1);
        drop(rx);
        sink.tick();
        assert!(sink.is_disconnected());
        sink.tick();
        assert!(sink.clone().is_disconnected());
    }
}
