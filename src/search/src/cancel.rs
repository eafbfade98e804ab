use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Instant,
};

use crate::strategy::Interrupted;

/// A cloneable flag that stops a running search at its next node.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The deadline is only compared every this many nodes.
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// Every reason a running search has to stop early, shared by its workers.
#[derive(Debug, Default)]
pub(crate) struct StopSignal {
    abort: AtomicBool,
    token: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl StopSignal {
    pub(crate) fn new(token: Option<CancellationToken>, deadline: Option<Instant>) -> Self {
        StopSignal {
            abort: AtomicBool::new(false),
            token,
            deadline,
        }
    }

    /// Stop every worker, used when one of them fails.
    pub(crate) fn abort(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn check(&self, nodes_visited: u64) -> Option<Interrupted> {
        if self.abort.load(Ordering::Relaxed) {
            return Some(Interrupted::Aborted);
        }
        if self
            .token
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            return Some(Interrupted::Cancelled);
        }
        if let Some(deadline) = self.deadline
            && nodes_visited % DEADLINE_CHECK_INTERVAL == 0
            && Instant::now() >= deadline
        {
            return Some(Interrupted::TimedOut);
        }
        None
    }
}
