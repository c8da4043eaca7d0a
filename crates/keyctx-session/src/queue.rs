//! Single-threaded deferred work, drained one scheduling turn at a time.
//!
//! The owner of the target state calls [`MainQueue::run_turn`] from its
//! serialized execution context (one host refresh cycle per turn). Jobs never
//! run concurrently with each other or with the code that queued them.

use std::collections::VecDeque;
use std::fmt;

use keyctx_core::config::config;

type Job<T> = Box<dyn FnOnce(&mut T) + Send>;

struct Pending<T> {
    turns_left: u32,
    /// Jobs sharing a slot replace each other while still pending.
    slot: Option<&'static str>,
    job: Job<T>,
}

pub struct MainQueue<T> {
    pending: VecDeque<Pending<T>>,
}

impl<T> MainQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    /// Run `job` after the configured number of turns (`[host] deferred_turns`).
    pub fn defer<F>(&mut self, job: F)
    where
        F: FnOnce(&mut T) + Send + 'static,
    {
        self.defer_turns(config().host.deferred_turns, job);
    }

    /// Run `job` on the `turns`-th call to `run_turn` from now (minimum 1).
    pub fn defer_turns<F>(&mut self, turns: u32, job: F)
    where
        F: FnOnce(&mut T) + Send + 'static,
    {
        self.push(None, turns, Box::new(job));
    }

    /// Like [`MainQueue::defer`], but drops any pending job queued under the
    /// same `slot`. At most one job per slot is ever pending.
    pub fn defer_latest<F>(&mut self, slot: &'static str, job: F)
    where
        F: FnOnce(&mut T) + Send + 'static,
    {
        let before = self.pending.len();
        self.pending.retain(|p| p.slot != Some(slot));
        if self.pending.len() < before {
            tracing::trace!(slot, "replaced pending job");
        }
        self.push(Some(slot), config().host.deferred_turns, Box::new(job));
    }

    fn push(&mut self, slot: Option<&'static str>, turns: u32, job: Job<T>) {
        self.pending.push_back(Pending {
            turns_left: turns.max(1),
            slot,
            job,
        });
    }

    /// Advance one turn, running due jobs in the order they were queued.
    /// Returns the number of jobs run.
    pub fn run_turn(&mut self, target: &mut T) -> usize {
        let mut due = Vec::new();
        let mut waiting = VecDeque::with_capacity(self.pending.len());
        for mut p in self.pending.drain(..) {
            p.turns_left -= 1;
            if p.turns_left == 0 {
                due.push(p.job);
            } else {
                waiting.push_back(p);
            }
        }
        self.pending = waiting;

        let count = due.len();
        for job in due {
            job(target);
        }
        count
    }

    /// Run turns until nothing is pending. Returns the number of jobs run.
    pub fn run_until_idle(&mut self, target: &mut T) -> usize {
        let mut total = 0;
        while !self.pending.is_empty() {
            total += self.run_turn(target);
        }
        total
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for MainQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for MainQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainQueue")
            .field("pending", &self.pending.len())
            .finish()
    }
}
