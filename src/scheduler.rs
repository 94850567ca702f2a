//! One-shot deferred work, ordered by deadline.
//!
//! Breaks, transitions, and settle-window swaps all finish later. The
//! scheduler holds that work as plain data; drivers call `run_due` with the
//! current instant and act on whatever has come due. Nothing here sleeps
//! or spawns.

use std::time::Instant;

use crate::product_parser::ProductRequest;
use crate::slots::SlotId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// Work the engine put off until a deadline.
#[derive(Debug, Clone)]
pub enum DeferredTask {
    /// Second half of a same-slot swap: build the replacement once the old
    /// voice has settled out.
    FinishSwap {
        slot: SlotId,
        request: ProductRequest,
    },
    /// Restart the clock after a break that paused it.
    ResumeClock,
    /// Say something when the moment arrives.
    Announce { message: String },
}

#[derive(Debug)]
struct Entry {
    id: TaskId,
    due: Instant,
    task: DeferredTask,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler::default()
    }

    pub fn schedule_at(&mut self, due: Instant, task: DeferredTask) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, due, task });
        id
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.entries.iter().position(|entry| entry.id == id) {
            Some(at) => {
                self.entries.remove(at);
                true
            }
            None => false,
        }
    }

    /// Drop any deferred swap aimed at the slot. Other task kinds stay.
    pub fn cancel_swaps_for(&mut self, slot: SlotId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| {
            !matches!(&entry.task, DeferredTask::FinishSwap { slot: target, .. } if *target == slot)
        });
        before - self.entries.len()
    }

    /// The in-flight swap for a slot, if one is waiting to finish.
    pub fn swap_for(&self, slot: SlotId) -> Option<&ProductRequest> {
        self.entries.iter().find_map(|entry| match &entry.task {
            DeferredTask::FinishSwap { slot: target, request } if *target == slot => Some(request),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest outstanding deadline; drivers size their waits from this.
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.due).min()
    }

    /// Remove and return everything due by `now`, earliest deadline first.
    pub fn run_due(&mut self, now: Instant) -> Vec<DeferredTask> {
        let mut due = Vec::new();
        let mut keep = Vec::new();
        for entry in self.entries.drain(..) {
            if entry.due <= now {
                due.push(entry);
            } else {
                keep.push(entry);
            }
        }
        self.entries = keep;
        due.sort_by_key(|entry| (entry.due, entry.id.0));
        due.into_iter().map(|entry| entry.task).collect()
    }
}
