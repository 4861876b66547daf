#![forbid(unsafe_code)]

//! Deferred single-shot navigation tasks.
//!
//! Two kinds exist: the delayed activation queued by `select`, and the
//! resettle queued by a scope change. The queue never runs anything itself;
//! the navigator drains due tasks in [`DeferredQueue::take_due`] when the
//! host polls it.
//!
//! # Re-entrancy
//!
//! | Policy      | New task while one of the same kind is pending |
//! |-------------|-----------------------------------------------|
//! | `LastWins`  | pending task is cancelled, new one queued      |
//! | `FirstWins` | new task is dropped                            |
//! | `Unguarded` | both stay queued and both fire                 |
//!
//! Tasks of different kinds never affect each other.

use spatnav_core::{NavigableElement, Reentrancy};
use web_time::Instant;

/// Handle to a queued task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Activate,
    Resettle,
}

impl TaskKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Resettle => "resettle",
        }
    }
}

/// Work to perform once a delay elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Activate the element captured when `select` ran.
    Activate(NavigableElement),
    /// Re-establish the default selection after a scope change.
    Resettle,
}

impl Task {
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        match self {
            Self::Activate(_) => TaskKind::Activate,
            Self::Resettle => TaskKind::Resettle,
        }
    }
}

#[derive(Debug, Clone)]
struct Pending {
    id: TaskId,
    due: Instant,
    task: Task,
}

/// Pending deferred tasks ordered by due time.
#[derive(Debug, Clone)]
pub struct DeferredQueue {
    policy: Reentrancy,
    pending: Vec<Pending>,
    next_id: u64,
}

impl DeferredQueue {
    #[must_use]
    pub fn new(policy: Reentrancy) -> Self {
        Self {
            policy,
            pending: Vec::new(),
            next_id: 0,
        }
    }

    #[must_use]
    pub fn policy(&self) -> Reentrancy {
        self.policy
    }

    /// Queue `task` to run at `due`. Returns `None` when the policy drops it.
    pub fn schedule(&mut self, task: Task, due: Instant) -> Option<TaskId> {
        let kind = task.kind();
        match self.policy {
            Reentrancy::LastWins => {
                self.cancel_kind(kind, "superseded");
            }
            Reentrancy::FirstWins if self.has_pending(kind) => {
                tracing::debug!(
                    message = "nav.task.cancelled",
                    kind = kind.as_str(),
                    reason = "already_pending"
                );
                return None;
            }
            Reentrancy::FirstWins | Reentrancy::Unguarded => {}
        }

        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending { id, due, task });
        Some(id)
    }

    /// Cancel one task by handle.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let Some(index) = self.pending.iter().position(|p| p.id == id) else {
            return false;
        };
        let removed = self.pending.remove(index);
        tracing::debug!(
            message = "nav.task.cancelled",
            kind = removed.task.kind().as_str(),
            task = id.get(),
            reason = "explicit"
        );
        true
    }

    /// Cancel every pending task of `kind`; returns how many were dropped.
    pub fn cancel_kind(&mut self, kind: TaskKind, reason: &'static str) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.task.kind() != kind);
        let dropped = before - self.pending.len();
        if dropped > 0 {
            tracing::debug!(
                message = "nav.task.cancelled",
                kind = kind.as_str(),
                count = dropped as u64,
                reason
            );
        }
        dropped
    }

    #[must_use]
    pub fn has_pending(&self, kind: TaskKind) -> bool {
        self.pending.iter().any(|p| p.task.kind() == kind)
    }

    /// Earliest due time, if anything is queued.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Remove and return every task due at or before `now`, earliest first.
    /// Equal due times keep scheduling order.
    pub fn take_due(&mut self, now: Instant) -> Vec<Task> {
        let mut due: Vec<Pending> = Vec::new();
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].due <= now {
                due.push(self.pending.remove(index));
            } else {
                index += 1;
            }
        }
        due.sort_by_key(|p| (p.due, p.id));
        due.into_iter().map(|p| p.task).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl Default for DeferredQueue {
    fn default() -> Self {
        Self::new(Reentrancy::default())
    }
}
