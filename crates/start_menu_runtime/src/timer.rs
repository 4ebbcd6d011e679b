//! Cancellable delayed-action primitive keyed by owner.
//!
//! Timers never run callbacks themselves. The event loop polls [`HoverTimers::pop_due`] and
//! feeds each expired timer back into the ordered event stream, so a fired timer is processed
//! exactly like any other event.
//!
//! A zero delay never fires synchronously: it becomes due at `now` and fires on the next
//! [`HoverTimers::pop_due`] turn.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Opaque handle returned by [`HoverTimers::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Open the owner's submenu.
    Open,
}

/// One scheduled timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer<K> {
    pub owner: K,
    pub kind: TimerKind,
    pub fire_at: u64,
    pub handle: TimerHandle,
}

/// Timer set with at most one live timer per owner.
///
/// Scheduling for an owner that already has a timer replaces it (last writer wins).
#[derive(Debug, Clone)]
pub struct HoverTimers<K> {
    next_handle: u64,
    pending: HashMap<K, PendingTimer<K>>,
}

impl<K> Default for HoverTimers<K> {
    fn default() -> Self {
        Self {
            next_handle: 1,
            pending: HashMap::new(),
        }
    }
}

impl<K> HoverTimers<K>
where
    K: Clone + Eq + std::hash::Hash,
{
    pub fn schedule(&mut self, owner: K, kind: TimerKind, now: u64, delay_ms: u64) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        // An unrepresentable deadline degrades to immediate expiry instead of never firing.
        let fire_at = now.checked_add(delay_ms).unwrap_or(now);
        self.pending.insert(
            owner.clone(),
            PendingTimer {
                owner,
                kind,
                fire_at,
                handle,
            },
        );
        handle
    }

    /// Cancels the timer behind `handle`. No-op when it already fired or was cancelled/replaced.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|_, timer| timer.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_owner(&mut self, owner: &K) -> Option<PendingTimer<K>> {
        self.pending.remove(owner)
    }

    /// Keeps only timers whose owner satisfies `keep`; returns how many were cancelled.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|owner, _| keep(owner));
        before - self.pending.len()
    }

    pub fn clear(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    pub fn get(&self, owner: &K) -> Option<&PendingTimer<K>> {
        self.pending.get(owner)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.values().map(|timer| timer.fire_at).min()
    }

    /// Removes and returns the earliest timer due at `now` (ties broken by scheduling order).
    ///
    /// Callers pop one timer at a time so that handling an expiry can still cancel timers that
    /// are due in the same turn.
    pub fn pop_due(&mut self, now: u64) -> Option<PendingTimer<K>> {
        let owner = self
            .pending
            .values()
            .filter(|timer| timer.fire_at <= now)
            .min_by_key(|timer| (timer.fire_at, timer.handle))
            .map(|timer| timer.owner.clone())?;
        self.pending.remove(&owner)
    }
}
