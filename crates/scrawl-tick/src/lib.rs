//! Per-room timers for scrawl.
//!
//! Two building blocks:
//!
//! - [`Countdown`]: a 1 Hz countdown that yields the seconds remaining.
//! - [`TimerSlots`]: at most one running timer per key (a room), either a
//!   countdown or a one-shot delay. Starting a timer for a key aborts the
//!   previous one.
//!
//! Timer tasks never touch game state. They only send [`TimerEvent`]s into
//! a channel owned by the caller, which processes them in order with every
//! other command:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = inbox.recv() => { /* player commands */ }
//!         Some(event) = timer_rx.recv() => {
//!             if !slots.is_current(&event.key, event.generation) {
//!                 continue; // aborted after it was queued
//!             }
//!             /* react to the tick or expiry */
//!         }
//!     }
//! }
//! ```
//!
//! # Generations
//!
//! Aborting a task does not recall events it already queued. Each timer
//! gets a generation number and every event carries it, so the receiver
//! can drop events from a timer that has since been replaced or cancelled.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::{self, Instant};
use tracing::{debug, trace};

const ONE_SECOND: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

/// A countdown that fires once per second.
///
/// A countdown of `n` seconds yields `n-1, n-2, …, 0` at one-second
/// intervals and then `None`. Deadlines are computed from the start
/// instant, so slow consumers do not drift the schedule.
#[derive(Debug)]
pub struct Countdown {
    remaining: u32,
    next_tick: Instant,
}

impl Countdown {
    /// Starts a countdown of `seconds`. The first tick is one second away.
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            next_tick: Instant::now() + ONE_SECOND,
        }
    }

    /// Waits for the next tick and returns the seconds left after it.
    ///
    /// Returns `None` immediately once the countdown reached zero.
    pub async fn tick(&mut self) -> Option<u32> {
        if self.remaining == 0 {
            return None;
        }
        time::sleep_until(self.next_tick).await;
        self.next_tick += ONE_SECOND;
        self.remaining -= 1;
        trace!(remaining = self.remaining, "countdown tick");
        Some(self.remaining)
    }

    /// Seconds left.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// What happened to a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// A countdown ticked; `remaining` seconds are left.
    Tick { remaining: u32 },
    /// A countdown reached zero. Always follows `Tick { remaining: 0 }`.
    Expired,
    /// A one-shot delay elapsed.
    Fired,
}

/// An event sent by a running timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerEvent<K> {
    pub key: K,
    /// The generation of the timer that produced this event.
    pub generation: u64,
    pub kind: TimerKind,
}

// ---------------------------------------------------------------------------
// TimerSlots
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Slot {
    generation: u64,
    handle: AbortHandle,
}

/// One cancellable timer per key.
///
/// Dropping the slots aborts every timer still running.
#[derive(Debug)]
pub struct TimerSlots<K>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
{
    tx: mpsc::UnboundedSender<TimerEvent<K>>,
    slots: HashMap<K, Slot>,
    next_generation: u64,
}

impl<K> TimerSlots<K>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
{
    /// Creates an empty set of slots whose timers report into `tx`.
    pub fn new(tx: mpsc::UnboundedSender<TimerEvent<K>>) -> Self {
        Self {
            tx,
            slots: HashMap::new(),
            next_generation: 1,
        }
    }

    /// Starts a countdown of `seconds` for `key`, replacing any timer the
    /// key already has. Returns the new timer's generation.
    ///
    /// The timer sends `Tick` once per second and `Expired` right after
    /// the final `Tick { remaining: 0 }`. A zero-second countdown expires
    /// immediately.
    ///
    /// # Panics
    /// Must be called from inside a Tokio runtime.
    pub fn start_countdown(&mut self, key: K, seconds: u32) -> u64 {
        let generation = self.claim(&key);
        let tx = self.tx.clone();
        let task_key = key.clone();

        let handle = tokio::spawn(async move {
            let mut countdown = Countdown::new(seconds);
            while let Some(remaining) = countdown.tick().await {
                let event = TimerEvent {
                    key: task_key.clone(),
                    generation,
                    kind: TimerKind::Tick { remaining },
                };
                if tx.send(event).is_err() {
                    return;
                }
            }
            let _ = tx.send(TimerEvent {
                key: task_key,
                generation,
                kind: TimerKind::Expired,
            });
        })
        .abort_handle();

        debug!(?key, generation, seconds, "countdown started");
        self.slots.insert(key, Slot { generation, handle });
        generation
    }

    /// Schedules a single `Fired` event for `key` after `delay`, replacing
    /// any timer the key already has. Returns the new timer's generation.
    ///
    /// # Panics
    /// Must be called from inside a Tokio runtime.
    pub fn schedule(&mut self, key: K, delay: Duration) -> u64 {
        let generation = self.claim(&key);
        let tx = self.tx.clone();
        let task_key = key.clone();

        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(TimerEvent {
                key: task_key,
                generation,
                kind: TimerKind::Fired,
            });
        })
        .abort_handle();

        debug!(?key, generation, delay_ms = delay.as_millis() as u64, "delay scheduled");
        self.slots.insert(key, Slot { generation, handle });
        generation
    }

    /// Aborts the timer for `key`. Returns `false` if there was none.
    pub fn cancel(&mut self, key: &K) -> bool {
        match self.slots.remove(key) {
            Some(slot) => {
                slot.handle.abort();
                trace!(?key, generation = slot.generation, "timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Returns `true` if `generation` is the live timer for `key`.
    ///
    /// Events that fail this check come from a replaced or cancelled timer
    /// and must be ignored.
    pub fn is_current(&self, key: &K, generation: u64) -> bool {
        self.slots
            .get(key)
            .is_some_and(|slot| slot.generation == generation)
    }

    /// Whether `key` has a timer slot.
    pub fn contains(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    /// Number of keys with a timer slot.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Aborts the key's old timer and hands out a fresh generation.
    fn claim(&mut self, key: &K) -> u64 {
        self.cancel(key);
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }
}

impl<K> Drop for TimerSlots<K>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
{
    fn drop(&mut self) {
        for slot in self.slots.values() {
            slot.handle.abort();
        }
    }
}
