//! Repeating-step scheduler.
//!
//! Entries are queued by the tick they are next due at, in a
//! `BTreeMap<Tick, Vec<EntryId>>`.  Each tick the due entries are drained,
//! run in ascending `(ordering, EntryId)` order and re-queued `interval`
//! ticks later.  `EntryId`s are assigned in insertion order, so equal
//! orderings run in the order they were scheduled.

use std::collections::BTreeMap;

use gl_core::Tick;

use crate::{SimError, SimResult};

/// A task the schedule runs against a world `W`.
pub trait Steppable<W> {
    fn step(&mut self, world: &mut W, tick: Tick);
}

/// When and how often an entry runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Repeat {
    /// First tick the entry runs at.
    pub start:    Tick,
    /// Ticks between runs.  Must be > 0.
    pub interval: u64,
    /// Lower orderings run first within a tick.
    pub ordering: i32,
}

impl Repeat {
    pub fn every(interval: u64) -> Self {
        Self { start: Tick::ZERO, interval, ordering: 0 }
    }

    pub fn starting(mut self, start: Tick) -> Self {
        self.start = start;
        self
    }

    pub fn ordering(mut self, ordering: i32) -> Self {
        self.ordering = ordering;
        self
    }
}

/// Position of an entry in the schedule.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub u32);

struct Entry<W> {
    task:   Box<dyn Steppable<W>>,
    repeat: Repeat,
}

pub struct Schedule<W> {
    entries: Vec<Entry<W>>,
    queue:   BTreeMap<Tick, Vec<EntryId>>,
}

impl<W> Schedule<W> {
    pub fn new() -> Self {
        Self { entries: Vec::new(), queue: BTreeMap::new() }
    }

    /// Add `task` to run at `repeat.start` and every `repeat.interval` ticks
    /// after.
    pub fn schedule_repeating(
        &mut self,
        task:   Box<dyn Steppable<W>>,
        repeat: Repeat,
    ) -> SimResult<EntryId> {
        if repeat.interval == 0 {
            return Err(SimError::Config("repeat interval must be > 0".to_string()));
        }
        let id = EntryId(self.entries.len() as u32);
        self.entries.push(Entry { task, repeat });
        self.queue.entry(repeat.start).or_default().push(id);
        Ok(id)
    }

    /// Run every entry due at or before `tick`.  Returns how many ran.
    pub fn step(&mut self, world: &mut W, tick: Tick) -> usize {
        let later = self.queue.split_off(&tick.offset(1));
        let due_map = std::mem::replace(&mut self.queue, later);

        let mut due: Vec<EntryId> = due_map.into_values().flatten().collect();
        due.sort_unstable_by_key(|&id| (self.entries[id.0 as usize].repeat.ordering, id));

        for &id in &due {
            let entry = &mut self.entries[id.0 as usize];
            entry.task.step(world, tick);
            if let Some(next) = tick.0.checked_add(entry.repeat.interval) {
                self.queue.entry(Tick(next)).or_default().push(id);
            }
        }
        due.len()
    }

    /// Number of scheduled entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest tick with a due entry.
    pub fn next_tick(&self) -> Option<Tick> {
        self.queue.keys().next().copied()
    }
}

impl<W> Default for Schedule<W> {
    fn default() -> Self {
        Self::new()
    }
}
