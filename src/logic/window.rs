//! Event Window - bounded FIFO of the most recent admitted attacks
//!
//! Oldest first. Admission appends and evicts from the front once over
//! capacity; nothing else removes events except `clear` at teardown.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::event::AttackEvent;

// ============================================================================
// WINDOW
// ============================================================================

/// Outcome of one admission
#[derive(Debug, Clone, PartialEq)]
pub enum Admit {
    /// Appended; carries the event evicted to make room, if any
    Admitted { evicted: Option<AttackEvent> },
    /// Event lacked plottable coordinates, window untouched
    Refused,
}

#[derive(Debug, Clone)]
pub struct EventWindow {
    events: VecDeque<AttackEvent>,
    capacity: usize,
}

impl EventWindow {
    /// Create an empty window. A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append `event`, evicting the single oldest event when full
    pub fn admit(&mut self, event: AttackEvent) -> Admit {
        if !event.has_coordinates() {
            return Admit::Refused;
        }

        self.events.push_back(event);
        let evicted = if self.events.len() > self.capacity {
            self.events.pop_front()
        } else {
            None
        };

        Admit::Admitted { evicted }
    }

    /// Current contents in arrival order
    pub fn snapshot(&self) -> Vec<AttackEvent> {
        self.events.iter().cloned().collect()
    }

    /// Newest first, for feeds
    pub fn newest_first(&self) -> impl Iterator<Item = &AttackEvent> {
        self.events.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop everything (session teardown only)
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn status(&self) -> WindowStatus {
        WindowStatus {
            current_size: self.events.len(),
            capacity: self.capacity,
            fill_percent: self.events.len() as f32 / self.capacity as f32 * 100.0,
            newest_id: self.events.back().map(|e| e.id),
        }
    }
}

/// Window fill information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowStatus {
    pub current_size: usize,
    pub capacity: usize,
    pub fill_percent: f32,
    pub newest_id: Option<u64>,
}

// ============================================================================
// SHARED HANDLE
// ============================================================================

/// Window shared between the session task (sole writer) and snapshot readers.
/// Each admission happens under one write lock, so readers never see a torn state.
#[derive(Debug, Clone)]
pub struct SharedWindow {
    inner: Arc<RwLock<EventWindow>>,
}

impl SharedWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(EventWindow::new(capacity))),
        }
    }

    pub fn admit(&self, event: AttackEvent) -> Admit {
        self.inner.write().admit(event)
    }

    pub fn snapshot(&self) -> Vec<AttackEvent> {
        self.inner.read().snapshot()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn status(&self) -> WindowStatus {
        self.inner.read().status()
    }

    pub(crate) fn clear(&self) {
        self.inner.write().clear();
    }
}
