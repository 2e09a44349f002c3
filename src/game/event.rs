//! Event System
//!
//! Things that happened during a tick's Simulate phase, kept until the
//! start of the next tick so the host can react to them (logging a pickup,
//! for example) without the simulation knowing who is listening.

/// Events of one type raised during the current tick
#[derive(Debug)]
pub struct EventQueue<T> {
    pending: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { pending: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.pending.push(event);
    }

    /// This tick's events, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.pending.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Every queue the simulation writes to
#[derive(Debug, Default)]
pub struct Events {
    /// Player picked up a potion
    pub potion_collected: EventQueue<PotionCollected>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start of tick: forget the previous tick's events
    pub fn clear_all(&mut self) {
        self.potion_collected.clear();
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// A potion was consumed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PotionCollected {
    /// Index of the potion in the world's potion list
    pub potion: usize,
    /// Amount it healed
    pub heal: i32,
    /// Player health after healing
    pub health: i32,
}
