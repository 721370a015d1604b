//! LIFO stack of unconsumed acquisitions for one instrument.
//!
//! Only the top entry is ever reduced or removed. There is no index access,
//! so an empty stack surfaces as `None` instead of an out-of-bounds read.

/// An acquisition that still has quantity left to match.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OpenEntry {
    pub day: i64,
    /// Always > 0 while the entry is on the stack.
    pub remaining: f64,
    pub price: f64,
}

#[derive(Clone, Debug, Default)]
pub struct AcquisitionStack {
    entries: Vec<OpenEntry>,
}

impl AcquisitionStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: OpenEntry) {
        debug_assert!(entry.remaining > 0.0);
        self.entries.push(entry);
    }

    /// Most recently acquired entry.
    pub fn peek(&self) -> Option<&OpenEntry> {
        self.entries.last()
    }

    pub fn peek_mut(&mut self) -> Option<&mut OpenEntry> {
        self.entries.last_mut()
    }

    pub fn pop(&mut self) -> Option<OpenEntry> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total acquired minus total disposed so far.
    pub fn total_remaining(&self) -> f64 {
        self.entries.iter().map(|e| e.remaining).sum()
    }

    /// Consume the stack, yielding entries oldest first.
    pub fn drain_open(self) -> impl Iterator<Item = OpenEntry> {
        self.entries.into_iter()
    }
}
