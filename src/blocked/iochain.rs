//! Sequential-access coordinator for block workers.
//!
//! Workers processing consecutive blocks learn where their input and output
//! ranges start by taking a cursor, reading its head, and publishing the
//! next head. The guard returned by `get_in`/`get_out` is the iteration
//! token: while a worker holds it, no other worker can read that side, so
//! heads stay strictly increasing even when blocks are dispatched
//! concurrently. A worker cannot read a side twice without publishing in
//! between, because reading consumes the token.

use std::sync::{Mutex, MutexGuard};

pub struct IocChain {
    input: Mutex<usize>,
    output: Mutex<usize>,
}

/// Head position of one side, plus the token required to publish the next.
pub struct Cursor<'a>(MutexGuard<'a, usize>);

impl Cursor<'_> {
    /// Current head, in bytes from the start of the buffer.
    pub fn pos(&self) -> usize {
        *self.0
    }

    /// Publish the next head and release the token.
    pub fn set_next(mut self, next: usize) {
        *self.0 = next;
    }

    /// Read the head and publish `head + nbyte` in one step.
    pub fn advance(self, nbyte: usize) -> usize {
        let at = self.pos();
        self.set_next(at + nbyte);
        at
    }
}

impl IocChain {
    pub fn new() -> Self {
        IocChain {
            input: Mutex::new(0),
            output: Mutex::new(0),
        }
    }

    pub fn get_in(&self) -> Cursor<'_> {
        Cursor(lock(&self.input))
    }

    pub fn get_out(&self) -> Cursor<'_> {
        Cursor(lock(&self.output))
    }
}

impl Default for IocChain {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(side: &Mutex<usize>) -> MutexGuard<'_, usize> {
    side.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::IocChain;

    #[test]
    fn sides_advance_independently_and_monotonically() {
        let chain = IocChain::new();
        assert_eq!(chain.get_in().advance(16), 0);
        assert_eq!(chain.get_in().advance(8), 16);
        assert_eq!(chain.get_out().advance(100), 0);
        assert_eq!(chain.get_in().pos(), 24);
        assert_eq!(chain.get_out().pos(), 100);
    }

    #[test]
    fn set_next_is_visible_to_the_next_cursor() {
        let chain = IocChain::new();
        let cursor = chain.get_out();
        let at = cursor.pos();
        cursor.set_next(at + 42);
        assert_eq!(chain.get_out().pos(), 42);
    }
}
