//! A blocking counting pool of file handle tokens.
//!
//! Every open file in the crate is paired with a [`Token`] taken from a
//! shared [`HandlePool`]. The pool holds a fixed number of tokens for its
//! whole lifetime: `held + available == capacity` at every instant. Tokens
//! are RAII guards, dropping one returns it to the pool, so a token is
//! released exactly once on every exit path of the code holding it,
//! including early returns on I/O errors and unwinding panics.

use std::sync::{Condvar, Mutex, MutexGuard};

#[derive(Debug)]
struct State {
    available: usize,
    /// Highest number of tokens held at the same time.
    peak: usize,
}

/// Fixed-capacity pool limiting the number of concurrently open handles.
///
/// Waiters are woken one at a time on release. There is no FIFO guarantee,
/// but every waiter is eventually served as long as tokens keep being
/// returned.
#[derive(Debug)]
pub struct HandlePool {
    capacity: usize,
    state: Mutex<State>,
    cv: Condvar,
}

impl HandlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(State {
                available: capacity,
                peak: 0,
            }),
            cv: Condvar::new(),
        }
    }

    /// The state is a plain counter, so a panic while it was locked cannot
    /// leave it inconsistent. Recover instead of poisoning every other
    /// worker, release runs in `Drop` and must not panic.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    /// Blocks until a token is available and takes it.
    pub fn acquire(&self) -> Token<'_> {
        let mut state = self.lock();

        if state.available == 0 {
            tracing::debug!("handle pool exhausted, waiting for a release");
        }

        while state.available == 0 {
            state = self
                .cv
                .wait(state)
                .unwrap_or_else(|poison| poison.into_inner());
        }

        state.available -= 1;
        let held = self.capacity - state.available;
        state.peak = state.peak.max(held);

        Token { pool: self }
    }

    /// Takes a token if one is available right now.
    pub fn try_acquire(&self) -> Option<Token<'_>> {
        let mut state = self.lock();
        if state.available == 0 {
            return None;
        }

        state.available -= 1;
        let held = self.capacity - state.available;
        state.peak = state.peak.max(held);

        Some(Token { pool: self })
    }

    fn release(&self) {
        let mut state = self.lock();
        debug_assert!(state.available < self.capacity, "token released twice");
        state.available += 1;
        drop(state);
        self.cv.notify_one();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.lock().available
    }

    pub fn held(&self) -> usize {
        self.capacity - self.available()
    }

    pub fn peak(&self) -> usize {
        self.lock().peak
    }
}

/// Permission to keep one handle open. Returned to the pool on drop.
#[must_use = "dropping a token releases it immediately"]
#[derive(Debug)]
pub struct Token<'a> {
    pool: &'a HandlePool,
}

impl Drop for Token<'_> {
    fn drop(&mut self) {
        self.pool.release();
    }
}
