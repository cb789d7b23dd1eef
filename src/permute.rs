//! Lazy permutations by recursive insertion.
//!
//! The permutations of `[x, rest @ ..]` are produced by taking every
//! permutation `p` of `rest` in turn and inserting `x` at each position
//! `0..=p.len()` in increasing order. Every level of the recursion keeps
//! only the permutation of its tail it is currently expanding, so an
//! iterator over `n` items never holds more than `O(n²)` items at once.

use std::iter::FusedIterator;

/// Iterator over all `n!` orderings of a sequence.
///
/// Single-pass: it can't be rewound, create a new one to start over. The
/// order is fully determined by the input order.
#[derive(Debug)]
pub struct Permutations<T> {
    state: State<T>,
}

#[derive(Debug)]
enum State<T> {
    /// Zero or one item, yields the input once.
    Single(Option<Vec<T>>),
    Insert {
        head: T,
        tail: Box<Permutations<T>>,
        /// Permutation of the tail currently being expanded.
        current: Option<Vec<T>>,
        /// Next insertion position in `current`.
        position: usize,
    },
}

impl<T: Clone> Permutations<T> {
    pub fn new(items: impl Into<Vec<T>>) -> Self {
        let mut items = items.into();

        if items.len() <= 1 {
            return Self {
                state: State::Single(Some(items)),
            };
        }

        let head = items.remove(0);
        Self {
            state: State::Insert {
                head,
                tail: Box::new(Self::new(items)),
                current: None,
                position: 0,
            },
        }
    }
}

impl<T: Clone> Iterator for Permutations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            State::Single(items) => items.take(),
            State::Insert {
                head,
                tail,
                current,
                position,
            } => loop {
                if let Some(perm) = current.as_ref()
                    && *position <= perm.len()
                {
                    let mut out = Vec::with_capacity(perm.len() + 1);
                    out.extend_from_slice(&perm[..*position]);
                    out.push(head.clone());
                    out.extend_from_slice(&perm[*position..]);
                    *position += 1;
                    return Some(out);
                }

                *current = Some(tail.next()?);
                *position = 0;
            },
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining() {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}

impl<T: Clone> FusedIterator for Permutations<T> {}

impl<T> Permutations<T> {
    /// Number of permutations left, `None` if it doesn't fit in `usize`.
    fn remaining(&self) -> Option<usize> {
        match &self.state {
            State::Single(items) => Some(usize::from(items.is_some())),
            State::Insert {
                tail,
                current,
                position,
                ..
            } => {
                let pending = match current {
                    Some(perm) => perm.len() + 1 - *position,
                    None => 0,
                };
                // every tail permutation is one item shorter than the output
                let width = match current {
                    Some(perm) => perm.len() + 1,
                    None => tail.width() + 1,
                };
                tail.remaining()?.checked_mul(width)?.checked_add(pending)
            }
        }
    }

    fn width(&self) -> usize {
        match &self.state {
            State::Single(Some(items)) => items.len(),
            // Exhausted single-item level, only reached through `remaining`
            // which multiplies it by zero anyway.
            State::Single(None) => 1,
            State::Insert { tail, .. } => tail.width() + 1,
        }
    }
}

/// `n!`, or `None` on overflow.
pub fn count(n: usize) -> Option<u64> {
    (1..=n as u64).try_fold(1u64, |acc, k| acc.checked_mul(k))
}
