/*!
 * CAS Counter
 *
 * Lock-free counter built from a compare-exchange retry loop instead of a
 * native fetch-and-add:
 *
 * ```text
 * loop {
 *     current = load()
 *     if CAS(current, current + delta) { break }
 * }
 * ```
 *
 * Every update is atomic, so concurrent updates never lose increments. Readers
 * see the history of updates, not a live traversal of whatever the counter
 * describes.
 */

use std::sync::atomic::{AtomicI64, Ordering};

/// Cache-line aligned counter updated with a read-CAS-retry loop
///
/// The value is signed: a gauge such as queue size can be observed below zero
/// for a moment when a decrement lands before the matching increment.
#[repr(C, align(64))]
#[derive(Debug, Default)]
pub struct CasCounter {
    value: AtomicI64,
}

impl CasCounter {
    #[inline]
    pub const fn new(initial: i64) -> Self {
        Self {
            value: AtomicI64::new(initial),
        }
    }

    /// Add `delta` (may be negative), returning the previous value
    #[inline]
    pub fn update(&self, delta: i64) -> i64 {
        let mut current = self.value.load(Ordering::Relaxed);
        loop {
            match self.value.compare_exchange_weak(
                current,
                current.wrapping_add(delta),
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(previous) => return previous,
                Err(actual) => current = actual,
            }
        }
    }

    #[inline]
    pub fn increment(&self) -> i64 {
        self.update(1)
    }

    #[inline]
    pub fn decrement(&self) -> i64 {
        self.update(-1)
    }

    /// Raw signed value
    #[inline(always)]
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Acquire)
    }

    /// Value clamped at zero
    #[inline]
    pub fn get_unsigned(&self) -> u64 {
        u64::try_from(self.get()).unwrap_or(0)
    }
}
