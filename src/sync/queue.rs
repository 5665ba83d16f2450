/*!
 * Non-Blocking FIFO Queue
 *
 * Michael-Scott style linked-list queue with a sentinel head node.
 *
 * # Layout
 *
 * ```text
 * head ──> [sentinel] ──> [a] ──> [b] ──> [c] ──> null
 *                                          ^
 *                                   tail (may lag)
 * ```
 *
 * # Enqueue strategies
 *
 * - **Lagging** (two CAS): link after the node `tail` points to, then try
 *   once to swing `tail`. If the link winner stops between the two CASes,
 *   `tail` stays stale and every other lagging producer spins until the winner
 *   resumes or a consumer catches up with `tail` and repairs it.
 * - **Scanning**: walk from `tail` to the node whose `next` is null and link
 *   there. A stale `tail` only costs a longer walk, so a stalled winner never
 *   blocks other producers.
 *
 * # Reclamation
 *
 * Every operation runs pinned to a crossbeam epoch. A dequeued sentinel is
 * retired with `defer_destroy` and freed only after every thread that could
 * hold a reference to it has unpinned. Dequeue swings a lagging `tail` forward
 * before moving `head` past it, so `tail` never references a retired node.
 */

use super::backoff::Backoff;
use super::config::{EnqueueStrategy, QueueConfig};
use super::counter::CasCounter;
use super::stats::QueueStats;
use crate::errors::{QueueError, Result};
use crossbeam_epoch::{self as epoch, Atomic, Guard, Owned, Shared};
use std::fmt;
use std::sync::atomic::Ordering;
use tracing::{debug, trace};

/// Payload carried by every queue element
pub type Data = u64;

struct Node {
    value: Data,
    next: Atomic<Node>,
}

impl Node {
    #[inline]
    fn new(value: Data) -> Self {
        Self {
            value,
            next: Atomic::null(),
        }
    }

    #[inline]
    fn sentinel() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
thread_local! {
    static NODES_RELEASED_ON_DROP: std::cell::Cell<usize> = std::cell::Cell::new(0);
}

/// Lock-free unbounded FIFO queue of [`Data`] values
///
/// Any number of threads may enqueue and dequeue concurrently through `&self`;
/// share it with `Arc`. No operation takes a lock or blocks. Retry loops are
/// driven only by failed CASes, each of which means another thread made
/// progress.
///
/// # Example
///
/// ```
/// use nlqueue::{LockFreeQueue, QueueError};
///
/// let queue = LockFreeQueue::new();
/// queue.enqueue(7);
/// queue.enqueue(8);
///
/// assert_eq!(queue.dequeue(), Ok(7));
/// assert_eq!(queue.dequeue(), Ok(8));
/// assert_eq!(queue.dequeue(), Err(QueueError::Empty));
/// ```
pub struct LockFreeQueue {
    head: Atomic<Node>,
    tail: Atomic<Node>,
    enqueue_count: CasCounter,
    dequeue_count: CasCounter,
    size: CasCounter,
    config: QueueConfig,
    strategy: EnqueueStrategy,
}

impl LockFreeQueue {
    /// Create an empty queue with the default configuration
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Create an empty queue
    pub fn with_config(config: QueueConfig) -> Self {
        let strategy = config.select_strategy();

        // Not yet shared with any other thread
        let sentinel = Owned::new(Node::sentinel()).into_shared(unsafe { epoch::unprotected() });

        debug!(
            strategy = ?strategy,
            spin_limit = config.backoff.spin_limit,
            yield_limit = config.backoff.yield_limit,
            "Lock-free queue created"
        );

        Self {
            head: Atomic::from(sentinel),
            tail: Atomic::from(sentinel),
            enqueue_count: CasCounter::new(0),
            dequeue_count: CasCounter::new(0),
            size: CasCounter::new(0),
            config,
            strategy,
        }
    }

    /// Configuration this queue was built with
    #[inline]
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Algorithm `enqueue` dispatches to
    #[inline]
    pub fn strategy(&self) -> EnqueueStrategy {
        self.strategy
    }

    /// Append `value` using the configured strategy
    #[inline]
    pub fn enqueue(&self, value: Data) {
        match self.strategy {
            EnqueueStrategy::Lagging => self.enqueue_lagging(value),
            EnqueueStrategy::Scanning | EnqueueStrategy::Auto => self.enqueue_scanning(value),
        }
    }

    /// Append `value` with the two-CAS algorithm
    ///
    /// Links only after the node `tail` currently references. If another
    /// producer linked there first, rereads `tail` and retries. A producer
    /// stalled between its link and its tail swing therefore stalls this one
    /// too.
    pub fn enqueue_lagging(&self, value: Data) {
        let guard = &epoch::pin();
        let (observed_tail, linked) = self.link_after_tail(Owned::new(Node::new(value)), guard);
        self.advance_tail(observed_tail, linked, guard);
        self.record_enqueue();
    }

    /// Append `value` with the tail-scan algorithm
    ///
    /// Walks from `tail` to the true last node before linking, so the link
    /// succeeds regardless of how far `tail` lags.
    pub fn enqueue_scanning(&self, value: Data) {
        let guard = &epoch::pin();
        let (observed_tail, linked) = self.link_after_last(Owned::new(Node::new(value)), guard);
        self.advance_tail(observed_tail, linked, guard);
        self.record_enqueue();
    }

    /// Remove and return the oldest element
    ///
    /// Returns [`QueueError::Empty`] when head's successor is null; an empty
    /// dequeue leaves counters, head and tail untouched.
    pub fn dequeue(&self) -> Result<Data> {
        let guard = &epoch::pin();
        let mut backoff = Backoff::new(&self.config.backoff);

        loop {
            let head = self.head.load(Ordering::Acquire, guard);
            // SAFETY: head is never null and we are pinned
            let next = unsafe { head.deref() }.next.load(Ordering::Acquire, guard);

            if next.is_null() {
                trace!("Dequeue on empty queue");
                return Err(QueueError::Empty);
            }

            let tail = self.tail.load(Ordering::Acquire, guard);
            if tail == head {
                // Tail lags behind a linked node; move it before head passes it
                let _ = self.tail.compare_exchange(
                    tail,
                    next,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                    guard,
                );
                continue;
            }

            match self
                .head
                .compare_exchange(head, next, Ordering::AcqRel, Ordering::Acquire, guard)
            {
                Ok(_) => {
                    // SAFETY: next is the new sentinel, still live while pinned
                    let value = unsafe { next.deref() }.value;
                    // SAFETY: unlinked by this thread; no new reader can reach it
                    unsafe { guard.defer_destroy(head) };

                    self.dequeue_count.increment();
                    self.size.decrement();
                    return Ok(value);
                }
                Err(_) => backoff.snooze(),
            }
        }
    }

    /// Elements currently queued, from the size counter
    #[inline]
    pub fn size(&self) -> u64 {
        self.size.get_unsigned()
    }

    /// Successful enqueues so far
    #[inline]
    pub fn enqueue_count(&self) -> u64 {
        self.enqueue_count.get_unsigned()
    }

    /// Successful dequeues so far
    #[inline]
    pub fn dequeue_count(&self) -> u64 {
        self.dequeue_count.get_unsigned()
    }

    /// True when head's successor is null at the moment of the check
    pub fn is_empty(&self) -> bool {
        let guard = &epoch::pin();
        let head = self.head.load(Ordering::Acquire, guard);
        // SAFETY: head is never null and we are pinned
        unsafe { head.deref() }.next.load(Ordering::Acquire, guard).is_null()
    }

    /// Read all three counters
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            size: self.size(),
            enqueue_count: self.enqueue_count(),
            dequeue_count: self.dequeue_count(),
        }
    }

    /// Human-readable counter summary
    ///
    /// Does not enumerate elements; see [`LockFreeQueue::snapshot`].
    pub fn report(&self) -> String {
        self.stats().to_string()
    }

    /// Elements in FIFO order
    ///
    /// Takes `&mut self`: no other thread can mutate the queue during the walk,
    /// so the result is a consistent picture of the queue.
    pub fn snapshot(&mut self) -> Vec<Data> {
        let guard = &epoch::pin();
        let mut values = Vec::with_capacity(self.size() as usize);

        let head = self.head.load(Ordering::Acquire, guard);
        // SAFETY: exclusive access; every reachable node is live
        let mut current = unsafe { head.deref() }.next.load(Ordering::Acquire, guard);
        while let Some(node) = unsafe { current.as_ref() } {
            values.push(node.value);
            current = node.next.load(Ordering::Acquire, guard);
        }

        values
    }

    /// Link `node` after the node `tail` references, retrying from a fresh
    /// `tail` read on failure. Returns (tail observed at link time, linked node).
    fn link_after_tail<'g>(
        &self,
        mut node: Owned<Node>,
        guard: &'g Guard,
    ) -> (Shared<'g, Node>, Shared<'g, Node>) {
        let mut backoff = Backoff::new(&self.config.backoff);

        loop {
            let tail = self.tail.load(Ordering::Acquire, guard);
            // SAFETY: tail is never null and never references a retired node
            let tail_ref = unsafe { tail.deref() };

            match tail_ref.next.compare_exchange(
                Shared::null(),
                node,
                Ordering::AcqRel,
                Ordering::Acquire,
                guard,
            ) {
                Ok(linked) => return (tail, linked),
                Err(err) => {
                    node = err.new;
                    backoff.snooze();
                }
            }
        }
    }

    /// Walk from `tail` to the last node and link `node` there. On a lost race
    /// the scan restarts from `tail`. Returns (tail the scan started from,
    /// linked node).
    fn link_after_last<'g>(
        &self,
        mut node: Owned<Node>,
        guard: &'g Guard,
    ) -> (Shared<'g, Node>, Shared<'g, Node>) {
        let mut backoff = Backoff::new(&self.config.backoff);

        loop {
            let start = self.tail.load(Ordering::Acquire, guard);
            let mut last = start;

            // SAFETY: nodes reachable from tail stay allocated while pinned
            loop {
                let next = unsafe { last.deref() }.next.load(Ordering::Acquire, guard);
                if next.is_null() {
                    break;
                }
                last = next;
            }

            match unsafe { last.deref() }.next.compare_exchange(
                Shared::null(),
                node,
                Ordering::AcqRel,
                Ordering::Acquire,
                guard,
            ) {
                Ok(linked) => return (start, linked),
                Err(err) => {
                    node = err.new;
                    backoff.snooze();
                }
            }
        }
    }

    /// Best-effort tail swing. Failure means tail already moved on.
    #[inline]
    fn advance_tail<'g>(
        &self,
        expected: Shared<'g, Node>,
        new: Shared<'g, Node>,
        guard: &'g Guard,
    ) -> bool {
        self.tail
            .compare_exchange(expected, new, Ordering::AcqRel, Ordering::Acquire, guard)
            .is_ok()
    }

    #[inline]
    fn record_enqueue(&self) {
        self.enqueue_count.increment();
        self.size.increment();
    }
}

impl Default for LockFreeQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LockFreeQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockFreeQueue")
            .field("strategy", &self.strategy)
            .field("stats", &self.stats())
            .finish()
    }
}

impl Drop for LockFreeQueue {
    fn drop(&mut self) {
        let mut released = 0usize;

        // SAFETY: `&mut self` means no other thread holds the queue; nodes
        // retired earlier are owned by the epoch collector, not this chain.
        unsafe {
            let guard = epoch::unprotected();
            let mut current = self.head.load(Ordering::Relaxed, guard);
            while !current.is_null() {
                let next = current.deref().next.load(Ordering::Relaxed, guard);
                drop(current.into_owned());
                released += 1;
                current = next;
            }
        }

        #[cfg(test)]
        NODES_RELEASED_ON_DROP.with(|count| count.set(count.get() + released));

        debug!(released, "Lock-free queue torn down");
    }
}
