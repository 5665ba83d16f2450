/*!
 * Queue Statistics
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Point-in-time view of a queue's counters
///
/// The three fields are read one after another, so under concurrent load they
/// need not describe a single instant. Once all operations have finished,
/// `size == enqueue_count - dequeue_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub size: u64,
    pub enqueue_count: u64,
    pub dequeue_count: u64,
}

impl QueueStats {
    /// True when the counters agree with each other
    #[inline]
    pub fn is_conserved(&self) -> bool {
        self.enqueue_count.checked_sub(self.dequeue_count) == Some(self.size)
    }
}

impl fmt::Display for QueueStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Non-locking Queue information:")?;
        writeln!(f, "size: {}", self.size)?;
        writeln!(f, "enqueue count: {}", self.enqueue_count)?;
        write!(f, "dequeue count: {}", self.dequeue_count)
    }
}
