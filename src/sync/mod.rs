/*!
 * Lock-Free Queue Primitives
 *
 * - Michael-Scott queue with two selectable enqueue algorithms
 * - CAS-loop counters for queue diagnostics
 * - Non-blocking retry backoff
 */

mod backoff;
mod config;
mod counter;
mod queue;
mod stats;

// Re-export public API
pub use backoff::Backoff;
pub use config::{
    BackoffConfig, EnqueueStrategy, QueueConfig, ENV_ENQUEUE_STRATEGY, ENV_SPIN_LIMIT,
    ENV_YIELD_LIMIT,
};
pub use counter::CasCounter;
pub use queue::{Data, LockFreeQueue};
pub use stats::QueueStats;
