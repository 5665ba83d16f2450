/*!
 * Non-Locking Queue Library
 * Lock-free FIFO queue built on compare-and-swap, with diagnostics counters
 */

pub mod errors;
pub mod monitoring;
pub mod sync;

// Re-exports
pub use errors::*;
pub use monitoring::init_tracing;
pub use sync::{
    BackoffConfig, CasCounter, Data, EnqueueStrategy, LockFreeQueue, QueueConfig, QueueStats,
};
