/*!
 * CAS Retry Backoff
 *
 * Exponential backoff for compare-and-swap retry loops.
 *
 * Two phases, both non-blocking:
 *
 * 1. **Spin phase** (step < spin_limit): `2^step` `spin_loop()` hints
 * 2. **Yield phase** (step >= spin_limit): spin at the cap, then
 *    `yield_now()` once step reaches yield_limit
 *
 * The backoff never parks or sleeps. A retry loop using it is still lock-free:
 * a failed CAS means some other thread's CAS succeeded.
 */

use super::config::BackoffConfig;
use std::thread;

/// Per-operation backoff state
///
/// Create one per operation; it is cheap and lives on the stack.
#[derive(Debug)]
pub struct Backoff {
    step: u32,
    spin_limit: u32,
    yield_limit: u32,
}

impl Backoff {
    #[inline]
    pub fn new(config: &BackoffConfig) -> Self {
        Self {
            step: 0,
            spin_limit: config.spin_limit,
            yield_limit: config.yield_limit.max(config.spin_limit),
        }
    }

    /// Back off after a failed CAS
    #[inline]
    pub fn snooze(&mut self) {
        if self.step < self.yield_limit || self.yield_limit == 0 {
            let exp = self.step.min(self.spin_limit).min(31);
            for _ in 0..(1u32 << exp) {
                std::hint::spin_loop();
            }
        } else {
            thread::yield_now();
        }

        if self.step <= self.yield_limit {
            self.step += 1;
        }
    }

    /// Restart from the tight spin phase
    #[inline]
    pub fn reset(&mut self) {
        self.step = 0;
    }

    /// True once retries have moved past pure spinning
    #[inline]
    pub fn is_yielding(&self) -> bool {
        self.yield_limit > 0 && self.step >= self.yield_limit
    }

    /// Number of snoozes recorded (saturates just past the yield limit)
    #[inline]
    pub fn step(&self) -> u32 {
        self.step
    }
}
