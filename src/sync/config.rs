/*!
 * Queue Configuration
 *
 * Runtime configuration for enqueue strategy selection and CAS retry backoff
 */

use crate::errors::{QueueError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Environment variable selecting the enqueue strategy
pub const ENV_ENQUEUE_STRATEGY: &str = "NLQUEUE_ENQUEUE_STRATEGY";
/// Environment variable overriding the backoff spin limit
pub const ENV_SPIN_LIMIT: &str = "NLQUEUE_SPIN_LIMIT";
/// Environment variable overriding the backoff yield limit
pub const ENV_YIELD_LIMIT: &str = "NLQUEUE_YIELD_LIMIT";

/// Enqueue algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnqueueStrategy {
    /// Two-CAS enqueue that only ever links after the published tail.
    /// Stalls other producers if a link winner stops before moving tail.
    Lagging,
    /// Scans from tail to the true last node before linking; tolerates a
    /// stalled link winner.
    Scanning,
    /// Pick the algorithm suited to concurrent producers
    Auto,
}

impl FromStr for EnqueueStrategy {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lagging" | "two-cas" => Ok(EnqueueStrategy::Lagging),
            "scanning" | "tail-scan" => Ok(EnqueueStrategy::Scanning),
            "auto" => Ok(EnqueueStrategy::Auto),
            other => Err(QueueError::Configuration(format!(
                "unknown enqueue strategy '{}'",
                other
            ))),
        }
    }
}

/// Backoff tuning for CAS retry loops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Steps of exponential CPU-hint spinning before yielding
    pub spin_limit: u32,
    /// Step count after which every retry yields to the scheduler
    pub yield_limit: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            spin_limit: 6,
            yield_limit: 10,
        }
    }
}

/// Queue configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Algorithm used by `enqueue`
    pub enqueue_strategy: EnqueueStrategy,
    /// CAS retry backoff
    pub backoff: BackoffConfig,
}

impl Default for EnqueueStrategy {
    fn default() -> Self {
        EnqueueStrategy::Scanning
    }
}

impl QueueConfig {
    /// Configuration for lightly contended queues: retry almost immediately
    pub const fn low_latency() -> Self {
        Self {
            enqueue_strategy: EnqueueStrategy::Scanning,
            backoff: BackoffConfig {
                spin_limit: 2,
                yield_limit: 4,
            },
        }
    }

    /// Configuration for many producers and consumers hammering one queue
    pub const fn high_contention() -> Self {
        Self {
            enqueue_strategy: EnqueueStrategy::Auto,
            backoff: BackoffConfig {
                spin_limit: 8,
                yield_limit: 12,
            },
        }
    }

    /// Build a configuration from defaults overridden by environment variables
    ///
    /// Environment variables:
    /// - NLQUEUE_ENQUEUE_STRATEGY: lagging, scanning or auto
    /// - NLQUEUE_SPIN_LIMIT / NLQUEUE_YIELD_LIMIT: unsigned integers
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_ENQUEUE_STRATEGY) {
            config.enqueue_strategy = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_SPIN_LIMIT) {
            config.backoff.spin_limit = parse_limit(ENV_SPIN_LIMIT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_YIELD_LIMIT) {
            config.backoff.yield_limit = parse_limit(ENV_YIELD_LIMIT, &raw)?;
        }

        if config.backoff.yield_limit < config.backoff.spin_limit {
            return Err(QueueError::Configuration(format!(
                "yield limit {} is below spin limit {}",
                config.backoff.yield_limit, config.backoff.spin_limit
            )));
        }

        Ok(config)
    }

    /// Resolve `Auto` to a concrete algorithm
    pub fn select_strategy(&self) -> EnqueueStrategy {
        match self.enqueue_strategy {
            // The scanning variant is the one safe under multi-producer load
            EnqueueStrategy::Auto => EnqueueStrategy::Scanning,
            other => other,
        }
    }
}

fn parse_limit(key: &str, raw: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|e| QueueError::Configuration(format!("{}='{}': {}", key, raw, e)))
}
