/*!
 * Random single-threaded exerciser checked against a VecDeque model
 */

use nlqueue::{init_tracing, EnqueueStrategy, LockFreeQueue, QueueConfig, QueueError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

fn exercise(strategy: EnqueueStrategy, seed: u64, steps: u64) {
    let queue = LockFreeQueue::with_config(QueueConfig {
        enqueue_strategy: strategy,
        ..Default::default()
    });
    let mut model = VecDeque::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut empty_hits = 0u64;

    for i in 0..steps {
        if rng.gen_bool(0.5) {
            queue.enqueue(i);
            model.push_back(i);
        } else {
            match (queue.dequeue(), model.pop_front()) {
                (Ok(got), Some(want)) => assert_eq!(got, want, "step {}", i),
                (Err(QueueError::Empty), None) => empty_hits += 1,
                (got, want) => panic!("step {}: queue gave {:?}, model {:?}", i, got, want),
            }
        }

        assert_eq!(queue.size(), model.len() as u64);
    }

    let stats = queue.stats();
    assert!(stats.is_conserved());
    assert_eq!(stats.enqueue_count + empty_hits, steps - stats.dequeue_count);
}

#[test]
fn test_random_exerciser_scanning() {
    init_tracing();
    for seed in 0..8 {
        exercise(EnqueueStrategy::Scanning, seed, 1_000);
    }
}

#[test]
fn test_random_exerciser_lagging() {
    init_tracing();
    for seed in 100..108 {
        exercise(EnqueueStrategy::Lagging, seed, 1_000);
    }
}
