/*!
 * Property-based tests for FIFO order and counter conservation
 */

use nlqueue::{EnqueueStrategy, LockFreeQueue, QueueConfig};
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Op {
    EnqueueLagging(u64),
    EnqueueScanning(u64),
    Dequeue,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u64>().prop_map(Op::EnqueueLagging),
        any::<u64>().prop_map(Op::EnqueueScanning),
        Just(Op::Dequeue),
    ]
}

fn strategy_strategy() -> impl Strategy<Value = EnqueueStrategy> {
    prop_oneof![
        Just(EnqueueStrategy::Lagging),
        Just(EnqueueStrategy::Scanning),
        Just(EnqueueStrategy::Auto),
    ]
}

proptest! {
    #[test]
    fn prop_fifo(values in prop::collection::vec(any::<u64>(), 0..200), strategy in strategy_strategy()) {
        let queue = LockFreeQueue::with_config(QueueConfig {
            enqueue_strategy: strategy,
            ..Default::default()
        });
        for &v in &values {
            queue.enqueue(v);
        }

        let mut drained = Vec::with_capacity(values.len());
        while let Ok(v) = queue.dequeue() {
            drained.push(v);
        }
        prop_assert_eq!(drained, values);
    }

    #[test]
    fn prop_matches_model(ops in prop::collection::vec(op_strategy(), 0..300)) {
        let queue = LockFreeQueue::new();
        let mut model = VecDeque::new();
        let mut enqueued = 0u64;
        let mut dequeued = 0u64;

        for op in ops {
            match op {
                Op::EnqueueLagging(v) => {
                    queue.enqueue_lagging(v);
                    model.push_back(v);
                    enqueued += 1;
                }
                Op::EnqueueScanning(v) => {
                    queue.enqueue_scanning(v);
                    model.push_back(v);
                    enqueued += 1;
                }
                Op::Dequeue => {
                    let got = queue.dequeue().ok();
                    let want = model.pop_front();
                    prop_assert_eq!(got, want);
                    if want.is_some() {
                        dequeued += 1;
                    }
                }
            }
        }

        let stats = queue.stats();
        prop_assert_eq!(stats.enqueue_count, enqueued);
        prop_assert_eq!(stats.dequeue_count, dequeued);
        prop_assert_eq!(stats.size, enqueued - dequeued);
        prop_assert_eq!(queue.is_empty(), model.is_empty());
    }
}
