/*!
 * FIFO and empty-queue behavior through the public API
 */

use nlqueue::{EnqueueStrategy, LockFreeQueue, QueueConfig, QueueError, QueueStats};
use pretty_assertions::assert_eq;

fn queue_with(strategy: EnqueueStrategy) -> LockFreeQueue {
    LockFreeQueue::with_config(QueueConfig {
        enqueue_strategy: strategy,
        ..Default::default()
    })
}

#[test]
fn test_fifo_both_strategies() {
    for strategy in [EnqueueStrategy::Lagging, EnqueueStrategy::Scanning] {
        let queue = queue_with(strategy);
        let values: Vec<u64> = (100..200).collect();

        for &v in &values {
            queue.enqueue(v);
        }
        let drained: Vec<u64> = std::iter::from_fn(|| queue.dequeue().ok()).collect();

        assert_eq!(drained, values, "strategy {:?}", strategy);
    }
}

#[test]
fn test_fresh_queue_is_empty() {
    let queue = LockFreeQueue::default();

    assert!(queue.is_empty());
    assert_eq!(queue.dequeue(), Err(QueueError::Empty));
    assert_eq!(queue.stats(), QueueStats::default());
}

#[test]
fn test_drained_queue_reports_empty() {
    let queue = LockFreeQueue::new();
    queue.enqueue(1);
    queue.enqueue(2);
    queue.dequeue().unwrap();
    queue.dequeue().unwrap();

    let before = queue.stats();
    for _ in 0..10 {
        assert!(queue.dequeue().unwrap_err().is_empty());
    }
    assert_eq!(queue.stats(), before);
    assert_eq!(
        before,
        QueueStats {
            size: 0,
            enqueue_count: 2,
            dequeue_count: 2,
        }
    );
}

#[test]
fn test_counters_track_history() {
    let queue = LockFreeQueue::new();
    for i in 0..10 {
        queue.enqueue(i);
    }
    for _ in 0..4 {
        queue.dequeue().unwrap();
    }

    assert_eq!(queue.size(), 6);
    assert_eq!(queue.enqueue_count(), 10);
    assert_eq!(queue.dequeue_count(), 4);
    assert!(!queue.is_empty());
}

#[test]
fn test_snapshot_and_report() {
    let mut queue = LockFreeQueue::new();
    queue.enqueue(3);
    queue.enqueue(1);
    queue.enqueue(2);

    assert_eq!(queue.snapshot(), vec![3, 1, 2]);
    assert_eq!(
        queue.report(),
        "Non-locking Queue information:\nsize: 3\nenqueue count: 3\ndequeue count: 0"
    );
}

#[test]
fn test_queue_keeps_config() {
    let config = QueueConfig::from_lookup(|_| None).unwrap();
    let queue = LockFreeQueue::with_config(config);
    assert_eq!(queue.strategy(), EnqueueStrategy::Scanning);
    assert_eq!(queue.config(), &config);
}
