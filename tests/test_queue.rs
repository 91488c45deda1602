use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use warden::server::queue::{BoundedQueue, Job};

#[test]
fn test_queue_fifo_order() {
    let queue = BoundedQueue::new(8);
    for i in 0..8 {
        queue.push(i);
    }

    let popped: Vec<i32> = (0..8).map(|_| queue.pop()).collect();
    assert_eq!(popped, (0..8).collect::<Vec<_>>());
    assert!(queue.is_empty());
}

#[test]
fn test_queue_len_and_capacity() {
    let queue = BoundedQueue::new(3);
    assert_eq!(queue.capacity(), 3);
    assert_eq!(queue.len(), 0);

    queue.push("a");
    queue.push("b");
    assert_eq!(queue.len(), 2);

    queue.pop();
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_queue_zero_capacity_is_clamped() {
    let queue = BoundedQueue::new(0);
    assert_eq!(queue.capacity(), 1);

    queue.push(7);
    assert_eq!(queue.pop(), 7);
}

#[test]
fn test_huge_capacity_does_not_allocate_up_front() {
    let queue = BoundedQueue::<(u64, u64, u64)>::new(usize::MAX / 2);
    assert_eq!(queue.capacity(), usize::MAX / 2);

    queue.push((1, 2, 3));
    assert_eq!(queue.pop(), (1, 2, 3));
    assert!(queue.is_empty());
}

#[test]
fn test_push_blocks_when_full_until_pop() {
    for capacity in [1, 2, 5] {
        let queue = Arc::new(BoundedQueue::new(capacity));
        let (done_tx, done_rx) = mpsc::channel();

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..=capacity {
                    queue.push(i);
                    done_tx.send(i).unwrap();
                }
            })
        };

        // The first `capacity` pushes complete immediately
        for expected in 0..capacity {
            assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)).unwrap(), expected);
        }

        // The extra push stays blocked while nobody pops
        assert!(done_rx.recv_timeout(Duration::from_millis(200)).is_err());
        assert_eq!(queue.len(), capacity);

        assert_eq!(queue.pop(), 0);
        assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)).unwrap(), capacity);
        producer.join().unwrap();

        let rest: Vec<usize> = (0..capacity).map(|_| queue.pop()).collect();
        assert_eq!(rest, (1..=capacity).collect::<Vec<_>>());
    }
}

#[test]
fn test_pop_blocks_when_empty_until_push() {
    let queue = Arc::new(BoundedQueue::new(4));
    let (tx, rx) = mpsc::channel();

    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            tx.send(queue.pop()).unwrap();
        })
    };

    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());

    queue.push(42);
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 42);
    consumer.join().unwrap();
}

#[test]
fn test_concurrent_producers_and_consumers_lose_nothing() {
    let queue = Arc::new(BoundedQueue::new(4));
    let producers: Vec<_> = (0..4)
        .map(|p| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..250 {
                    queue.push(Job::Work(p * 1000 + i));
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..3)
        .map(|_| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let mut seen = Vec::new();
                loop {
                    match queue.pop() {
                        Job::Work(n) => seen.push(n),
                        Job::Shutdown => return seen,
                    }
                }
            })
        })
        .collect();

    for producer in producers {
        producer.join().unwrap();
    }
    for _ in 0..3 {
        queue.push(Job::Shutdown);
    }

    let mut all: Vec<i32> = consumers
        .into_iter()
        .flat_map(|c| c.join().unwrap())
        .collect();
    all.sort_unstable();

    let mut expected: Vec<i32> = (0..4).flat_map(|p| (0..250).map(move |i| p * 1000 + i)).collect();
    expected.sort_unstable();
    assert_eq!(all, expected);
}
