#![cfg(not(feature = "loom"))]

use bounded_fifo::{BoundedQueue, Error, TypedQueue};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn tag(producer: u64, seq: u64) -> u64 {
    (producer << 32) | seq
}

#[test]
fn test_fifo_order() {
    let queue = TypedQueue::<u32>::new(16).unwrap();

    for i in 0..16 {
        queue.send(&i).unwrap();
    }
    for i in 0..16 {
        assert_eq!(queue.receive(None), Ok(i));
    }
    assert_eq!(queue.len(), Ok(0));
}

#[test]
fn test_round_trip_bytes() {
    let capacity = 7;
    let item_size = 13;
    let queue = BoundedQueue::new(capacity, item_size).unwrap();

    let items: Vec<Vec<u8>> = (0..capacity)
        .map(|i| (0..item_size).map(|j| (i * 31 + j * 7) as u8).collect())
        .collect();
    for item in &items {
        queue.send(item).unwrap();
    }
    assert_eq!(queue.send(&items[0]), Err(Error::Full));

    for item in &items {
        assert_eq!(&*queue.receive(None).unwrap(), &item[..]);
    }
    assert_eq!(queue.len(), Ok(0));
    queue.destroy().unwrap();
}

#[test]
fn test_spsc_threaded() {
    let queue = Arc::new(TypedQueue::<usize>::new(4).unwrap());
    let q_send = queue.clone();

    let producer = thread::spawn(move || {
        for i in 0..1000 {
            q_send.send_timeout(&i, None).unwrap();
        }
    });

    for i in 0..1000 {
        assert_eq!(queue.receive(None), Ok(i));
    }
    producer.join().unwrap();
}

// N producers retrying on Full against one consumer; no wakeup may be missed.
#[test]
fn test_no_missed_wakeups() {
    const PRODUCERS: u64 = 8;
    const SENDS: u64 = 500;

    let queue = Arc::new(TypedQueue::<u64>::new(4).unwrap());
    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let queue = queue.clone();
            thread::spawn(move || {
                for seq in 0..SENDS {
                    loop {
                        match queue.send(&tag(p, seq)) {
                            Ok(()) => break,
                            Err(Error::Full) => thread::yield_now(),
                            Err(e) => panic!("send failed: {e}"),
                        }
                    }
                }
            })
        })
        .collect();

    let mut seen = HashSet::new();
    let mut last_seq = vec![None; PRODUCERS as usize];
    for _ in 0..PRODUCERS * SENDS {
        let item = queue.receive(Some(Duration::from_secs(5))).unwrap();
        assert!(seen.insert(item), "duplicate item {item:#x}");

        // per-producer order must survive interleaving
        let (p, seq) = ((item >> 32) as usize, item & 0xffff_ffff);
        if let Some(prev) = last_seq[p] {
            assert!(seq > prev, "producer {p} reordered: {prev} then {seq}");
        }
        last_seq[p] = Some(seq);
    }

    for handle in producers {
        handle.join().unwrap();
    }
    assert_eq!(seen.len() as u64, PRODUCERS * SENDS);
    assert_eq!(queue.try_receive(), Err(Error::Timeout));
}

// 4 producers x 1000 tagged 8-byte items through a capacity-16 queue, 2 consumers.
#[test]
fn test_mpmc_tagged_items() {
    const PRODUCERS: u64 = 4;
    const SENDS: u64 = 1000;

    let queue = Arc::new(BoundedQueue::new(16, 8).unwrap());
    let done = Arc::new(AtomicUsize::new(0));

    let consumers: Vec<_> = (0..2)
        .map(|_| {
            let queue = queue.clone();
            thread::spawn(move || {
                let mut received = Vec::new();
                let mut out = [0u8; 8];
                loop {
                    match queue.receive_into(&mut out, Some(Duration::from_secs(1))) {
                        Ok(()) => received.push(u64::from_le_bytes(out)),
                        Err(Error::Timeout) | Err(Error::Closed) => break received,
                        Err(e) => panic!("receive failed: {e}"),
                    }
                }
            })
        })
        .collect();

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let queue = queue.clone();
            let done = done.clone();
            thread::spawn(move || {
                for seq in 0..SENDS {
                    let bytes = tag(p, seq).to_le_bytes();
                    loop {
                        match queue.send(&bytes) {
                            Ok(()) => break,
                            Err(Error::Full) => thread::yield_now(),
                            Err(e) => panic!("send failed: {e}"),
                        }
                    }
                }
                done.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    for handle in producers {
        handle.join().unwrap();
    }
    assert_eq!(done.load(Ordering::SeqCst), PRODUCERS as usize);
    queue.close().unwrap();

    let mut all = HashSet::new();
    let mut total = 0;
    for handle in consumers {
        for item in handle.join().unwrap() {
            total += 1;
            assert!(all.insert(item), "duplicate item {item:#x}");
        }
    }

    assert_eq!(total, PRODUCERS * SENDS);
    for p in 0..PRODUCERS {
        for seq in 0..SENDS {
            assert!(all.contains(&tag(p, seq)), "lost item {p}/{seq}");
        }
    }

    let queue = Arc::try_unwrap(queue).unwrap();
    queue.destroy().unwrap();
}

#[test]
fn test_scoped_threads_share_by_reference() {
    let queue = TypedQueue::<u16>::new(2).unwrap();
    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..100u16 {
                queue.send_timeout(&i, None).unwrap();
            }
            queue.close().unwrap();
        });
        let mut expected = 0;
        loop {
            match queue.receive(None) {
                Ok(i) => {
                    assert_eq!(i, expected);
                    expected += 1;
                }
                Err(Error::Closed) => break,
                Err(e) => panic!("receive failed: {e}"),
            }
        }
        assert_eq!(expected, 100);
    });
    queue.destroy().unwrap();
}

#[test]
fn test_create_destroy_many() {
    for _ in 0..10_000 {
        let queue = BoundedQueue::new(64, 64).unwrap();
        queue.destroy().unwrap();
    }
}
