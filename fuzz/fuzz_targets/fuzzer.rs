#![no_main]

use libfuzzer_sys::fuzz_target;
use ring_queue::*;
use std::thread;

fuzz_target!(|input: (Box<[u32]>, u8, u8, u8)| {
    let mut data = input.0;
    let capacity = input.1 as usize;
    let producers = input.2 as usize % 8;
    let consumers = input.3 as usize % 8;

    if capacity == 0 || producers == 0 || consumers == 0 {
        return;
    }

    let queue = BlockingQueue::new(capacity);
    let chunk_size = (data.len() + producers - 1) / producers;

    let mut received = thread::scope(|s| {
        if chunk_size > 0 {
            for (p, chunk) in data.chunks(chunk_size).enumerate() {
                let queue = &queue;
                s.spawn(move || {
                    for &item in chunk {
                        if p % 2 == 0 {
                            queue.push_back(item);
                        } else {
                            queue.push_front(item);
                        }
                    }
                });
            }
        }

        let handles: Vec<_> = (0..consumers)
            .map(|c| {
                let queue = &queue;
                let quota = data.len() / consumers + usize::from(c < data.len() % consumers);
                s.spawn(move || {
                    (0..quota)
                        .map(|i| {
                            let item = if (c + i) % 2 == 0 {
                                queue.pop_front()
                            } else {
                                queue.pop_back()
                            };

                            assert!(
                                queue.len() <= capacity,
                                "the queue never holds more items than its capacity"
                            );

                            item
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(
        queue.try_pop_front(),
        Err(TryPopError::Empty),
        "every item pushed is popped"
    );

    data.sort();
    received.sort();
    assert_eq!(received, &*data, "every item is popped exactly once");
});
