//! Provider cache: first writer wins, every instance dropped exactly once

use jwx_key::CryptographicStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

struct Tracked {
    id: usize,
    drops: Arc<AtomicUsize>,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

fn tracked(id: usize, drops: &Arc<AtomicUsize>) -> Arc<Tracked> {
    Arc::new(Tracked {
        id,
        drops: Arc::clone(drops),
    })
}

#[test]
fn test_first_writer_wins() {
    let drops = Arc::new(AtomicUsize::new(0));
    let store = CryptographicStore::new();

    assert!(store.try_add(7, tracked(1, &drops)));
    assert!(!store.try_add(7, tracked(2, &drops)));
    assert_eq!(drops.load(Ordering::SeqCst), 1, "loser dropped");
    assert_eq!(store.get(7).expect("present").id, 1);
    assert!(store.get(8).is_none());
    assert_eq!(store.count(), 1);
}

#[test]
fn test_growth_through_every_node_shape() {
    let drops = Arc::new(AtomicUsize::new(0));
    let store = CryptographicStore::new();

    for key in 0..40u32 {
        assert!(store.try_add(key * 3, tracked(key as usize, &drops)));
        assert_eq!(store.count(), key as usize + 1);
        for earlier in 0..=key {
            let found = store.get(earlier * 3).expect("earlier entry survives growth");
            assert_eq!(found.id, earlier as usize);
        }
    }
    assert!(store.get(1).is_none());
    assert_eq!(drops.load(Ordering::SeqCst), 0);

    store.clear();
    assert_eq!(store.count(), 0);
    assert_eq!(drops.load(Ordering::SeqCst), 40);
}

#[test]
fn test_get_or_insert_with_creates_once() {
    let drops = Arc::new(AtomicUsize::new(0));
    let store = CryptographicStore::new();
    let mut calls = 0;

    let first = store
        .get_or_insert_with::<(), _>(1, || {
            calls += 1;
            Ok(tracked(10, &drops))
        })
        .expect("created");
    let second = store
        .get_or_insert_with::<(), _>(1, || {
            calls += 1;
            Ok(tracked(11, &drops))
        })
        .expect("cached");

    assert_eq!(calls, 1);
    assert!(Arc::ptr_eq(&first, &second));

    let err = store.get_or_insert_with(2, || Err::<Arc<Tracked>, _>("factory failed"));
    assert_eq!(err.err(), Some("factory failed"));
    assert_eq!(store.count(), 1);
}

#[test]
fn test_concurrent_inserts_drop_losers_exactly_once() {
    const THREADS: usize = 16;
    const KEYS: u32 = 24;

    let drops = Arc::new(AtomicUsize::new(0));
    let store = CryptographicStore::new();
    let barrier = Barrier::new(THREADS);
    let winners = AtomicUsize::new(0);

    std::thread::scope(|scope| {
        for thread in 0..THREADS {
            let (store, barrier, winners, drops) = (&store, &barrier, &winners, &drops);
            scope.spawn(move || {
                barrier.wait();
                for key in 0..KEYS {
                    if store.try_add(key, tracked(thread, drops)) {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                }
            });
        }
    });

    assert_eq!(winners.load(Ordering::SeqCst), KEYS as usize);
    assert_eq!(store.count(), KEYS as usize);
    let losers = THREADS * KEYS as usize - KEYS as usize;
    assert_eq!(drops.load(Ordering::SeqCst), losers);

    drop(store);
    assert_eq!(drops.load(Ordering::SeqCst), THREADS * KEYS as usize);
}

#[test]
fn test_unsized_values() {
    let store: CryptographicStore<dyn Fn(u32) -> u32 + Send + Sync> = CryptographicStore::new();
    assert!(store.try_add(1, Arc::new(|x: u32| x + 1)));
    assert!(store.try_add(2, Arc::new(|x: u32| x * 2)));
    let double = store.get(2).expect("present");
    assert_eq!(double(21), 42);
}
