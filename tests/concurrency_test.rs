use std::sync::Arc;
use std::thread;

use audex::testing::prelude::*;
use audex::{Catalog, Record, SearchMode, SearchOptions};

#[test]
fn concurrent_writers_never_duplicate() {
    let catalog = Arc::new(Catalog::new());
    let threads = 8;
    let per_thread = 50;

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                let mut added = 0;
                for i in 0..per_thread {
                    // Every thread races on the same keys
                    if catalog.add(Record::new(format!("Track {}", i), "Shared Artist", 120)) {
                        added += 1;
                    }
                }
                added
            })
        })
        .collect();

    let total_added: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(total_added, per_thread);
    assert_eq!(catalog.size(), per_thread);
    let violations = check_all_invariants(&catalog.consistency_view(), &default_invariants());
    assert!(violations.is_empty(), "{:?}", violations);
}

#[test]
fn readers_see_consistent_snapshots_during_writes() {
    let catalog = Arc::new(Catalog::new());
    for i in 0..100 {
        catalog.add(Record::new(format!("Base {}", i), "Anchor", 100).with_genre("Rock"));
    }

    let writer = {
        let catalog = Arc::clone(&catalog);
        thread::spawn(move || {
            for i in 0..200 {
                catalog.add(Record::new(format!("Extra {}", i), "Writer", 100));
                if i % 3 == 0 {
                    catalog.remove(&format!("Extra {}", i / 2), "Writer");
                }
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                let options = SearchOptions::new(SearchMode::Exact);
                for _ in 0..200 {
                    // The anchor records are never touched by the writer
                    assert_eq!(catalog.find_by_artist("Anchor").len(), 100);
                    assert_eq!(catalog.search_with("anchor", &options).len(), 100);
                    assert_eq!(catalog.find_by_genre("Rock").len(), 100);

                    let tracks = catalog.get_all_tracks();
                    assert!(tracks.len() >= 100);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    let violations = check_all_invariants(&catalog.consistency_view(), &default_invariants());
    assert!(violations.is_empty(), "{:?}", violations);
}

#[test]
fn snapshots_survive_later_updates() {
    let catalog = Arc::new(Catalog::new());
    catalog.add(Record::new("Imagine", "John Lennon", 183));
    let snapshot = catalog.get_all_tracks();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                for _ in 0..25 {
                    catalog.record_play("Imagine", "John Lennon");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    catalog.clear();

    assert_eq!(snapshot[0].play_count(), 0);
    assert_eq!(snapshot[0].title(), "Imagine");
    assert!(catalog.is_empty());
}
