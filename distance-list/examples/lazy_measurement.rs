// Example: lengths are measured on demand and re-measured only after invalidation.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use distance_list::{DistanceList, DistanceListOptions, RotationTable};

fn main() {
    // Row heights live outside the list (e.g. laid-out text); the list only caches them.
    let heights = Arc::new(Mutex::new(vec![20.0f64; 10_000]));
    let calls = Arc::new(AtomicUsize::new(0));

    let measured = Arc::clone(&heights);
    let counter = Arc::clone(&calls);
    let options = DistanceListOptions::new(move |row: &usize| {
        counter.fetch_add(1, Ordering::Relaxed);
        measured.lock().map(|h| h[*row]).unwrap_or(0.0)
    })
    .with_rotation_table(RotationTable::Avl)
    .with_capacity(10_000);

    let mut list = DistanceList::with_options(options);
    list.extend(0..10_000usize);
    println!("measure calls after building: {}", calls.load(Ordering::Relaxed));

    println!("total={}", list.total_length());
    println!("measure calls after total: {}", calls.load(Ordering::Relaxed));

    let _ = list.get_by_distance(100_000.0);
    println!("measure calls after a warm query: {}", calls.load(Ordering::Relaxed));

    if let Ok(mut h) = heights.lock() {
        h[42] = 64.0;
    }
    let delta = list.remeasure(42);
    println!(
        "row 42 grew by {delta:?}; total={} calls={}",
        list.total_length(),
        calls.load(Ordering::Relaxed)
    );
    println!("stats={:?}", list.stats());
}
