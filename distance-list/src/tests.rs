use crate::*;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 11
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        let span = (end_exclusive - start) as u64;
        start + (self.next_u64() % span) as usize
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

fn identity(options: RotationTable) -> DistanceList<u32> {
    DistanceList::with_options(
        DistanceListOptions::new(|v: &u32| f64::from(*v)).with_rotation_table(options),
    )
}

fn counting(table: RotationTable) -> (DistanceList<u32>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let list = DistanceList::with_options(
        DistanceListOptions::new(move |v: &u32| {
            seen.fetch_add(1, Ordering::SeqCst);
            f64::from(*v)
        })
        .with_rotation_table(table),
    );
    (list, calls)
}

fn items(list: &DistanceList<u32>) -> Vec<u32> {
    list.iter().copied().collect()
}

/// Checks every query against a plain `Vec` holding the same items.
fn assert_matches_model(list: &DistanceList<u32>, model: &[u32]) {
    list.validate().unwrap();
    assert_eq!(list.size(), model.len());
    assert_eq!(items(list), model);

    let mut outer = 0.0;
    for (i, &v) in model.iter().enumerate() {
        let info = list.get_by_index(i).unwrap();
        assert_eq!(info.index, i);
        assert_eq!(*info.item, v);
        assert_eq!(info.length, f64::from(v));
        assert_eq!(info.outer_distance, outer);
        assert_eq!(info.inner_distance, 0.0);
        outer += f64::from(v);
    }
    assert_eq!(list.total_length(), outer);
    assert!(list.get_by_index(model.len()).is_none());

    let mut start = 0u32;
    for (i, &v) in model.iter().enumerate() {
        for d in start..start + v {
            let info = list.get_by_distance(f64::from(d)).unwrap();
            assert_eq!(info.index, i, "distance {d}");
            assert_eq!(info.outer_distance, f64::from(start));
            assert_eq!(info.inner_distance, f64::from(d - start));
        }
        start += v;
    }
    assert!(list.get_by_distance(f64::from(start)).is_none());
}

#[test]
fn prepend_scenario_orders_and_resolves_distance() {
    let mut list = DistanceList::new(|v: &u32| f64::from(*v));
    assert!(list.insert(0, 5));
    assert!(list.insert(0, 10));

    assert_eq!(items(&list), [10, 5]);
    assert_eq!(list.size(), 2);
    assert_eq!(list.total_length(), 15.0);

    let info = list.get_by_distance(10.0).unwrap();
    assert_eq!(*info.item, 5);
    assert_eq!(info.index, 1);
    assert_eq!(info.outer_distance, 10.0);
    assert_eq!(info.inner_distance, 0.0);
    assert_eq!(info.end(), 15.0);
    list.validate().unwrap();
}

#[test]
fn string_lengths_sum_to_total() {
    let mut list = DistanceList::new(|s: &String| s.len() as f64);
    for s in ["Hello", " ", "World", "!"] {
        list.append(String::from(s));
    }
    assert_eq!(list.size(), 4);
    assert_eq!(list.total_length(), 12.0);

    let info = list.get_by_distance(7.5).unwrap();
    assert_eq!(info.item, "World");
    assert_eq!(info.outer_distance, 6.0);
    assert_eq!(info.inner_distance, 1.5);
    assert_eq!(info.distance(), 7.5);
}

#[test]
fn append_round_trips_in_order() {
    for table in [RotationTable::Verbatim, RotationTable::Avl] {
        let mut list = identity(table);
        let values: Vec<u32> = (0..200).map(|i| (i * 7919) % 13 + 1).collect();
        for &v in &values {
            list.append(v);
        }
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(list.get_by_index(i).map(|info| *info.item), Some(v));
        }
        assert_matches_model(&list, &values);
    }
}

#[test]
fn insert_out_of_range_changes_nothing() {
    let (mut list, calls) = counting(RotationTable::Verbatim);
    list.extend([3, 1, 4, 1, 5]);
    let total = list.total_length();
    let stats = list.stats();
    let measured = calls.load(Ordering::SeqCst);

    assert!(!list.insert(6, 9));
    assert!(!list.insert(usize::MAX, 9));

    assert_eq!(list.stats(), stats);
    assert_eq!(items(&list), [3, 1, 4, 1, 5]);
    assert_eq!(list.total_length(), total);
    assert_eq!(calls.load(Ordering::SeqCst), measured);
}

#[test]
fn insert_at_end_is_append() {
    let mut list = identity(RotationTable::Avl);
    assert!(list.insert(0, 1));
    assert!(list.insert(1, 2));
    assert!(list.insert(2, 3));
    assert!(list.insert(1, 9));
    assert_matches_model(&list, &[1, 9, 2, 3]);
}

#[test]
fn lengths_are_measured_lazily_and_memoized() {
    let (mut list, calls) = counting(RotationTable::Avl);
    list.extend(1..=16);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(list.stats().measured, 0);

    assert_eq!(list.total_length(), 136.0);
    assert_eq!(calls.load(Ordering::SeqCst), 16);
    assert_eq!(list.stats().measured, 16);
    assert_eq!(list.stats().aggregated, 16);

    list.total_length();
    list.get_by_distance(100.0).unwrap();
    list.get_by_index(7).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 16);
}

#[test]
fn invalidate_length_forces_one_remeasure() {
    let (mut list, calls) = counting(RotationTable::Avl);
    list.extend(1..=32);
    list.total_length();
    calls.store(0, Ordering::SeqCst);

    assert!(list.invalidate_length(20));
    assert_eq!(list.stats().measured, 31);
    assert!(list.stats().aggregated < 32);

    assert_eq!(list.total_length(), 528.0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(list.get_by_index(20).unwrap().length, 21.0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(!list.invalidate_length(32));
}

#[test]
fn invalidate_picks_up_external_length_change() {
    let lengths = Arc::new(Mutex::new(alloc::vec![10.0, 20.0, 30.0]));
    let table = Arc::clone(&lengths);
    let mut list = DistanceList::new(move |slot: &usize| table.lock().unwrap()[*slot]);
    list.extend(0..3);
    assert_eq!(list.total_length(), 60.0);

    lengths.lock().unwrap()[0] = 15.0;
    // Still cached.
    assert_eq!(list.total_length(), 60.0);
    assert_eq!(list.get_by_index(2).unwrap().outer_distance, 30.0);

    assert!(list.invalidate_length(0));
    assert_eq!(list.total_length(), 65.0);
    assert_eq!(list.get_by_index(2).unwrap().outer_distance, 35.0);

    lengths.lock().unwrap()[2] = 25.0;
    assert_eq!(list.remeasure(2), Some(-5.0));
    assert_eq!(list.total_length(), 60.0);
    assert_eq!(list.remeasure(3), None);
    list.validate().unwrap();
}

#[test]
fn remeasure_of_unmeasured_item_reports_full_length() {
    let mut list = identity(RotationTable::Verbatim);
    list.extend([4, 6]);
    assert_eq!(list.remeasure(1), Some(6.0));
    assert_eq!(list.remeasure(1), Some(0.0));
}

#[test]
fn update_mutates_in_place_and_invalidates() {
    let mut list = DistanceList::new(|s: &String| s.len() as f64);
    list.extend([String::from("ab"), String::from("cde")]);
    assert_eq!(list.total_length(), 5.0);

    assert!(list.update(0, |s| s.push_str("!!")));
    assert_eq!(list.get(0).map(String::as_str), Some("ab!!"));
    assert_eq!(list.total_length(), 7.0);
    assert_eq!(list.get_by_index(1).unwrap().outer_distance, 4.0);
    assert!(!list.update(2, |s| s.clear()));
}

#[test]
fn zero_length_items_are_cached_and_never_hit() {
    let (mut list, calls) = counting(RotationTable::Avl);
    list.extend([3, 0, 2, 0]);
    assert_eq!(list.total_length(), 5.0);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(list.total_length(), 5.0);
    assert_eq!(calls.load(Ordering::SeqCst), 4);

    let info = list.get_by_distance(3.0).unwrap();
    assert_eq!(info.index, 2);
    assert_eq!(list.get_by_index(1).unwrap().length, 0.0);
    assert_eq!(list.get_by_index(3).unwrap().outer_distance, 5.0);
    assert!(list.get_by_distance(5.0).is_none());
}

#[test]
fn invalid_distances_miss() {
    let mut list = identity(RotationTable::Verbatim);
    assert!(list.get_by_distance(0.0).is_none());
    list.extend([2, 3]);
    assert!(list.get_by_distance(-1.0).is_none());
    assert!(list.get_by_distance(-0.5).is_none());
    assert!(list.get_by_distance(f64::NAN).is_none());
    assert!(list.get_by_distance(f64::INFINITY).is_none());
    assert!(list.get_by_distance(5.0).is_none());
    assert!(list.delete_by_distance(f64::NAN).is_none());
    assert_eq!(list.get_by_distance(4.999).map(|info| info.index), Some(1));
}

#[test]
fn offsets_just_below_total_hit_last_item_with_fractional_lengths() {
    for seed in 0..200u64 {
        let mut rng = Lcg::new(seed);
        let mut list = DistanceList::with_options(
            DistanceListOptions::new(|v: &u32| f64::from(*v) / 7.0)
                .with_rotation_table(RotationTable::Avl),
        );
        let n = rng.gen_range_usize(1, 40);
        for _ in 0..n {
            let index = rng.gen_range_usize(0, list.size() + 1);
            assert!(list.insert(index, rng.gen_range_usize(1, 200) as u32));
        }
        // Trailing zero-length items are never hit.
        list.extend([0, 0]);
        let last = n - 1;

        let total = list.total_length();
        for ulps in 1..=50u64 {
            let distance = f64::from_bits(total.to_bits() - ulps);
            let info = list
                .get_by_distance(distance)
                .unwrap_or_else(|| panic!("seed {seed}: miss at {distance} (total {total})"));
            assert_eq!(info.index, last, "seed {seed}");
            assert!(info.inner_distance >= 0.0 && info.inner_distance < info.length);
        }

        let just_below = f64::from_bits(total.to_bits() - 1);
        let expected = *list.get(last).unwrap();
        assert_eq!(list.delete_by_distance(just_below), Some(expected), "seed {seed}");
        list.validate().unwrap();
    }
}

#[test]
fn invalid_measurements_count_as_zero() {
    let mut list = DistanceList::new(|v: &f64| *v);
    list.extend([1.0, -4.0, f64::NAN, f64::INFINITY, 2.0]);
    assert_eq!(list.total_length(), 3.0);
    assert_eq!(list.get_by_distance(1.0).map(|info| info.index), Some(4));
    list.validate().unwrap();
}

#[test]
fn delete_by_index_removes_and_shifts() {
    for table in [RotationTable::Verbatim, RotationTable::Avl] {
        let mut list = identity(table);
        let mut model: Vec<u32> = (1..=20).collect();
        list.extend(model.iter().copied());
        list.total_length();

        for index in [0, 9, 5, 16, 3] {
            assert_eq!(list.delete_by_index(index), Some(model.remove(index)));
            assert_matches_model(&list, &model);
        }
        assert_eq!(list.delete_by_index(model.len()), None);
    }
}

#[test]
fn delete_by_distance_removes_covering_item() {
    let mut list = identity(RotationTable::Avl);
    list.extend([4, 1, 3]);
    assert_eq!(list.delete_by_distance(4.5), Some(1));
    assert_matches_model(&list, &[4, 3]);
    assert_eq!(list.delete_by_distance(7.0), None);
    assert_eq!(list.delete_by_distance(0.0), Some(4));
    assert_eq!(list.delete_by_distance(2.0), Some(3));
    assert!(list.is_empty());
    assert_eq!(list.total_length(), 0.0);
    list.validate().unwrap();
}

#[test]
fn freed_slots_are_reused() {
    let mut list = identity(RotationTable::Avl);
    list.extend(1..=8);
    for _ in 0..8 {
        list.delete_by_index(0).unwrap();
    }
    let stats = list.stats();
    assert_eq!(stats.size, 0);
    assert_eq!(stats.height, 0);
    assert_eq!(stats.slots, 8);
    assert_eq!(stats.free_slots, 8);

    list.extend(1..=3);
    let stats = list.stats();
    assert_eq!(stats.slots, 8);
    assert_eq!(stats.free_slots, 5);
    assert_matches_model(&list, &[1, 2, 3]);
}

#[test]
fn clear_empties_the_list() {
    let mut list = identity(RotationTable::Verbatim);
    list.extend(1..=5);
    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.size(), 0);
    assert_eq!(list.iter().len(), 0);
    assert_eq!(list.stats(), TreeStats::default());
    assert!(list.insert(0, 7));
    assert_matches_model(&list, &[7]);
}

#[test]
fn avl_table_bounds_height() {
    let mut list = identity(RotationTable::Avl);
    list.extend(1..=1000);
    // An AVL tree of height 15 needs at least 1596 nodes.
    assert!(list.height() <= 14, "height {}", list.height());

    let mut list = identity(RotationTable::Avl);
    for i in 0..1000 {
        list.insert(0, i);
    }
    assert!(list.height() <= 14, "height {}", list.height());
    list.validate().unwrap();
}

#[test]
fn avl_table_keeps_large_append_only_lists_shallow() {
    let mut list = identity(RotationTable::Avl);
    list.extend(core::iter::repeat_n(2, 20_000));
    // An AVL tree of height 21 needs at least 28656 nodes.
    assert!(list.height() <= 20, "height {}", list.height());
    assert_eq!(list.total_length(), 40_000.0);
    let info = list.get_by_distance(39_999.0).unwrap();
    assert_eq!((info.index, info.inner_distance), (19_999, 1.0));
    assert_eq!(list.get_by_index(10_000).unwrap().outer_distance, 20_000.0);
}

#[test]
fn verbatim_table_degrades_on_append_only_workloads() {
    let mut list = identity(RotationTable::Verbatim);
    list.extend(1..=5);
    assert_eq!(list.height(), 5);
    assert_matches_model(&list, &[1, 2, 3, 4, 5]);
}

#[test]
fn iter_is_exact_size_and_ordered() {
    let mut list = identity(RotationTable::Avl);
    list.extend(0..10);
    list.insert(5, 100);
    let mut iter = list.iter();
    assert_eq!(iter.len(), 11);
    iter.next();
    assert_eq!(iter.len(), 10);
    let collected: Vec<u32> = (&list).into_iter().copied().collect();
    assert_eq!(collected, [0, 1, 2, 3, 4, 100, 5, 6, 7, 8, 9]);
}

#[test]
fn randomized_operations_match_vec_model() {
    for (seed, table) in [
        (1, RotationTable::Verbatim),
        (2, RotationTable::Avl),
        (3, RotationTable::Verbatim),
        (4, RotationTable::Avl),
    ] {
        let mut rng = Lcg::new(seed);
        let mut list = identity(table);
        let mut model: Vec<u32> = Vec::new();

        for step in 0..400 {
            match rng.gen_range_usize(0, 10) {
                0..=4 => {
                    let index = rng.gen_range_usize(0, model.len() + 2);
                    let value = rng.gen_range_usize(0, 6) as u32;
                    let ok = list.insert(index, value);
                    assert_eq!(ok, index <= model.len(), "step {step}");
                    if ok {
                        model.insert(index, value);
                    }
                }
                5..=7 if !model.is_empty() => {
                    if rng.gen_bool() {
                        let index = rng.gen_range_usize(0, model.len());
                        assert_eq!(list.delete_by_index(index), Some(model.remove(index)));
                    } else if let Some(index) = list
                        .get_by_distance(rng.gen_range_usize(0, 40) as f64)
                        .map(|info| info.index)
                    {
                        let start = list.get_by_index(index).unwrap().outer_distance;
                        assert_eq!(list.delete_by_distance(start), Some(model.remove(index)));
                    }
                }
                _ if !model.is_empty() => {
                    let index = rng.gen_range_usize(0, model.len());
                    let value = rng.gen_range_usize(0, 6) as u32;
                    assert!(list.update(index, |v| *v = value));
                    model[index] = value;
                }
                _ => {}
            }
            list.validate().unwrap();
            if step % 20 == 0 {
                assert_matches_model(&list, &model);
            }
        }
        assert_matches_model(&list, &model);
    }
}
