// Example: minimal usage of rank and distance queries.
use distance_list::DistanceList;

fn main() {
    let mut list = DistanceList::new(|line: &String| line.len() as f64 + 1.0);
    for line in ["fn main() {", "    println!(\"hi\");", "}", ""] {
        list.append(line.to_string());
    }

    println!("size={} total_length={}", list.size(), list.total_length());

    if let Some(info) = list.get_by_index(1) {
        println!(
            "line 1 starts at {} and is {} long",
            info.outer_distance, info.length
        );
    }

    if let Some(info) = list.get_by_distance(20.0) {
        println!(
            "offset 20 is line {} ({:?}), column {}",
            info.index, info.item, info.inner_distance
        );
    }

    list.insert(0, "// header".to_string());
    println!("after insert: {:?}", list.iter().collect::<Vec<_>>());
}
