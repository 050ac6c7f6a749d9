use distance_list::{DistanceList, DistanceListOptions, RotationTable};
use distance_list_adapter::{Align, Viewport};

fn main() {
    // Example: a render loop only touches the items inside the viewport (plus overscan).
    // A million appends need the AVL table; the default one would build a right spine.
    let options = DistanceListOptions::new(|row: &u32| if row % 10 == 0 { 40.0 } else { 18.0 })
        .with_rotation_table(RotationTable::Avl)
        .with_capacity(1_000_000);
    let mut list = DistanceList::with_options(options);
    list.extend(0..1_000_000u32);

    let mut v = Viewport::new(list).with_overscan(2);
    v.set_extent(600.0);
    v.set_scroll_offset(123_456.0);

    let mut items = Vec::new();
    v.collect_virtual_items(&mut items);
    println!("total={}", v.list().total_length());
    println!("visible={:?} virtual={:?}", v.visible_range(), v.virtual_range());
    if let Some(first) = items.first() {
        println!(
            "first rendered row={} at {}",
            first.item, first.outer_distance
        );
    }

    let offset = v.scroll_to_index(999_999, Align::End);
    println!("after scroll_to_index: offset={offset:?}");
}
