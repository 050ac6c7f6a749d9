use distance_list::DistanceList;
use distance_list_adapter::Viewport;

fn main() {
    // Example: preserve visual scroll position across "prepend" (chat/timeline load older messages).
    //
    // The adapter flow is typically:
    // 1) capture an anchor (index + offset_in_item) before data changes
    // 2) apply data changes
    // 3) apply the anchor to adjust scroll_offset so the same item stays in the same place
    let mut list = DistanceList::new(|message: &(u64, f64)| message.1);
    list.extend((1000u64..1100).map(|id| (id, 24.0)));

    let mut v = Viewport::new(list);
    v.set_extent(240.0);
    v.set_scroll_offset(1_210.0);

    let Some(anchor) = v.capture_first_visible_anchor() else {
        return;
    };
    println!("before prepend: off={} anchor={anchor:?}", v.scroll_offset());

    // Load 10 older messages behind the viewport's back; old items shift by +10 ranks.
    for id in (2000u64..2010).rev() {
        v.list_mut().insert(0, (id, 48.0));
    }

    let ok = v.apply_anchor(&anchor, |i| Some(i + 10));
    println!("after prepend: ok={ok} off={}", v.scroll_offset());

    // `Viewport::insert` does the same bookkeeping itself.
    v.insert(0, (3000, 48.0));
    println!("after anchored insert: off={}", v.scroll_offset());
}
