// Prepending older items (chat/timeline style) without the viewport jumping:
// capture an anchor by item identity, rebuild, re-apply.
use std::collections::HashMap;

use listwindow::{Engine, EngineConfig, HeightPolicy};
use listwindow_adapter::{apply_anchor, capture_first_visible_anchor};

fn main() {
    let mut engine = Engine::new(EngineConfig::new_with_key(
        200,
        HeightPolicy::Fixed(22),
        |i| 5_000u64 + i as u64,
    ));
    engine.on_viewport_change(1_100, 220, 0);
    let anchor = capture_first_visible_anchor(&engine).unwrap();
    println!("anchored to key {}", anchor.key);

    // Fifty older rows arrive above the current ones.
    let mut engine = Engine::new(EngineConfig::new_with_key(
        250,
        HeightPolicy::Fixed(22),
        |i| {
            if i < 50 {
                9_000u64 + i as u64
            } else {
                5_000u64 + (i - 50) as u64
            }
        },
    ));
    engine.on_viewport_change(1_100, 220, 0);

    let mut by_key = HashMap::new();
    for i in 0..250 {
        by_key.insert(engine.key_for(i), i);
    }
    apply_anchor(&mut engine, &anchor, |k| by_key.get(k).copied());
    println!("offset after prepend={}", engine.scroll_offset());
}
