// Dynamic measurement: estimates converge on real heights as rows paint.
use listwindow::{Engine, EngineConfig, HeightPolicy};

fn main() {
    let mut engine = Engine::new(EngineConfig::new(10_000, HeightPolicy::Estimated(40)));
    engine.on_viewport_change(0, 300, 0);
    println!("estimated total={}", engine.total_height());

    // The renderer reports observed heights; one batch, one recompute.
    let view = engine.apply_measurements([(0, 64), (1, 32), (2, 48)]);
    println!("corrected total={}", view.total_height);
    for item in view.items.iter().take(4) {
        println!("row {} at offset {}", item.index, item.offset_top);
    }

    // A row above the viewport shifts the offset instead of the content.
    engine.on_viewport_change(2_000, 300, 10);
    let applied = engine.on_item_resized(3, 96);
    println!(
        "offset shifted by {applied} to {}",
        engine.scroll_offset()
    );
}
