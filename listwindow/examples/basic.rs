use listwindow::{Alignment, Behavior, Engine, EngineConfig, HeightPolicy};

fn main() {
    let mut engine = Engine::new(
        EngineConfig::new(1_000_000, HeightPolicy::Fixed(24)).with_overscan(8),
    );

    let view = engine.on_viewport_change(123_456, 600, 0);
    println!("total_height={}", view.total_height);
    println!("window={:?}", view.range);
    println!("first_row={:?}", view.items.first());

    let target = engine.scroll_to(999_999, Alignment::End, Behavior::Instant);
    println!("jumped to offset={}", target.offset);
    println!("metrics={:?}", engine.metrics());
}
