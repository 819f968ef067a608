use listwindow::{Alignment, EngineConfig, HeightPolicy};
use listwindow_adapter::{Controller, Easing};

fn main() {
    let mut controller = Controller::new(EngineConfig::new(50_000, HeightPolicy::Fixed(28)));
    controller.on_viewport(0, 560, 0);

    let target =
        controller.scroll_to_animated(30_000, Alignment::Center, 0, 240, Easing::EaseInOutCubic);
    println!("animating toward {}", target.offset);

    let mut now_ms = 0;
    while controller.is_animating() {
        now_ms += 16;
        if let Some(offset) = controller.tick(now_ms) {
            println!("t={now_ms}ms offset={offset}");
        }
    }
    println!("settled at {}", controller.engine().scroll_offset());
}
