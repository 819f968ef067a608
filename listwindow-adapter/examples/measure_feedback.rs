use listwindow::{EngineConfig, HeightPolicy};
use listwindow_adapter::{Controller, MeasureQueue};

fn main() {
    let mut controller = Controller::new(EngineConfig::new(5_000, HeightPolicy::Estimated(36)));
    controller.on_viewport(0, 360, 0);

    let queue = MeasureQueue::new();
    controller.render_pass(&queue, |slot| {
        // A real host paints the row here and reads back its rendered size.
        let painted = 30 + (slot.index() % 5) as u32 * 6;
        slot.measure(painted);
    });
    println!("queued {} measurements", queue.len());

    if let Some(view) = controller.flush_measurements(&queue) {
        println!("corrected total={}", view.total_height);
    }
}
