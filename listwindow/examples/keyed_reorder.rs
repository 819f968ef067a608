// Keyed measurement cache: heights follow stable item identities across a
// reorder, so nothing has to be re-measured.
use std::sync::{Arc, Mutex};

use listwindow::{Engine, EngineConfig, HeightPolicy};

fn main() {
    let keys = Arc::new(Mutex::new(vec![100u64, 101, 102, 103]));
    let lookup = Arc::clone(&keys);
    let mut engine = Engine::new(EngineConfig::new_with_key(
        4,
        HeightPolicy::Estimated(30),
        move |i| lookup.lock().unwrap()[i],
    ));
    engine.on_viewport_change(0, 120, 0);

    engine.on_item_measured(1, 64);
    println!("row 1 height={:?}", engine.item_height(1));

    keys.lock().unwrap().reverse();
    engine.sync_keys();
    println!(
        "after reverse, row 2 height={:?} (measurement followed key 101)",
        engine.item_height(2)
    );
}
