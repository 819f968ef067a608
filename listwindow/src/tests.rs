use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
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
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }
}

#[derive(Default)]
struct RecordingSink(Mutex<Vec<EngineError>>);

impl RecordingSink {
    fn take(&self) -> Vec<EngineError> {
        core::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl DiagnosticsSink for RecordingSink {
    fn report(&self, error: &EngineError) {
        self.0.lock().unwrap().push(*error);
    }
}

fn expected_total(heights: &[u32]) -> u64 {
    heights.iter().map(|&h| h as u64).sum()
}

fn expected_offset_of(heights: &[u32], index: usize) -> u64 {
    heights[..index].iter().map(|&h| h as u64).sum()
}

// Mirror of OffsetIndex::index_at_offset: the number of whole rows fitting
// at or before `offset`, clamped to the last row.
fn expected_index_at(heights: &[u32], offset: u64) -> usize {
    let mut consumed = 0usize;
    let mut prefix = 0u64;
    for &h in heights {
        if prefix + h as u64 <= offset {
            prefix += h as u64;
            consumed += 1;
        } else {
            break;
        }
    }
    consumed.min(heights.len() - 1)
}

#[test]
fn fixed_heights_window_at_top() {
    let mut e = Engine::new(EngineConfig::new(1000, HeightPolicy::Fixed(50)).with_overscan(5));
    let view = e.on_viewport_change(0, 500, 0);

    assert_eq!(view.total_height, 50_000);
    let r = view.range;
    assert_eq!(r.overscan_start, 0);
    assert_eq!(r.visible_start, 0);
    assert_eq!(r.visible_end, 9);
    assert_eq!(r.overscan_end, 14);

    assert_eq!(view.items.len(), 15);
    assert_eq!(view.items[0].offset_top, 0);
    assert_eq!(view.items[14].offset_top, 700);
    assert!(view.items[..10].iter().all(|it| it.is_visible));
    assert!(view.items[10..].iter().all(|it| !it.is_visible));
    assert!(!view.is_scrolling);
}

#[test]
fn empty_list_yields_empty_view() {
    let mut e = Engine::new(EngineConfig::new(0, HeightPolicy::Fixed(50)));
    let view = e.on_viewport_change(0, 400, 0);

    assert!(view.range.is_empty());
    assert_eq!(view.range, VirtualRange::EMPTY);
    assert_eq!(view.total_height, 0);
    assert!(view.items.is_empty());
}

#[test]
fn measurement_shifts_total_and_downstream_offsets() {
    let mut e = Engine::new(EngineConfig::new(10, HeightPolicy::Estimated(50)));
    e.on_viewport_change(0, 200, 0);

    let total_before = e.total_height();
    let start_of_4_before = e.item_start(4).unwrap();
    assert_eq!(total_before, 500);
    assert_eq!(start_of_4_before, 200);

    let view = e.on_item_measured(3, 120);
    assert_eq!(view.total_height, total_before + 70);
    assert_eq!(e.item_start(4).unwrap(), start_of_4_before + 70);
}

#[test]
fn repeated_identical_measurement_is_idempotent() {
    let mut e = Engine::new(EngineConfig::new(10, HeightPolicy::Estimated(50)));
    e.on_viewport_change(0, 200, 0);

    e.on_item_measured(3, 120);
    let total = e.total_height();
    let start_of_7 = e.item_start(7).unwrap();

    e.on_item_measured(3, 120);
    assert_eq!(e.total_height(), total);
    assert_eq!(e.item_start(7).unwrap(), start_of_7);
}

#[test]
fn scroll_to_start_round_trips_to_visible_start() {
    let heights: Arc<dyn Fn(usize) -> u32 + Send + Sync> = Arc::new(|i| 20 + (i % 7) as u32 * 9);
    let mut e = Engine::new(EngineConfig::new(
        200,
        HeightPolicy::PerItem(Arc::clone(&heights)),
    ));
    e.on_viewport_change(0, 300, 0);

    for k in [0usize, 3, 57, 120, 180] {
        let target = e.scroll_to(k, Alignment::Start, Behavior::Instant);
        // The property holds whenever the target was not clamped away from
        // the row's start (i.e. the row is not inside the last page).
        if target.offset == e.item_start(k).unwrap() {
            let view = e.on_viewport_change(target.offset, 300, 1);
            assert_eq!(view.range.visible_start, k, "k={k}");
        }
    }
}

#[test]
fn scroll_to_end_clamps_to_max_offset() {
    let mut e = Engine::new(EngineConfig::new(1000, HeightPolicy::Fixed(50)));
    e.on_viewport_change(0, 500, 0);

    let target = e.scroll_to(999, Alignment::End, Behavior::Instant);
    assert_eq!(target.offset, 49_500);
    assert_eq!(target.offset, e.total_height() - 500);
    assert_eq!(e.scroll_offset(), 49_500);
}

#[test]
fn quiet_period_flips_scrolling_exactly_once() {
    let mut e = Engine::new(EngineConfig::new(1000, HeightPolicy::Fixed(50)));
    e.on_viewport_change(0, 500, 0);
    assert!(!e.is_scrolling());

    let mut now = 0u64;
    for i in 1..=10u64 {
        now = i * 10;
        e.on_viewport_change(i * 20, 500, now);
        assert!(e.is_scrolling());
    }

    assert!(!e.tick(now + 149));
    assert!(e.is_scrolling());

    assert!(e.tick(now + 150));
    assert!(!e.is_scrolling());
    assert_eq!(e.direction(), None);

    assert!(!e.tick(now + 151));
}

#[test]
fn window_matches_linear_reference() {
    let mut rng = Lcg::new(0x5eed);
    for _ in 0..40 {
        let count = rng.gen_range_usize(1, 300);
        let heights: Vec<u32> = (0..count).map(|_| rng.gen_range_u32(1, 120)).collect();
        let overscan = rng.gen_range_usize(0, 6);
        let total = expected_total(&heights);

        let per_item = heights.clone();
        let mut e = Engine::new(
            EngineConfig::new(count, HeightPolicy::PerItem(Arc::new(move |i| per_item[i])))
                .with_overscan(overscan),
        );

        for _ in 0..15 {
            let viewport = rng.gen_range_u32(1, 250);
            let offset = rng.gen_range_u64(0, total + 100);
            let view = e.on_viewport_change(offset, viewport, 0);
            let r = view.range;

            assert!(r.overscan_start <= r.visible_start);
            assert!(r.visible_start <= r.visible_end);
            assert!(r.visible_end <= r.overscan_end);
            assert!(r.overscan_end < count);

            let clamped = offset.min(total.saturating_sub(viewport as u64));
            assert_eq!(r.visible_start, expected_index_at(&heights, clamped));
            let bottom = clamped + viewport as u64 - 1;
            assert_eq!(
                r.visible_end,
                expected_index_at(&heights, bottom.max(clamped))
            );

            assert_eq!(view.total_height, total);
            assert_eq!(view.items.len(), r.overscan_end - r.overscan_start + 1);
            for it in &view.items {
                assert_eq!(it.offset_top, expected_offset_of(&heights, it.index));
                assert_eq!(it.height, heights[it.index]);
                assert_eq!(it.is_visible, it.index >= r.visible_start && it.index <= r.visible_end);
            }
        }
    }
}

#[test]
fn total_height_equals_height_sum_under_random_measurements() {
    let mut rng = Lcg::new(42);
    let count = 120;
    let mut e = Engine::new(EngineConfig::new(count, HeightPolicy::Estimated(40)));
    e.on_viewport_change(0, 200, 0);

    for _ in 0..300 {
        let index = rng.gen_range_usize(0, count);
        let height = rng.gen_range_u32(1, 200);
        e.on_item_measured(index, height);

        let sum: u64 = (0..count).map(|i| e.item_height(i).unwrap() as u64).sum();
        assert_eq!(e.total_height(), sum);
    }
}

#[test]
fn offset_index_matches_linear_reference() {
    let mut rng = Lcg::new(7);
    for _ in 0..30 {
        let n = rng.gen_range_usize(1, 200);
        let mut heights: Vec<u32> = (0..n).map(|_| rng.gen_range_u32(0, 90)).collect();
        let mut index = OffsetIndex::from_heights(&heights);

        for _ in 0..40 {
            let i = rng.gen_range_usize(0, n);
            let next = rng.gen_range_u32(0, 90);
            index.update(i, next as i64 - heights[i] as i64);
            heights[i] = next;
        }

        assert_eq!(index.total(), expected_total(&heights));
        for i in 0..=n {
            assert_eq!(index.offset_of(i), expected_offset_of(&heights, i));
        }
        let total = index.total();
        for _ in 0..25 {
            let offset = rng.gen_range_u64(0, total + 10);
            assert_eq!(index.index_at_offset(offset), expected_index_at(&heights, offset));
        }
    }
}

#[test]
fn alignments_resolve_expected_offsets() {
    let mut e = Engine::new(EngineConfig::new(100, HeightPolicy::Fixed(50)));
    e.on_viewport_change(0, 300, 0);

    assert_eq!(
        e.scroll_to(20, Alignment::Start, Behavior::Instant).offset,
        1000
    );
    assert_eq!(
        e.scroll_to(20, Alignment::End, Behavior::Instant).offset,
        750
    );
    let centered = e.scroll_request(ScrollRequest {
        index: 20,
        alignment: Alignment::Center,
        behavior: Behavior::Instant,
    });
    assert_eq!(centered.offset, 875);
}

#[test]
fn auto_alignment_noops_when_visible_and_picks_nearer_edge() {
    let mut e = Engine::new(EngineConfig::new(100, HeightPolicy::Fixed(50)));
    e.on_viewport_change(1000, 300, 0); // rows 20..=25 on screen

    assert_eq!(
        e.scroll_to(22, Alignment::Auto, Behavior::Instant).offset,
        1000
    );

    // Above the viewport: align to start.
    assert_eq!(
        e.scroll_to(10, Alignment::Auto, Behavior::Instant).offset,
        500
    );
    // Below the viewport (now at offset 500): align to end.
    assert_eq!(
        e.scroll_to(40, Alignment::Auto, Behavior::Instant).offset,
        1750
    );
}

#[test]
fn smooth_scroll_returns_target_without_applying() {
    let mut e = Engine::new(EngineConfig::new(100, HeightPolicy::Fixed(50)));
    e.on_viewport_change(0, 300, 0);

    let target = e.scroll_to(40, Alignment::Start, Behavior::Smooth);
    assert_eq!(target.offset, 2000);
    assert_eq!(target.behavior, Behavior::Smooth);
    // The engine waits for the host's animation samples.
    assert_eq!(e.scroll_offset(), 0);
}

#[test]
fn out_of_range_scroll_reports_and_clamps() {
    let sink = Arc::new(RecordingSink::default());
    let mut e = Engine::new(
        EngineConfig::new(10, HeightPolicy::Fixed(50)).with_shared_sink(sink.clone()),
    );
    e.on_viewport_change(0, 100, 0);

    let target = e.scroll_to(42, Alignment::Start, Behavior::Instant);
    assert_eq!(target.offset, 400); // last row's start, clamped to max scroll
    assert_eq!(
        sink.take(),
        Vec::from([EngineError::InvalidIndex {
            index: 42,
            count: 10
        }])
    );
    assert_eq!(e.metrics().errors_reported, 1);
}

#[test]
fn measurement_after_shrink_is_stale_and_dropped() {
    let sink = Arc::new(RecordingSink::default());
    let mut e = Engine::new(
        EngineConfig::new(100, HeightPolicy::Fixed(50)).with_shared_sink(sink.clone()),
    );
    e.on_viewport_change(0, 200, 0);
    e.configure(50, HeightPolicy::Fixed(50), 4);

    let total = e.total_height();
    e.on_item_measured(75, 90); // valid under the old count
    assert_eq!(e.total_height(), total);
    assert_eq!(
        sink.take(),
        Vec::from([EngineError::StaleMeasurement {
            index: 75,
            count: 50
        }])
    );

    e.on_item_measured(150, 90); // never was valid
    assert_eq!(
        sink.take(),
        Vec::from([EngineError::InvalidIndex {
            index: 150,
            count: 50
        }])
    );
}

#[test]
fn invalid_policy_retains_last_known_good_configuration() {
    let sink = Arc::new(RecordingSink::default());
    let mut e = Engine::new(
        EngineConfig::new(10, HeightPolicy::Fixed(50)).with_shared_sink(sink.clone()),
    );
    e.on_viewport_change(0, 200, 0);

    e.configure(20, HeightPolicy::Fixed(0), 2);
    assert_eq!(e.count(), 10);
    assert_eq!(e.total_height(), 500);
    assert_eq!(
        sink.take(),
        Vec::from([EngineError::InvalidConfiguration {
            reason: "zero-height policy"
        }])
    );
}

#[test]
fn zero_viewport_sample_collapses_range_and_reports() {
    let sink = Arc::new(RecordingSink::default());
    let mut e = Engine::new(
        EngineConfig::new(10, HeightPolicy::Fixed(50)).with_shared_sink(sink.clone()),
    );

    let view = e.on_viewport_change(120, 0, 0);
    assert_eq!(view.range.visible_start, view.range.visible_end);
    assert_eq!(view.range.visible_start, 2);
    assert_eq!(
        sink.take(),
        Vec::from([EngineError::InvalidConfiguration {
            reason: "zero-size viewport sample"
        }])
    );
}

#[test]
fn partial_invalidate_keeps_measurements_below_cutoff() {
    let mut e = Engine::new(EngineConfig::new(10, HeightPolicy::Estimated(50)));
    e.on_viewport_change(0, 300, 0);
    e.on_item_measured(2, 80);
    e.on_item_measured(6, 100);

    e.invalidate(Some(5));

    assert!(e.is_measured(2));
    assert_eq!(e.item_height(2), Some(80));
    assert!(!e.is_measured(6));
    // Re-estimated rows use the running average of what is still measured.
    assert_eq!(e.item_height(6), Some(80));
    // 0,1,3,4 keep their latched initial estimate; 5..10 re-estimate at 80.
    assert_eq!(e.total_height(), 50 * 4 + 80 * 6);
}

#[test]
fn full_invalidate_resets_to_policy_defaults() {
    let mut e = Engine::new(EngineConfig::new(10, HeightPolicy::Estimated(50)));
    e.on_viewport_change(0, 300, 0);
    e.on_item_measured(2, 80);
    e.on_item_measured(6, 100);

    e.invalidate(None);

    assert!((0..10).all(|i| !e.is_measured(i)));
    assert_eq!(e.total_height(), 500);
}

#[test]
fn resize_sample_does_not_invalidate_measurements() {
    let mut e = Engine::new(EngineConfig::new(10, HeightPolicy::Estimated(50)));
    e.on_viewport_change(0, 300, 0);
    e.on_item_measured(4, 90);

    let view = e.on_viewport_change(0, 450, 10);
    assert!(e.is_measured(4));
    assert_eq!(view.total_height, 540);
}

#[test]
fn metrics_count_scroll_resize_and_recomputes() {
    let mut e = Engine::new(EngineConfig::new(100, HeightPolicy::Fixed(50)));

    e.on_viewport_change(0, 100, 0); // resize only (0 -> 100)
    e.on_viewport_change(50, 100, 10); // scroll only
    e.on_viewport_change(50, 120, 20); // resize only

    let m = e.metrics();
    assert_eq!(m.scroll_events, 1);
    assert_eq!(m.resize_events, 2);
    assert_eq!(m.recomputes, 3);
    assert_eq!(m.errors_reported, 0);

    e.on_item_measured(0, 60);
    assert_eq!(e.metrics().measurements, 1);
    assert_eq!(e.metrics().recomputes, 4);
}

#[test]
fn batch_measurements_recompute_once() {
    let mut e = Engine::new(EngineConfig::new(100, HeightPolicy::Estimated(40)));
    e.on_viewport_change(0, 200, 0);

    let before = e.metrics().recomputes;
    let view = e.apply_measurements([(0, 60), (1, 70), (2, 80)]);
    assert_eq!(e.metrics().recomputes, before + 1);
    assert_eq!(e.metrics().measurements, 3);
    assert_eq!(view.items[0].height, 60);
    assert_eq!(view.items[1].offset_top, 60);
}

#[test]
fn resized_row_above_viewport_shifts_offset() {
    let mut e = Engine::new(EngineConfig::new(100, HeightPolicy::Estimated(50)));
    e.on_viewport_change(1000, 200, 0);

    let applied = e.on_item_resized(3, 80);
    assert_eq!(applied, 30);
    assert_eq!(e.scroll_offset(), 1030);

    // A row at/below the viewport top records its height but moves nothing.
    let applied = e.on_item_resized(30, 90);
    assert_eq!(applied, 0);
    assert_eq!(e.item_height(30), Some(90));
    assert_eq!(e.scroll_offset(), 1030);
}

#[test]
fn measurements_follow_keys_after_reorder() {
    let keys = Arc::new(Mutex::new(Vec::from([10u64, 11, 12])));
    let lookup = Arc::clone(&keys);
    let mut e = Engine::new(EngineConfig::new_with_key(
        3,
        HeightPolicy::Estimated(50),
        move |i| lookup.lock().unwrap()[i],
    ));
    e.on_viewport_change(0, 300, 0);
    e.on_item_measured(0, 90);
    assert!(e.is_measured(0));

    keys.lock().unwrap().swap(0, 2); // key 10 now lives at index 2
    e.sync_keys();

    assert!(e.is_measured(2));
    assert_eq!(e.item_height(2), Some(90));
    assert!(!e.is_measured(0));
}

#[test]
fn estimated_policy_seeds_new_rows_from_running_average() {
    let mut e = Engine::new(EngineConfig::new(4, HeightPolicy::Estimated(50)));
    e.on_viewport_change(0, 500, 0);
    e.on_item_measured(0, 100);
    e.on_item_measured(1, 60); // running average: 80

    e.configure(6, HeightPolicy::Estimated(50), 4);

    assert_eq!(e.item_height(0), Some(100));
    assert_eq!(e.item_height(1), Some(60));
    assert_eq!(e.item_height(4), Some(80));
    assert_eq!(e.total_height(), 100 + 60 + 80 * 4);
}

#[test]
fn direction_follows_offset_deltas() {
    let mut e = Engine::new(EngineConfig::new(100, HeightPolicy::Fixed(50)));
    e.on_viewport_change(0, 200, 0);
    assert_eq!(e.direction(), None);

    e.on_viewport_change(100, 200, 5);
    assert_eq!(e.direction(), Some(ScrollDirection::Forward));

    e.on_viewport_change(40, 200, 10);
    assert_eq!(e.direction(), Some(ScrollDirection::Backward));
}

#[test]
fn for_each_view_item_matches_snapshot() {
    let mut e = Engine::new(EngineConfig::new(50, HeightPolicy::Fixed(30)).with_overscan(2));
    let view = e.on_viewport_change(300, 120, 0);

    let mut walked = Vec::new();
    e.for_each_view_item(|item| walked.push(item));
    assert_eq!(walked, view.items);
}

#[test]
fn dispose_releases_state_and_ignores_further_events() {
    let mut e = Engine::new(EngineConfig::new(100, HeightPolicy::Fixed(50)));
    e.on_viewport_change(500, 200, 0);
    e.dispose();

    assert!(e.is_disposed());
    assert_eq!(e.total_height(), 0);
    assert!(e.compute_view().items.is_empty());
    assert!(e.on_item_measured(0, 80).items.is_empty());
    assert!(e.on_viewport_change(100, 200, 10).items.is_empty());
    assert!(!e.tick(1_000));
}
