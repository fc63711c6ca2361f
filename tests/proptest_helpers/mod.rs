#![allow(dead_code)]

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

use segui::model::{BoundingBox, Component, LabelMap};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Label maps up to `max_side` square whose pixels come from `0..=max_class`.
///
/// Values are drawn per 2x2 cell so that regions of a useful size appear.
pub fn arb_label_map(max_side: u32, max_class: u8) -> BoxedStrategy<LabelMap> {
    (1..=max_side, 1..=max_side)
        .prop_flat_map(move |(width, height)| {
            let cells = (width.div_ceil(2) * height.div_ceil(2)) as usize;
            (
                Just(width),
                Just(height),
                prop::collection::vec(0..=max_class, cells),
            )
        })
        .prop_map(|(width, height, cells)| {
            let cells_per_row = width.div_ceil(2);
            let mut labels = LabelMap::new(width, height);
            for y in 0..height {
                for x in 0..width {
                    let cell = (y / 2) * cells_per_row + x / 2;
                    labels.set(x, y, cells[cell as usize]);
                }
            }
            labels
        })
        .boxed()
}

/// Arbitrary, possibly out-of-range boxes.
pub fn arb_wild_bbox() -> BoxedStrategy<BoundingBox> {
    (-200i64..400, -200i64..400, -50i64..400, -50i64..400)
        .prop_map(|(x, y, w, h)| BoundingBox::new(x, y, w, h))
        .boxed()
}

pub fn arb_component() -> BoxedStrategy<Component> {
    (
        prop::sample::select(vec!["button", "text", "Card", "nav bar", "class_42", "<i>"]),
        arb_wild_bbox(),
        1u32..=254,
    )
        .prop_map(|(kind, bbox, class_id)| Component::new(kind, bbox, class_id))
        .boxed()
}

pub fn class_names(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("type{}", i)).collect()
}
