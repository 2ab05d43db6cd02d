use std::time::Duration;

use criterion::{Criterion, Throughput};
use surface_scatter::prelude::{AssetLibrary, AssetSet};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Asset set with `count` entries and uneven weights.
#[allow(dead_code)]
pub fn make_asset_set(count: usize) -> AssetSet {
    let mut set = AssetSet::new(format!("bench_{count}"));
    for i in 0..count {
        set = set.with_entry(format!("asset_{i}"), 0.1 + ((i % 9) as f32) / 10.0);
    }
    set
}

#[allow(dead_code)]
pub fn make_library(count: usize) -> AssetLibrary {
    AssetLibrary::new().with_set(make_asset_set(count))
}
