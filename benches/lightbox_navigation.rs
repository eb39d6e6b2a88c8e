// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for lightbox navigation.
//!
//! Measures the performance of:
//! - Paging forward through galleries of increasing size
//! - Opening the lightbox on a photo at the end of the grid
//! - Scoring drag releases

use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use iced::Vector;
use iced_folio::domain::gallery::{CollectionRef, Photo, RecordId};
use iced_folio::domain::lightbox::Direction;
use iced_folio::ui::lightbox::{self, gesture};
use iced_folio::ui::state::DragRelease;
use std::hint::black_box;

const GALLERY_SIZES: [usize; 3] = [50, 500, 5_000];

fn gallery(count: usize) -> Vec<Photo> {
    let created = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default();
    (0..count)
        .map(|i| Photo {
            id: RecordId::new(format!("photo{i:05}")),
            collection: CollectionRef::new("pbc_photos", "photos"),
            image: format!("photo{i:05}.jpg"),
            owner: RecordId::new("owner"),
            owner_name: None,
            created,
        })
        .collect()
}

/// Benchmark paging forward.
///
/// The navigator looks the selection up by id, so each step is linear in the
/// gallery size.
fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("lightbox_navigation");

    for size in GALLERY_SIZES {
        let photos = gallery(size);
        let mut state = lightbox::State::default();
        let _ = state.open(&photos, &photos[0].id, Direction::Still, 1600.0);

        group.bench_with_input(BenchmarkId::new("advance", size), &photos, |b, photos| {
            b.iter(|| black_box(state.advance(black_box(photos), Direction::Forward)));
        });
    }

    group.finish();
}

/// Benchmark opening on the last photo of the grid.
fn bench_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("lightbox_navigation");

    for size in GALLERY_SIZES {
        let photos = gallery(size);
        let last = photos[size - 1].id.clone();

        group.bench_with_input(BenchmarkId::new("open_last", size), &photos, |b, photos| {
            b.iter(|| {
                let mut state = lightbox::State::default();
                black_box(state.open(black_box(photos), &last, Direction::Still, 1600.0))
            });
        });
    }

    group.finish();
}

/// Benchmark swipe scoring.
fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("lightbox_navigation");
    let settings = gesture::SwipeSettings::default();
    let release = DragRelease {
        offset: Vector::new(-120.0, 8.0),
        velocity: Vector::new(-40.0, 1.0),
    };

    group.bench_function("classify_swipe", |b| {
        b.iter(|| black_box(gesture::classify(black_box(release), &settings)));
    });

    group.finish();
}

criterion_group!(benches, bench_advance, bench_open, bench_classify);
criterion_main!(benches);
