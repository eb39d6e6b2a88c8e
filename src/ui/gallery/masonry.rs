// SPDX-License-Identifier: MPL-2.0
//! Masonry packing for the photo grid.
//!
//! Tiles keep their aspect ratio at column width, so columns grow unevenly.
//! Each tile is appended to the column that is currently the shortest, which
//! keeps the bottom edge ragged by at most one tile.

use crate::config::MAX_COLUMNS;
use crate::ui::design_tokens::sizing;

/// Number of columns that fit in `width` without going under
/// `min_column_width`. Always at least one and never more than `MAX_COLUMNS`.
#[must_use]
pub fn column_count(width: f32, min_column_width: f32) -> usize {
    if !width.is_finite() || width <= 0.0 {
        return 1;
    }
    let columns = (width / min_column_width.max(1.0)).floor() as usize;
    columns.clamp(1, MAX_COLUMNS)
}

/// Width of one column once `gap` is left between neighbours.
#[must_use]
pub fn column_width(width: f32, columns: usize, gap: f32) -> f32 {
    let columns = columns.max(1) as f32;
    ((width - gap * (columns - 1.0)) / columns).max(0.0)
}

/// Height of a tile at `column_width`; tiles whose thumbnail has not arrived
/// yet use a fixed placeholder height.
#[must_use]
pub fn tile_height(aspect_ratio: Option<f32>, column_width: f32) -> f32 {
    match aspect_ratio {
        Some(ratio) if ratio > 0.0 && ratio.is_finite() => column_width / ratio,
        _ => sizing::TILE_PLACEHOLDER_HEIGHT,
    }
}

/// Distributes tile indices over `columns`, in order, each into the shortest
/// column so far. Ties go to the leftmost column.
#[must_use]
pub fn pack(heights: &[f32], columns: usize) -> Vec<Vec<usize>> {
    let columns = columns.max(1);
    let mut lanes: Vec<Vec<usize>> = vec![Vec::new(); columns];
    let mut totals = vec![0.0_f32; columns];

    for (index, height) in heights.iter().enumerate() {
        let shortest = totals
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map_or(0, |(lane, _)| lane);
        lanes[shortest].push(index);
        totals[shortest] += height.max(0.0);
    }

    lanes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_count_follows_width() {
        assert_eq!(column_count(200.0, 240.0), 1);
        assert_eq!(column_count(500.0, 240.0), 2);
        assert_eq!(column_count(1000.0, 240.0), 4);
    }

    #[test]
    fn column_count_is_capped() {
        assert_eq!(column_count(10_000.0, 240.0), MAX_COLUMNS);
    }

    #[test]
    fn column_count_survives_degenerate_input() {
        assert_eq!(column_count(0.0, 240.0), 1);
        assert_eq!(column_count(f32::NAN, 240.0), 1);
        assert_eq!(column_count(800.0, 0.0), MAX_COLUMNS);
    }

    #[test]
    fn column_width_subtracts_gaps() {
        assert_eq!(column_width(620.0, 3, 10.0), 200.0);
        assert_eq!(column_width(300.0, 1, 10.0), 300.0);
    }

    #[test]
    fn tile_height_keeps_aspect_ratio() {
        assert_eq!(tile_height(Some(2.0), 300.0), 150.0);
        assert_eq!(tile_height(None, 300.0), sizing::TILE_PLACEHOLDER_HEIGHT);
        assert_eq!(tile_height(Some(0.0), 300.0), sizing::TILE_PLACEHOLDER_HEIGHT);
    }

    #[test]
    fn pack_fills_shortest_column_first() {
        // Column 0 gets the tall tile, so the next three go to column 1.
        let lanes = pack(&[300.0, 100.0, 100.0, 100.0, 50.0], 2);
        assert_eq!(lanes, vec![vec![0, 4], vec![1, 2, 3]]);
    }

    #[test]
    fn pack_breaks_ties_to_the_left() {
        let lanes = pack(&[50.0, 50.0, 50.0], 3);
        assert_eq!(lanes, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn pack_keeps_every_index_once() {
        let heights: Vec<f32> = (0..17).map(|i| 80.0 + (i * 37 % 120) as f32).collect();
        let lanes = pack(&heights, 4);
        let mut all: Vec<usize> = lanes.into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(all, (0..17).collect::<Vec<_>>());
    }

    #[test]
    fn pack_with_zero_columns_uses_one() {
        assert_eq!(pack(&[1.0, 2.0], 0), vec![vec![0, 1]]);
    }
}
