//! Column packing for the photo gallery.

use serde::{Deserialize, Serialize};

/// Horizontal padding the gallery container reserves, in pixels.
pub const CONTAINER_PADDING: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub columns: usize,
    pub gap: f64,
}

impl ColumnSpec {
    /// Column count and gap for a viewport width: phones get one column,
    /// tablets two, everything wider three.
    pub fn for_viewport(viewport_width: f64) -> Self {
        if viewport_width <= 480.0 {
            ColumnSpec { columns: 1, gap: 8.0 }
        } else if viewport_width <= 768.0 {
            ColumnSpec { columns: 2, gap: 15.0 }
        } else {
            ColumnSpec { columns: 3, gap: 15.0 }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub column: usize,
    pub left: f64,
    pub top: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasonryLayout {
    pub item_width: f64,
    pub placements: Vec<Placement>,
    pub height: f64,
}

/// Places each item, in order, at the top of the currently shortest column
/// (leftmost on ties). `item_heights` are the rendered heights at `item_width`.
pub fn layout(container_width: f64, spec: ColumnSpec, item_heights: &[f64]) -> MasonryLayout {
    let columns = spec.columns.max(1);
    let inner_width = (container_width - CONTAINER_PADDING).max(0.0);
    let item_width = ((inner_width - spec.gap * (columns - 1) as f64) / columns as f64).max(0.0);

    let mut column_heights = vec![0.0_f64; columns];
    let placements = item_heights
        .iter()
        .map(|&height| {
            let column = shortest_column(&column_heights);
            let placement = Placement {
                column,
                left: column as f64 * (item_width + spec.gap),
                top: column_heights[column],
            };
            column_heights[column] += height + spec.gap;
            placement
        })
        .collect();

    let height = column_heights.iter().copied().fold(0.0, f64::max);

    MasonryLayout {
        item_width,
        placements,
        height,
    }
}

fn shortest_column(heights: &[f64]) -> usize {
    heights
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(best, best_h), (i, &h)| {
            if h < best_h { (i, h) } else { (best, best_h) }
        })
        .0
}
