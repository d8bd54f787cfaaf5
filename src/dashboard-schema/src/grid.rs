// Copyright 2026 The Dashboard Schema Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Grid-unit arithmetic shared by both converters.
//!
//! Positions are integers on a 24-column horizontal scale. Vertically one
//! grid unit is one cell height plus one cell margin in pixels.

use serde::{Deserialize, Serialize};

use crate::flat::Panel;
use crate::layout::RowHeightMode;

/// Number of columns in a dashboard grid.
pub const GRID_COLUMN_COUNT: i64 = 24;

/// Default column count for auto-flowing grids.
pub const DEFAULT_MAX_COLUMN_COUNT: i64 = 3;

const STANDARD_ROW_HEIGHT: i64 = 9;
const SHORT_ROW_HEIGHT: i64 = 5;
const TALL_ROW_HEIGHT: i64 = 14;

/// Pixel constants used to turn pixel sizes into grid units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridMetrics {
    pub cell_height_px: f64,
    pub cell_vmargin_px: f64,
}

impl Default for GridMetrics {
    fn default() -> Self {
        GridMetrics {
            cell_height_px: 30.0,
            cell_vmargin_px: 8.0,
        }
    }
}

impl GridMetrics {
    /// Height of one grid unit in pixels, margin included.
    pub fn unit_height_px(&self) -> f64 {
        self.cell_height_px + self.cell_vmargin_px
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPos {
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
    #[serde(default)]
    pub w: i64,
    #[serde(default)]
    pub h: i64,
}

impl GridPos {
    pub fn new(x: i64, y: i64, w: i64, h: i64) -> Self {
        GridPos { x, y, w, h }
    }

    /// Position given to panels that arrive without one.
    pub fn panel_default() -> Self {
        GridPos::new(0, 0, 6, 3)
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.h
    }
}

/// Height of a row header in grid units.
pub fn row_header_units() -> i64 {
    1
}

/// Item height for an auto-flowing grid with the given row height mode.
///
/// `custom` converts `custom_px` with the pixel constants in `metrics`;
/// without a pixel height it falls back to the standard height.
pub fn auto_grid_height(mode: RowHeightMode, custom_px: Option<f64>, metrics: &GridMetrics) -> i64 {
    match mode {
        RowHeightMode::Standard => STANDARD_ROW_HEIGHT,
        RowHeightMode::Short => SHORT_ROW_HEIGHT,
        RowHeightMode::Tall => TALL_ROW_HEIGHT,
        RowHeightMode::Custom => match custom_px {
            Some(px) if px > 0.0 && metrics.unit_height_px() > 0.0 => {
                (px / metrics.unit_height_px()).round() as i64
            }
            _ => STANDARD_ROW_HEIGHT,
        },
    }
}

/// Item width for an auto-flowing grid. Truncates when the column count
/// doesn't divide the grid evenly.
pub fn auto_grid_width(max_column_count: Option<i64>) -> i64 {
    let columns = match max_column_count {
        Some(n) if n > 0 => n,
        _ => DEFAULT_MAX_COLUMN_COUNT,
    };
    GRID_COLUMN_COUNT / columns
}

/// Returns copies of `panels` moved down by `delta` grid units.
///
/// Children nested inside collapsed row panels keep their positions.
pub fn shift_y(panels: &[Panel], delta: i64) -> Vec<Panel> {
    panels
        .iter()
        .map(|panel| {
            let mut panel = panel.clone();
            if let Some(pos) = panel.grid_pos.as_mut() {
                pos.y += delta;
            }
            panel
        })
        .collect()
}

/// The lowest edge (`y + h`) occupied by any of `panels`.
pub fn bottom_edge(panels: &[Panel]) -> Option<i64> {
    panels
        .iter()
        .filter_map(|panel| panel.grid_pos.map(|pos| pos.bottom()))
        .max()
}

/// Lays `count` same-sized items out left to right, starting a new line
/// after `columns` items or when the next item would overflow the grid.
pub fn pack_left_to_right(count: usize, columns: i64, width: i64, height: i64) -> Vec<GridPos> {
    let columns = if columns > 0 { columns } else { DEFAULT_MAX_COLUMN_COUNT };
    let mut positions = Vec::with_capacity(count);
    let (mut x, mut y, mut on_line) = (0, 0, 0);
    for _ in 0..count {
        if on_line > 0 && (on_line >= columns || x + width > GRID_COLUMN_COUNT) {
            x = 0;
            y += height;
            on_line = 0;
        }
        positions.push(GridPos::new(x, y, width, height));
        x += width;
        on_line += 1;
    }
    positions
}
