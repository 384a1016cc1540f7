//! Built-in layouts synthesized from a requested zone count.

mod core;
pub mod priority;

pub use core::{
    DefaultLayoutGenerator, columns_layout, focus_zones, grid_dimensions, grid_layout,
    priority_grid_layout, rows_layout, split_percents,
};
pub use priority::PRIORITY_GRID_BLOBS;
