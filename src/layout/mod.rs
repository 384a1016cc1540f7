//! Layout data model.
//!
//! Downstream code imports layout types from here while the model itself
//! lives in the private `core` module.

pub mod canvas;
mod core;
pub mod grid;

pub use canvas::CanvasLayout;
pub use core::{
    BLANK_CUSTOM_ID, COLUMNS_ID, ChangeNotifier, FIRST_RESERVED_ID, FOCUS_ID, GRID_ID, LayoutBody,
    LayoutId, LayoutKind, LayoutModel, PRIORITY_GRID_ID, Property, ROWS_ID, SubscriptionId,
    UNASSIGNED_ID,
};
pub use grid::{GridError, GridLayout, PERCENT_SCALE};
