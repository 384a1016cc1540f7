//! Layout bookkeeping: id allocation, loaded custom layouts and the ledger
//! of deleted custom layouts.

mod core;

pub use core::{IdAllocator, LayoutRegistry};
