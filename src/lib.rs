//! Zone layout engine for a window-arrangement editor.
//!
//! Layouts are either free-form canvases or proportional grids. The crate
//! synthesizes the built-in layouts for a zone count, reads and writes the
//! persisted layout formats, and hands the applied layout to the zone engine.
//! Modules follow a `mod.rs` orchestrator over a private `core` so the
//! public surface stays small.

pub mod codec;
pub mod error;
pub mod export;
pub mod generator;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod registry;
pub mod settings;

pub use codec::{CodecError, EntryError, LayoutCodec, LoadReport};
pub use error::{LayoutError, Result};
pub use export::{
    ActiveZoneExporter, ActiveZoneSetDescriptor, EngineOutcome, NullZoneEngine, ZoneEngine,
    ZoneSetRequest,
};
pub use generator::DefaultLayoutGenerator;
pub use geometry::{PixelBounds, Rect, Size};
pub use layout::{
    CanvasLayout, GridError, GridLayout, LayoutBody, LayoutId, LayoutKind, LayoutModel, Property,
};
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use registry::{IdAllocator, LayoutRegistry};
pub use settings::{EditorConfig, EditorSettings};
