//! Hand-off of the applied layout to the zone engine.
//!
//! Applying a layout writes the active-zoneset descriptor and forwards the
//! zones, scaled to device pixels, to a [`ZoneEngine`]. The engine call is
//! fire-and-forget: its status is reported back but never interpreted, and
//! a missing engine is skipped rather than treated as a failure.

mod core;

pub use core::{
    ActiveZoneExporter, ActiveZoneSet, ActiveZoneSetDescriptor, EngineOutcome, NullZoneEngine,
    ZoneEngine, ZoneSetRequest,
};
