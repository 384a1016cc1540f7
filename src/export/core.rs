use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::codec::LayoutCodec;
use crate::error::{LayoutError, Result};
use crate::geometry::Rect;
use crate::layout::{LayoutId, LayoutModel};
use crate::logging::{LogLevel, Logger, TARGET_EXPORT, emit, json_kv, json_str};
use crate::registry::IdAllocator;
use crate::settings::EditorConfig;

/// Arguments of the engine's zone-set persist entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSetRequest<'a> {
    pub unique_key: &'a str,
    pub layout_id: LayoutId,
    pub zone_count: i32,
    /// `left, top, right, bottom` per zone, in device pixels.
    pub zones: Vec<i32>,
    pub active_zone_set_path: &'a Path,
    pub show_spacing: i32,
    pub spacing: i32,
    pub editor_zone_count: i32,
    /// Uppercase layout uuid without braces.
    pub uuid: String,
}

/// Narrow contract of the external zone engine.
///
/// Implementations return [`LayoutError::EngineUnavailable`] when the entry
/// point cannot be reached; the exporter skips the call in that case.
pub trait ZoneEngine {
    fn persist_zone_set(&self, request: &ZoneSetRequest<'_>) -> Result<i32>;
}

/// Engine stand-in for hosts running without the native zone engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullZoneEngine;

impl ZoneEngine for NullZoneEngine {
    fn persist_zone_set(&self, _request: &ZoneSetRequest<'_>) -> Result<i32> {
        Err(LayoutError::EngineUnavailable(
            "no zone engine configured".to_string(),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ActiveZoneSet {
    pub uuid: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_count: Option<usize>,
}

/// Document written to the active-zoneset path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ActiveZoneSetDescriptor {
    pub device_id: String,
    pub active_zoneset: ActiveZoneSet,
    pub editor_show_spacing: bool,
    pub editor_spacing: i32,
    pub editor_zone_count: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOutcome {
    /// The engine was called and returned this status.
    Delivered(i32),
    /// The engine could not be reached or failed; nothing was forwarded.
    Skipped,
}

pub struct ActiveZoneExporter<E = NullZoneEngine> {
    config: EditorConfig,
    engine: E,
    codec: LayoutCodec,
    logger: Option<Logger>,
}

impl<E: ZoneEngine> ActiveZoneExporter<E> {
    pub fn new(config: EditorConfig, engine: E) -> Self {
        Self {
            config,
            engine,
            codec: LayoutCodec::new(),
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.codec = LayoutCodec::new().with_logger(logger.clone());
        self.logger = Some(logger);
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EditorConfig {
        &mut self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Write the layout document to the applied-zoneset path, then apply it.
    pub fn persist(
        &self,
        model: &mut LayoutModel,
        ids: &mut IdAllocator,
        zones: &[Rect],
    ) -> Result<EngineOutcome> {
        self.codec
            .write_layout(&self.config.applied_zone_set_path, model)?;
        self.apply(model, ids, zones)
    }

    /// [`persist`](Self::persist) with zones computed from the model over the
    /// configured work area.
    pub fn persist_layout(
        &self,
        model: &mut LayoutModel,
        ids: &mut IdAllocator,
    ) -> Result<EngineOutcome> {
        let zones = model.zone_rects(self.config.work_area.size());
        self.persist(model, ids, &zones)
    }

    pub fn descriptor(&self, model: &LayoutModel, zone_count: usize) -> ActiveZoneSetDescriptor {
        let kind = model.kind();
        let settings = &self.config.settings;
        ActiveZoneSetDescriptor {
            device_id: self.config.unique_key.clone(),
            active_zoneset: ActiveZoneSet {
                uuid: format!("{{{}}}", model.uuid_upper()),
                kind: kind.type_name(),
                zone_count: (!kind.is_custom()).then_some(zone_count),
            },
            editor_show_spacing: settings.show_spacing,
            editor_spacing: settings.spacing,
            editor_zone_count: settings.zone_count,
        }
    }

    /// Write the active-zoneset descriptor and forward the zones to the
    /// engine. Descriptor write failures are returned; engine failures are
    /// logged and reported as [`EngineOutcome::Skipped`].
    pub fn apply(
        &self,
        model: &mut LayoutModel,
        ids: &mut IdAllocator,
        zones: &[Rect],
    ) -> Result<EngineOutcome> {
        let layout_id = model.id(ids)?;
        let path = &self.config.active_zone_set_path;
        let descriptor = self.descriptor(model, zones.len());
        let encoded = serde_json::to_string(&descriptor)?;
        fs::write(path, encoded).map_err(|e| LayoutError::file(path, e))?;

        let settings = &self.config.settings;
        let request = ZoneSetRequest {
            unique_key: &self.config.unique_key,
            layout_id,
            zone_count: zones.len() as i32,
            zones: zones
                .iter()
                .flat_map(|zone| zone.to_pixel_bounds(self.config.dpi).to_array())
                .collect(),
            active_zone_set_path: path,
            show_spacing: i32::from(settings.show_spacing),
            spacing: settings.spacing,
            editor_zone_count: settings.zone_count,
            uuid: model.uuid_upper(),
        };

        let outcome = match self.engine.persist_zone_set(&request) {
            Ok(status) => EngineOutcome::Delivered(status),
            Err(LayoutError::EngineUnavailable(reason)) => {
                emit(
                    self.logger.as_ref(),
                    LogLevel::Debug,
                    TARGET_EXPORT,
                    "engine_unavailable",
                    [json_str("reason", reason)],
                );
                EngineOutcome::Skipped
            }
            Err(err) => {
                emit(
                    self.logger.as_ref(),
                    LogLevel::Warn,
                    TARGET_EXPORT,
                    "engine_call_failed",
                    [json_str("error", err.to_string())],
                );
                EngineOutcome::Skipped
            }
        };

        emit(
            self.logger.as_ref(),
            LogLevel::Info,
            TARGET_EXPORT,
            "zone_set_applied",
            [
                json_kv("layout_id", layout_id),
                json_str("type", descriptor.active_zoneset.kind),
                json_kv("zones", zones.len()),
                json_kv("delivered", matches!(outcome, EngineOutcome::Delivered(_))),
            ],
        );
        Ok(outcome)
    }
}

impl<E> std::fmt::Debug for ActiveZoneExporter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveZoneExporter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
