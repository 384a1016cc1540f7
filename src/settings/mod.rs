//! Editor launch configuration.
//!
//! The host process hands the editor a flat list of positional values; this
//! module turns them into typed settings. Hosts can also supply the same
//! configuration as JSON.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::geometry::Rect;
use crate::layout::LayoutKind;

/// Number of positional values expected by [`EditorConfig::from_args`].
pub const POSITIONAL_ARG_COUNT: usize = 13;

/// Spacing and zone-count choices echoed back to the zone engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EditorSettings {
    pub show_spacing: bool,
    pub spacing: i32,
    pub zone_count: i32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            show_spacing: true,
            spacing: 16,
            zone_count: 3,
        }
    }
}

/// Launch configuration of one editor session.
///
/// `DefaultLayoutGenerator::from_config` reads the work area, zone count and
/// active kind. `LayoutCodec::read_configured_custom_layouts` reads the
/// custom-layouts path and active uuid. `ActiveZoneExporter` reads the unique
/// key, DPI, temp paths and settings. `monitor` and `work_area_key` are kept
/// for the host and not interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EditorConfig {
    /// Per-monitor key the zone engine stores the active layout under.
    pub unique_key: String,
    pub active_kind: LayoutKind,
    /// Native monitor handle, passed through for the host.
    pub monitor: u64,
    pub work_area: Rect,
    /// Resolution key the host files per-monitor state under.
    pub work_area_key: String,
    pub dpi: f32,
    pub active_zone_set_path: PathBuf,
    pub applied_zone_set_path: PathBuf,
    pub custom_zone_sets_path: PathBuf,
    /// Uuid of the active custom layout, if one is active.
    pub active_uuid: Option<String>,
    pub settings: EditorSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            unique_key: String::new(),
            active_kind: LayoutKind::Focus,
            monitor: 0,
            work_area: Rect::new(0, 0, 1920, 1080),
            work_area_key: String::new(),
            dpi: 1.0,
            active_zone_set_path: PathBuf::from("ActiveZoneSet.json"),
            applied_zone_set_path: PathBuf::from("AppliedZoneSet.json"),
            custom_zone_sets_path: PathBuf::from("CustomZoneSets.json"),
            active_uuid: None,
            settings: EditorSettings::default(),
        }
    }
}

impl EditorConfig {
    /// Parse the positional launch values (program name excluded):
    ///
    /// 0. unique key
    /// 1. active layout index
    /// 2. monitor handle
    /// 3. work area as `X_Y_WIDTH_HEIGHT`
    /// 4. work area key
    /// 5. DPI
    /// 6. active zoneset temp file
    /// 7. show spacing (`1` enables)
    /// 8. spacing
    /// 9. zone count
    /// 10. applied zoneset temp file
    /// 11. custom zonesets temp file
    /// 12. active custom layout uuid or `null`
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        if args.len() != POSITIONAL_ARG_COUNT {
            return Err(LayoutError::config(
                "args",
                format!("expected {POSITIONAL_ARG_COUNT} values, got {}", args.len()),
            ));
        }
        let arg = |i: usize| args[i].as_ref().trim();

        let active_uuid = match arg(12) {
            "null" | "" => None,
            uuid => Some(uuid.to_string()),
        };
        let active_kind = match active_uuid {
            Some(_) => LayoutKind::Custom,
            None => LayoutKind::from_arg_index(parse_int("layout-type", arg(1))?),
        };

        Ok(Self {
            unique_key: arg(0).to_string(),
            active_kind,
            monitor: arg(2).parse().map_err(|_| {
                LayoutError::config("monitor", format!("`{}` is not a monitor handle", arg(2)))
            })?,
            work_area: parse_work_area(arg(3))?,
            work_area_key: arg(4).to_string(),
            dpi: parse_dpi(arg(5)).unwrap_or(1.0),
            active_zone_set_path: PathBuf::from(arg(6)),
            settings: EditorSettings {
                show_spacing: parse_int("show-spacing", arg(7))? == 1,
                spacing: parse_int("spacing", arg(8))?,
                zone_count: parse_int("zone-count", arg(9))?,
            },
            applied_zone_set_path: PathBuf::from(arg(10)),
            custom_zone_sets_path: PathBuf::from(arg(11)),
            active_uuid,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

fn parse_int(name: &'static str, value: &str) -> Result<i32> {
    value
        .parse()
        .map_err(|_| LayoutError::config(name, format!("`{value}` is not an integer")))
}

fn parse_work_area(value: &str) -> Result<Rect> {
    let parts: Vec<&str> = value.split('_').collect();
    if parts.len() != 4 {
        return Err(LayoutError::config(
            "work-area",
            format!("`{value}` is not X_Y_WIDTH_HEIGHT"),
        ));
    }
    Ok(Rect::new(
        parse_int("work-area", parts[0])?,
        parse_int("work-area", parts[1])?,
        parse_int("work-area", parts[2])?,
        parse_int("work-area", parts[3])?,
    ))
}

/// Accepts `.` or `,` as the decimal separator.
fn parse_dpi(value: &str) -> Option<f32> {
    value
        .parse()
        .ok()
        .or_else(|| value.replace(',', ".").parse().ok())
}
