//! JSON layout documents.
//!
//! Canvas rectangles are persisted in logical units: the reference frame
//! coordinates as stored in the model. Scaling to device pixels happens only
//! when zones are handed to the zone engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::geometry::{Rect, Size};
use crate::layout::{CanvasLayout, GridLayout, LayoutBody, LayoutModel};

use super::CodecError;

pub const CUSTOM_ZONE_SETS_KEY: &str = "custom-zone-sets";
pub const DELETED_ZONE_SETS_KEY: &str = "deleted-custom-zone-sets";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneInfo {
    #[serde(rename = "X")]
    pub x: i32,
    #[serde(rename = "Y")]
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CanvasInfo {
    pub ref_width: i32,
    pub ref_height: i32,
    pub zones: Vec<ZoneInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GridInfo {
    pub rows: i32,
    pub columns: i32,
    pub rows_percentage: Vec<i32>,
    pub columns_percentage: Vec<i32>,
    pub cell_child_map: Vec<Vec<i32>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LayoutInfo {
    Canvas(CanvasInfo),
    Grid(GridInfo),
}

/// One persisted layout: `{uuid, name, type, info}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutDocument {
    pub uuid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub info: LayoutInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletedLedger {
    #[serde(rename = "deleted-custom-zone-sets")]
    pub deleted: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    uuid: Option<String>,
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    info: Option<Value>,
}

/// A custom layout entry that could not be loaded.
#[derive(Debug)]
pub struct EntryError {
    pub index: usize,
    pub uuid: Option<String>,
    pub error: CodecError,
}

/// Result of loading a custom-layouts document.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub errors: Vec<EntryError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<&Rect> for ZoneInfo {
    fn from(rect: &Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

impl From<&ZoneInfo> for Rect {
    fn from(zone: &ZoneInfo) -> Self {
        Rect::new(zone.x, zone.y, zone.width, zone.height)
    }
}

impl From<&CanvasLayout> for CanvasInfo {
    fn from(canvas: &CanvasLayout) -> Self {
        Self {
            ref_width: canvas.reference_width(),
            ref_height: canvas.reference_height(),
            zones: canvas.zones().iter().map(ZoneInfo::from).collect(),
        }
    }
}

impl From<&GridLayout> for GridInfo {
    /// Indices are compacted so persisted maps always use `0..k`.
    fn from(grid: &GridLayout) -> Self {
        Self {
            rows: grid.rows(),
            columns: grid.columns(),
            rows_percentage: grid.row_percents().to_vec(),
            columns_percentage: grid.column_percents().to_vec(),
            cell_child_map: grid.compacted_cell_child_map(),
        }
    }
}

impl TryFrom<GridInfo> for GridLayout {
    type Error = CodecError;

    fn try_from(info: GridInfo) -> Result<Self, Self::Error> {
        Ok(GridLayout::new(
            info.rows,
            info.columns,
            info.rows_percentage,
            info.columns_percentage,
            info.cell_child_map,
        )?)
    }
}

impl From<CanvasInfo> for CanvasLayout {
    fn from(info: CanvasInfo) -> Self {
        CanvasLayout::with_zones(
            Size::new(info.ref_width, info.ref_height),
            info.zones.iter().map(Rect::from).collect(),
        )
    }
}

pub fn to_document(model: &LayoutModel) -> Result<LayoutDocument, CodecError> {
    let (kind, info) = match model.body() {
        Some(LayoutBody::Canvas(canvas)) => ("canvas", LayoutInfo::Canvas(canvas.into())),
        Some(LayoutBody::Grid(grid)) => ("grid", LayoutInfo::Grid(grid.into())),
        None => return Err(CodecError::MissingBody(model.name().to_string())),
    };
    Ok(LayoutDocument {
        uuid: model.uuid().unwrap_or_else(Uuid::nil).hyphenated().to_string(),
        name: model.name().to_string(),
        kind,
        info,
    })
}

pub fn encode_layout(model: &LayoutModel) -> Result<String, CodecError> {
    Ok(serde_json::to_string(&to_document(model)?)?)
}

/// Parse `{`-wrapped or bare uuids.
pub fn parse_uuid(text: &str) -> Result<Uuid, CodecError> {
    let bare = text
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(text);
    Uuid::parse_str(bare).map_err(|_| CodecError::InvalidUuid(text.to_string()))
}

/// Rebuild one layout model from a persisted entry.
pub fn decode_entry(entry: Value) -> Result<LayoutModel, CodecError> {
    let raw: RawEntry = serde_json::from_value(entry)?;
    let uuid = parse_uuid(&raw.uuid.ok_or(CodecError::MissingField("uuid"))?)?;
    let name = raw.name.ok_or(CodecError::MissingField("name"))?;
    let kind = raw.kind.ok_or(CodecError::MissingField("type"))?;
    let info = raw.info.ok_or(CodecError::MissingField("info"))?;

    let model = match kind.as_str() {
        "grid" => {
            let info: GridInfo = serde_json::from_value(info)?;
            LayoutModel::grid(name, GridLayout::try_from(info)?)
        }
        "canvas" => {
            let info: CanvasInfo = serde_json::from_value(info)?;
            LayoutModel::canvas(name, CanvasLayout::from(info))
        }
        _ => return Err(CodecError::UnknownLayoutType(kind)),
    };
    Ok(model.with_uuid(uuid))
}

/// Decode every entry of a custom-layouts document. A malformed entry is
/// reported and skipped; the document itself must carry the entry array.
pub fn decode_custom_layouts(
    text: &str,
) -> Result<(Vec<LayoutModel>, Vec<EntryError>), CodecError> {
    let mut root: Value = serde_json::from_str(text)?;
    let entries = match root.get_mut(CUSTOM_ZONE_SETS_KEY).map(Value::take) {
        Some(Value::Array(entries)) => entries,
        _ => return Err(CodecError::MissingField(CUSTOM_ZONE_SETS_KEY)),
    };

    let mut models = Vec::with_capacity(entries.len());
    let mut errors = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let uuid = entry
            .get("uuid")
            .and_then(Value::as_str)
            .map(str::to_string);
        match decode_entry(entry) {
            Ok(model) => models.push(model),
            Err(error) => errors.push(EntryError { index, uuid, error }),
        }
    }
    Ok((models, errors))
}
