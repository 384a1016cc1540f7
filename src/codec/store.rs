use std::fs;
use std::path::Path;

use crate::error::{LayoutError, Result};
use crate::layout::LayoutModel;
use crate::logging::{LogLevel, Logger, TARGET_CODEC, emit, json_kv, json_str};
use crate::registry::LayoutRegistry;
use crate::settings::EditorConfig;

use super::text::{self, DeletedLedger, LoadReport};

/// Reads and writes layout documents on disk.
///
/// File open/write failures are fatal to the operation and surface as
/// [`LayoutError::File`]. Malformed entries inside a custom-layouts document
/// are reported through [`LoadReport`] instead.
#[derive(Debug, Clone, Default)]
pub struct LayoutCodec {
    logger: Option<Logger>,
}

impl LayoutCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Write `model` as a single `{uuid, name, type, info}` document.
    pub fn write_layout(&self, path: impl AsRef<Path>, model: &LayoutModel) -> Result<()> {
        let path = path.as_ref();
        let encoded = text::encode_layout(model)?;
        fs::write(path, encoded).map_err(|e| LayoutError::file(path, e))?;
        emit(
            self.logger.as_ref(),
            LogLevel::Debug,
            TARGET_CODEC,
            "layout_written",
            [
                json_str("name", model.name()),
                json_str("path", path.display().to_string()),
            ],
        );
        Ok(())
    }

    /// Load every custom layout in `path` into `registry`.
    pub fn read_custom_layouts(
        &self,
        path: impl AsRef<Path>,
        registry: &mut LayoutRegistry,
    ) -> Result<LoadReport> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| LayoutError::file(path, e))?;
        self.load_custom_layouts(&contents, registry)
    }

    /// Load the configured custom-layouts file and select the active custom
    /// layout, if the editor was launched with one.
    pub fn read_configured_custom_layouts(
        &self,
        config: &EditorConfig,
        registry: &mut LayoutRegistry,
    ) -> Result<LoadReport> {
        let report = self.read_custom_layouts(&config.custom_zone_sets_path, registry)?;
        if let Some(active) = config.active_uuid.as_deref() {
            let selected = text::parse_uuid(active)
                .map(|uuid| registry.select(&uuid))
                .unwrap_or(false);
            if !selected {
                emit(
                    self.logger.as_ref(),
                    LogLevel::Warn,
                    TARGET_CODEC,
                    "active_custom_layout_missing",
                    [json_str("uuid", active)],
                );
            }
        }
        Ok(report)
    }

    pub fn load_custom_layouts(
        &self,
        contents: &str,
        registry: &mut LayoutRegistry,
    ) -> Result<LoadReport> {
        let (models, errors) = text::decode_custom_layouts(contents)?;
        for error in &errors {
            emit(
                self.logger.as_ref(),
                LogLevel::Warn,
                TARGET_CODEC,
                "custom_layout_skipped",
                [
                    json_kv("index", error.index),
                    json_kv("uuid", error.uuid.clone()),
                    json_str("error", error.error.to_string()),
                ],
            );
        }
        let loaded = models.len();
        for model in models {
            registry.push_custom(model);
        }
        emit(
            self.logger.as_ref(),
            LogLevel::Info,
            TARGET_CODEC,
            "custom_layouts_loaded",
            [json_kv("loaded", loaded), json_kv("skipped", errors.len())],
        );
        Ok(LoadReport { loaded, errors })
    }

    /// Write `{"deleted-custom-zone-sets": [...]}` for the registry's ledger.
    pub fn write_deleted_ledger(
        &self,
        path: impl AsRef<Path>,
        registry: &LayoutRegistry,
    ) -> Result<()> {
        let path = path.as_ref();
        let ledger = DeletedLedger {
            deleted: registry.deleted_uuids().to_vec(),
        };
        let encoded = serde_json::to_string(&ledger)?;
        fs::write(path, encoded).map_err(|e| LayoutError::file(path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use crate::codec::text::DELETED_ZONE_SETS_KEY;
    use crate::logging::MemorySink;
    use serde_json::{Value, json};

    #[test]
    fn read_reports_skipped_entries_and_keeps_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        let doc = json!({
            "custom-zone-sets": [
                {"uuid": "not-a-uuid", "name": "bad", "type": "canvas", "info": {}},
                {
                    "uuid": "{0A0B0C0D-0000-4000-8000-000000000001}",
                    "name": "good",
                    "type": "canvas",
                    "info": {"ref-width": 10, "ref-height": 10, "zones": []}
                }
            ]
        });
        fs::write(&path, doc.to_string()).unwrap();

        let sink = MemorySink::new();
        let codec = LayoutCodec::new().with_logger(Logger::new(sink.clone()));
        let mut registry = LayoutRegistry::new();
        let report = codec.read_custom_layouts(&path, &mut registry).unwrap();

        assert_eq!(report.loaded, 1);
        assert!(!report.is_clean());
        assert!(matches!(report.errors[0].error, CodecError::InvalidUuid(_)));
        assert_eq!(registry.custom_models()[0].name(), "good");
        assert_eq!(
            sink.messages(),
            vec!["custom_layout_skipped".to_string(), "custom_layouts_loaded".to_string()]
        );
    }

    #[test]
    fn configured_load_selects_the_active_custom_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        let doc = json!({
            "custom-zone-sets": [
                {
                    "uuid": "{0A0B0C0D-0000-4000-8000-000000000001}",
                    "name": "first",
                    "type": "canvas",
                    "info": {"ref-width": 10, "ref-height": 10, "zones": []}
                },
                {
                    "uuid": "{0A0B0C0D-0000-4000-8000-000000000002}",
                    "name": "second",
                    "type": "canvas",
                    "info": {"ref-width": 10, "ref-height": 10, "zones": []}
                }
            ]
        });
        fs::write(&path, doc.to_string()).unwrap();
        let mut config = EditorConfig {
            custom_zone_sets_path: path,
            active_uuid: Some("{0A0B0C0D-0000-4000-8000-000000000002}".to_string()),
            ..EditorConfig::default()
        };

        let mut registry = LayoutRegistry::new();
        let report = LayoutCodec::new()
            .read_configured_custom_layouts(&config, &mut registry)
            .unwrap();
        assert_eq!(report.loaded, 2);
        let selected: Vec<_> = registry.custom_models().iter().map(|m| m.is_selected()).collect();
        assert_eq!(selected, vec![false, true]);

        let sink = MemorySink::new();
        config.active_uuid = Some("{0A0B0C0D-0000-4000-8000-00000000FFFF}".to_string());
        let mut registry = LayoutRegistry::new();
        LayoutCodec::new()
            .with_logger(Logger::new(sink.clone()))
            .read_configured_custom_layouts(&config, &mut registry)
            .unwrap();
        assert!(!registry.is_custom_layout_active());
        assert!(sink.messages().contains(&"active_custom_layout_missing".to_string()));
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = LayoutRegistry::new();
        let err = LayoutCodec::new()
            .read_custom_layouts(dir.path().join("absent.json"), &mut registry)
            .unwrap_err();
        assert!(matches!(err, LayoutError::File { .. }));
    }

    #[test]
    fn deleted_ledger_lists_uppercase_uuids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deleted.json");
        let mut registry = LayoutRegistry::new();
        LayoutCodec::new()
            .load_custom_layouts(
                &json!({"custom-zone-sets": [{
                    "uuid": "abcdef01-2345-4678-89ab-cdef01234567",
                    "name": "gone",
                    "type": "canvas",
                    "info": {"ref-width": 1, "ref-height": 1, "zones": []}
                }]})
                .to_string(),
                &mut registry,
            )
            .unwrap();
        let uuid = registry.custom_models()[0].uuid().unwrap();
        registry.delete(&uuid);

        LayoutCodec::new().write_deleted_ledger(&path, &registry).unwrap();
        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written[DELETED_ZONE_SETS_KEY],
            json!(["ABCDEF01-2345-4678-89AB-CDEF01234567"])
        );
    }
}
