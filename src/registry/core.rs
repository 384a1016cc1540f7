use uuid::Uuid;

use crate::error::{LayoutError, Result};
use crate::layout::{FIRST_RESERVED_ID, LayoutId, LayoutModel};
use crate::logging::{LogLevel, Logger, TARGET_REGISTRY, emit, json_kv, json_str};

/// Monotonic source of layout ids. Ids are never handed out twice, even
/// after the layout that held one is deleted, and never reach the range
/// reserved for built-in layouts.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last: LayoutId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> Result<LayoutId> {
        let next = self.last.checked_add(1).ok_or(LayoutError::IdsExhausted)?;
        if next >= FIRST_RESERVED_ID {
            return Err(LayoutError::IdsExhausted);
        }
        self.last = next;
        Ok(next)
    }

    pub fn last_assigned(&self) -> Option<LayoutId> {
        (self.last != 0).then_some(self.last)
    }
}

/// Context object owning the custom layouts of one editor session.
#[derive(Debug, Default)]
pub struct LayoutRegistry {
    ids: IdAllocator,
    custom: Vec<LayoutModel>,
    deleted: Vec<String>,
    logger: Option<Logger>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn ids_mut(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    pub fn custom_models(&self) -> &[LayoutModel] {
        &self.custom
    }

    pub fn custom_models_mut(&mut self) -> &mut [LayoutModel] {
        &mut self.custom
    }

    pub fn push_custom(&mut self, model: LayoutModel) {
        self.custom.push(model);
    }

    pub fn find(&self, uuid: &Uuid) -> Option<&LayoutModel> {
        self.custom.iter().find(|m| m.uuid().as_ref() == Some(uuid))
    }

    pub fn find_mut(&mut self, uuid: &Uuid) -> Option<&mut LayoutModel> {
        self.custom.iter_mut().find(|m| m.uuid().as_ref() == Some(uuid))
    }

    /// Borrow a custom model together with the allocator its id comes from.
    pub fn model_and_ids_mut(
        &mut self,
        uuid: &Uuid,
    ) -> Option<(&mut LayoutModel, &mut IdAllocator)> {
        let model = self
            .custom
            .iter_mut()
            .find(|m| m.uuid().as_ref() == Some(uuid))?;
        Some((model, &mut self.ids))
    }

    /// Id of the custom model at `index`, assigning one if needed.
    pub fn custom_id(&mut self, index: usize) -> Result<Option<LayoutId>> {
        match self.custom.get_mut(index) {
            Some(model) => model.id(&mut self.ids).map(Some),
            None => Ok(None),
        }
    }

    /// Remove the custom layout with `uuid` and record it in the deleted
    /// ledger. Returns `false` (and leaves the ledger alone) when no such
    /// layout is loaded.
    pub fn delete(&mut self, uuid: &Uuid) -> bool {
        match self.custom.iter().position(|m| m.uuid().as_ref() == Some(uuid)) {
            Some(index) => self.delete_at(index).is_some(),
            None => false,
        }
    }

    pub fn delete_at(&mut self, index: usize) -> Option<LayoutModel> {
        if index >= self.custom.len() {
            return None;
        }
        let model = self.custom.remove(index);
        if model.uuid().is_some() {
            self.deleted.push(model.uuid_upper());
        }
        emit(
            self.logger.as_ref(),
            LogLevel::Info,
            TARGET_REGISTRY,
            "custom_layout_deleted",
            [
                json_str("uuid", model.uuid_upper()),
                json_str("name", model.name()),
                json_kv("remaining", self.custom.len()),
            ],
        );
        Some(model)
    }

    /// Uppercase uuids of deleted custom layouts, in deletion order.
    pub fn deleted_uuids(&self) -> &[String] {
        &self.deleted
    }

    /// Select the custom layout with `uuid` and clear every other selection.
    /// Returns whether a layout was found.
    pub fn select(&mut self, uuid: &Uuid) -> bool {
        let mut found = false;
        for model in &mut self.custom {
            let hit = model.uuid().as_ref() == Some(uuid);
            found |= hit;
            model.set_selected(hit);
        }
        found
    }

    pub fn is_custom_layout_active(&self) -> bool {
        self.custom.iter().any(LayoutModel::is_selected)
    }
}
